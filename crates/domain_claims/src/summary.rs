//! The claim summary output contract

use std::fmt;

use serde::{Deserialize, Serialize};

/// The four-part summary of a claim
///
/// Every field is present and non-blank; `ResponseParser` is the only place
/// that builds one from model output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSummary {
    /// Overall summary of the claim
    pub overall_summary: String,
    /// Summary written for the customer
    pub customer_summary: String,
    /// Summary written for the adjuster
    pub adjuster_summary: String,
    /// The recommended next step
    pub recommended_next_step: String,
}

/// Names of the four summary fields, as they appear on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SummaryField {
    OverallSummary,
    CustomerSummary,
    AdjusterSummary,
    RecommendedNextStep,
}

impl SummaryField {
    /// All fields in output order
    pub const ALL: [SummaryField; 4] = [
        SummaryField::OverallSummary,
        SummaryField::CustomerSummary,
        SummaryField::AdjusterSummary,
        SummaryField::RecommendedNextStep,
    ];

    /// The JSON key of the field
    pub fn key(self) -> &'static str {
        match self {
            SummaryField::OverallSummary => "overallSummary",
            SummaryField::CustomerSummary => "customerSummary",
            SummaryField::AdjusterSummary => "adjusterSummary",
            SummaryField::RecommendedNextStep => "recommendedNextStep",
        }
    }

    /// What the model is asked to write into the field
    pub fn instruction(self) -> &'static str {
        match self {
            SummaryField::OverallSummary => "overall summary of the claim",
            SummaryField::CustomerSummary => "customer-facing summary in plain language",
            SummaryField::AdjusterSummary => "adjuster-focused summary with the facts relevant to handling the claim",
            SummaryField::RecommendedNextStep => "single recommended next step",
        }
    }
}

impl fmt::Display for SummaryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl ClaimSummary {
    /// Returns the value of one field
    pub fn field(&self, field: SummaryField) -> &str {
        match field {
            SummaryField::OverallSummary => &self.overall_summary,
            SummaryField::CustomerSummary => &self.customer_summary,
            SummaryField::AdjusterSummary => &self.adjuster_summary,
            SummaryField::RecommendedNextStep => &self.recommended_next_step,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let summary = ClaimSummary {
            overall_summary: "a".into(),
            customer_summary: "b".into(),
            adjuster_summary: "c".into(),
            recommended_next_step: "d".into(),
        };
        let value = serde_json::to_value(&summary).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 4);
        for field in SummaryField::ALL {
            assert_eq!(object[field.key()], summary.field(field));
        }
    }

    #[test]
    fn test_field_serde_matches_key() {
        for field in SummaryField::ALL {
            let encoded = serde_json::to_string(&field).unwrap();
            assert_eq!(encoded, format!("\"{}\"", field.key()));
        }
    }
}
