//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for claims, notes, and model replies. Fixtures are
//! deterministic so assertions can compare exact values.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use core_kernel::ClaimId;
use domain_claims::{Claim, ClaimNote, ClaimSummary};

/// Fixture for claim identifiers
pub struct IdFixtures;

impl IdFixtures {
    /// The claim used by most scenarios
    pub fn claim_id() -> ClaimId {
        Self::claim("C1")
    }

    /// An id no store knows about
    pub fn unknown_claim_id() -> ClaimId {
        Self::claim("C404")
    }

    /// Builds a claim id, panicking on invalid input
    pub fn claim(raw: &str) -> ClaimId {
        ClaimId::new(raw).unwrap_or_else(|e| panic!("invalid fixture claim id {raw:?}: {e}"))
    }
}

/// Fixture for timestamps
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Date of loss in the standard scenario
    pub fn loss_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 15, 0).unwrap()
    }

    /// When the first adjuster note was written
    pub fn first_note_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 2, 9, 30, 0).unwrap()
    }
}

/// Fixture for claim records
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// Open auto claim `C1`
    pub fn open_claim() -> Claim {
        Claim::new(IdFixtures::claim_id())
            .with_attribute("status", "open")
            .with_attribute("policyNumber", "P-77")
            .with_attribute("lossType", "collision")
            .with_attribute("lossDate", TemporalFixtures::loss_time().to_rfc3339())
    }

    /// The single note of the standard scenario
    pub fn fender_note() -> ClaimNote {
        ClaimNote::new(IdFixtures::claim_id(), "fender bent")
            .by("adjuster-7")
            .recorded_at(TemporalFixtures::first_note_time())
    }
}

/// Fixture for model replies
pub struct ModelOutputFixtures;

impl ModelOutputFixtures {
    /// The summary the standard scenario expects
    pub fn fender_summary() -> ClaimSummary {
        ClaimSummary {
            overall_summary: "Open collision claim; the insured's fender is bent.".to_string(),
            customer_summary: "We have your claim for the bent fender and are reviewing it.".to_string(),
            adjuster_summary: "Policy P-77, collision on 2024-03-01, one note reporting a bent fender.".to_string(),
            recommended_next_step: "Schedule a damage inspection.".to_string(),
        }
    }

    /// `fender_summary` as the bare JSON the model is asked for
    pub fn valid_json() -> String {
        Self::json_for(&Self::fender_summary())
    }

    /// Renders any summary as a model reply
    pub fn json_for(summary: &ClaimSummary) -> String {
        json!({
            "overallSummary": summary.overall_summary,
            "customerSummary": summary.customer_summary,
            "adjusterSummary": summary.adjuster_summary,
            "recommendedNextStep": summary.recommended_next_step,
        })
        .to_string()
    }

    /// `valid_json` wrapped in a ```json fence
    pub fn fenced_json() -> String {
        format!("```json\n{}\n```", Self::valid_json())
    }

    /// A reply that ignores the output contract entirely
    pub fn prose() -> String {
        "Sure! The claim looks fine and should be paid.".to_string()
    }
}
