//! Test Data Builders
//!
//! Builders for claims, notes, and model replies. Tests set only the fields
//! they care about; everything else gets a plausible generated value.

use chrono::{DateTime, Utc};
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::{Map, Value};

use core_kernel::ClaimId;
use domain_claims::{Claim, ClaimNote, ClaimSummary, SummaryField};

use crate::fixtures::{IdFixtures, ModelOutputFixtures};

/// Builder for claim records
pub struct ClaimBuilder {
    id: ClaimId,
    attributes: Map<String, Value>,
}

impl Default for ClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimBuilder {
    /// A claim with a random policy number and loss description
    pub fn new() -> Self {
        let mut attributes = Map::new();
        attributes.insert("status".to_string(), Value::from("open"));
        attributes.insert(
            "policyNumber".to_string(),
            Value::from(format!("P-{}", (1000..9999).fake::<u32>())),
        );
        attributes.insert("lossDescription".to_string(), Value::from(Sentence(4..10).fake::<String>()));

        Self {
            id: IdFixtures::claim_id(),
            attributes,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = IdFixtures::claim(id);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Drops every generated attribute
    pub fn bare(mut self) -> Self {
        self.attributes.clear();
        self
    }

    pub fn build(self) -> Claim {
        self.attributes
            .into_iter()
            .fold(Claim::new(self.id), |claim, (key, value)| claim.with_attribute(key, value))
    }
}

/// Builder for claim notes
pub struct ClaimNoteBuilder {
    claim_id: ClaimId,
    text: String,
    author: Option<String>,
    recorded_at: Option<DateTime<Utc>>,
}

impl Default for ClaimNoteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimNoteBuilder {
    /// A note on `C1` with random text and author
    pub fn new() -> Self {
        Self {
            claim_id: IdFixtures::claim_id(),
            text: Sentence(3..12).fake(),
            author: Some(Name().fake()),
            recorded_at: None,
        }
    }

    pub fn for_claim(mut self, id: &str) -> Self {
        self.claim_id = IdFixtures::claim(id);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn anonymous(mut self) -> Self {
        self.author = None;
        self
    }

    pub fn recorded_at(mut self, at: DateTime<Utc>) -> Self {
        self.recorded_at = Some(at);
        self
    }

    pub fn build(self) -> ClaimNote {
        let mut note = ClaimNote::new(self.claim_id, self.text);
        note.author = self.author;
        note.recorded_at = self.recorded_at;
        note
    }
}

/// Builder for raw model replies, well-formed or not
///
/// ```rust,ignore
/// let reply = ModelOutputBuilder::new()
///     .without(SummaryField::AdjusterSummary)
///     .fenced("json")
///     .build();
/// ```
pub struct ModelOutputBuilder {
    fields: Map<String, Value>,
    fence: Option<String>,
}

impl Default for ModelOutputBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelOutputBuilder {
    /// Starts from the standard fender summary
    pub fn new() -> Self {
        Self::from_summary(&ModelOutputFixtures::fender_summary())
    }

    pub fn from_summary(summary: &ClaimSummary) -> Self {
        let fields = SummaryField::ALL
            .iter()
            .map(|f| (f.key().to_string(), Value::from(summary.field(*f))))
            .collect();
        Self { fields, fence: None }
    }

    /// Removes a field from the reply
    pub fn without(mut self, field: SummaryField) -> Self {
        self.fields.remove(field.key());
        self
    }

    /// Replaces a field with any JSON value
    pub fn with_value(mut self, field: SummaryField, value: impl Into<Value>) -> Self {
        self.fields.insert(field.key().to_string(), value.into());
        self
    }

    /// Adds a key outside the output contract
    pub fn with_extra(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Wraps the reply in a code fence with the given language tag (may be empty)
    pub fn fenced(mut self, language: &str) -> Self {
        self.fence = Some(language.to_string());
        self
    }

    pub fn build(self) -> String {
        let body = Value::Object(self.fields).to_string();
        match self.fence {
            Some(language) => format!("```{}\n{}\n```", language, body),
            None => body,
        }
    }
}
