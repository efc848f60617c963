//! Claim notes
//!
//! Free-text notes written against a claim by adjusters, customers, or
//! intake systems. A note references its claim by id only; the note store
//! keeps them independently of the claim record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use core_kernel::{ClaimId, NoteId};

/// A free-text note attached to a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimNote {
    /// Store-assigned identifier
    #[serde(default)]
    pub note_id: NoteId,
    /// The claim this note belongs to
    pub claim_id: ClaimId,
    /// Note body
    pub text: String,
    /// Who wrote the note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// When the note was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl ClaimNote {
    /// Creates a note with a fresh identifier and no metadata
    pub fn new(claim_id: ClaimId, text: impl Into<String>) -> Self {
        Self {
            note_id: NoteId::new(),
            claim_id,
            text: text.into(),
            author: None,
            recorded_at: None,
        }
    }

    /// Sets the author
    pub fn by(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Sets the time the note was written
    pub fn recorded_at(mut self, at: DateTime<Utc>) -> Self {
        self.recorded_at = Some(at);
        self
    }

    /// Renders the note as the JSON object embedded in the model prompt
    ///
    /// The store-assigned id is left out; it carries no meaning for the model.
    pub fn to_json(&self) -> Value {
        let mut value = json!({
            "claimId": self.claim_id.as_str(),
            "text": self.text,
        });
        if let Some(author) = &self.author {
            value["author"] = Value::String(author.clone());
        }
        if let Some(at) = &self.recorded_at {
            value["recordedAt"] = Value::String(at.to_rfc3339());
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_deserializes_minimal_note() {
        let note: ClaimNote =
            serde_json::from_str(r#"{"claimId":"C1","text":"fender bent"}"#).unwrap();

        assert_eq!(note.claim_id.as_str(), "C1");
        assert_eq!(note.text, "fender bent");
        assert!(note.author.is_none());
    }

    #[test]
    fn test_prompt_json_omits_note_id() {
        let note = ClaimNote::new(ClaimId::new("C1").unwrap(), "fender bent")
            .by("adjuster-7")
            .recorded_at(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap());

        let value = note.to_json();
        assert!(value.get("noteId").is_none());
        assert_eq!(value["author"], "adjuster-7");
        assert_eq!(value["recordedAt"], "2024-03-01T09:30:00+00:00");
    }
}
