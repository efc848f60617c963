//! Claim record
//!
//! A claim is owned by the claim store. Apart from its identifier the record
//! is an open-ended set of attributes (policy number, status, loss date, ...)
//! that this crate never interprets; it is passed to the model as-is.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use core_kernel::ClaimId;

/// A claim as stored by the claim store
///
/// Serializes flat, with `id` next to the attributes:
/// `{"id": "C1", "status": "open", "policyNumber": "P-77"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier, assigned at creation
    pub id: ClaimId,
    /// Domain attributes, not validated here
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Claim {
    /// Creates a claim with no attributes
    pub fn new(id: ClaimId) -> Self {
        Self {
            id,
            attributes: Map::new(),
        }
    }

    /// Adds or replaces an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        // `id` lives in its own field; an attribute of that name would shadow it on output
        if key != "id" {
            self.attributes.insert(key, value.into());
        }
        self
    }

    /// Looks up an attribute
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Renders the claim as a JSON object, identifier included
    pub fn to_json(&self) -> Value {
        let mut object = Map::with_capacity(self.attributes.len() + 1);
        object.insert("id".to_string(), Value::String(self.id.to_string()));
        for (key, value) in &self.attributes {
            object.insert(key.clone(), value.clone());
        }
        Value::Object(object)
    }
}
