//! Custom data (user attribute) update records

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::errors::{BatchError, Result};

/// Attribute update for one custom user id.
///
/// With `overwrite` set, Batch replaces the user's stored attributes with
/// `values`; otherwise the values are merged into what is already stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomDataRecord {
    pub id: String,
    pub values: Map<String, Value>,
    #[serde(default)]
    pub overwrite: bool,
}

impl CustomDataRecord {
    pub fn new(id: impl ToString, values: Map<String, Value>) -> Self {
        Self { id: id.to_string(), values, overwrite: false }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// # Errors
    /// Returns a validation error naming the `id` field when it is empty.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(BatchError::validation("id"));
        }
        Ok(())
    }

    /// JSON body for `data/users/{id}`.
    pub fn to_body(&self) -> Value {
        json!({ "overwrite": self.overwrite, "values": self.values })
    }
}
