//! Medical history normalization.
//!
//! Pipeline: raw payload (object, quasi-JSON text, or null) → [`parse`] →
//! [`MedicalHistory`] → [`MedicalHistoryNormalizer::normalize`] → display view.
//!
//! Nothing in here returns an error: malformed input degrades to an empty
//! record and missing answers render as [`NOT_SPECIFIED`].

mod labels;
mod normalizer;
mod parser;

pub use labels::*;
pub use normalizer::*;
pub use parser::{parse, parse_str};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Marker for a missing answer.
pub const NOT_SPECIFIED: &str = "No especificado";

/// Marker for a missing list-shaped answer.
pub const NOT_SPECIFIED_PLURAL: &str = "No especificados";

/// A parsed medical-history record: the stored object, key by key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct MedicalHistory {
    fields: Map<String, Value>,
}

impl MedicalHistory {
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}
