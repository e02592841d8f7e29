//! Dental service catalog models.
//!
//! The catalog is read-only reference data here; it is only consulted when
//! building a treatment.

use serde::{Deserialize, Serialize};

use super::payload::deserialize_required_id;

/// A billable dental service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DentalService {
    /// Service ID - referenced by treatments at creation time
    #[serde(deserialize_with = "deserialize_required_id")]
    pub id: String,
    /// Display name (e.g., "Resina compuesta")
    pub name: String,
    /// Longer description
    #[serde(default)]
    pub description: Option<String>,
    /// Listed price in the clinic's currency
    #[serde(default)]
    pub price: Option<f64>,
    /// Whether new treatments may still reference this service
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl DentalService {
    /// Create a new active service with required fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            price: None,
            is_active: true,
        }
    }
}

/// Find a service by ID, ignoring surrounding whitespace.
pub fn find_service<'a>(catalog: &'a [DentalService], id: &str) -> Option<&'a DentalService> {
    let id = id.trim();
    catalog.iter().find(|service| service.id == id)
}
