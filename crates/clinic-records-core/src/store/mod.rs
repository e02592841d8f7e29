//! Storage/service boundary.
//!
//! The core never owns persistence: every read and write goes through a
//! [`RecordStore`]. Calls are synchronous and never retried here.

mod memory;

pub use memory::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ClinicalHistoryPayload, DentalService, NewTreatment, TreatmentPayload};

/// Boundary errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with an `{error}` body.
    #[error("Rejected by service: {0}")]
    Rejected(String),

    #[error("Record not found: {0}")]
    NotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Requested lifecycle change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusChange {
    pub is_active: bool,
    /// Set when closing, cleared when reopening
    pub closure_reason: Option<String>,
}

/// Status of a history as reported back by the service after a change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusSnapshot {
    pub id: String,
    pub is_active: bool,
    pub closure_reason: Option<String>,
}

impl StatusSnapshot {
    /// Whether the service applied `change`.
    pub fn reflects(&self, change: &StatusChange) -> bool {
        self.is_active == change.is_active
            && (change.is_active || self.closure_reason == change.closure_reason)
    }
}

/// Remote operations the core consumes.
pub trait RecordStore {
    /// Full history with nested patient, guardian and treatments.
    fn fetch_clinical_history(&self, id: &str) -> StoreResult<ClinicalHistoryPayload>;

    fn append_treatment(
        &self,
        history_id: &str,
        treatment: &NewTreatment,
    ) -> StoreResult<TreatmentPayload>;

    fn set_status(&self, history_id: &str, change: &StatusChange) -> StoreResult<StatusSnapshot>;

    fn list_dental_services(&self) -> StoreResult<Vec<DentalService>>;
}
