//! Domain models for the clinic records core.
//!
//! Wire payloads (`*Payload` types) are canonicalized exactly once into the types
//! re-exported here; every other module consumes only the canonical shape.

mod catalog;
mod history;
mod patient;
mod payload;
mod person;
mod treatment;

pub use catalog::*;
pub use history::*;
pub use patient::*;
pub use payload::{
    ClinicalHistoryPayload, GuardianPayload, PatientPayload, PersonPayload, TreatmentPayload,
};
pub use person::*;
pub use treatment::*;

/// Trimmed value, or `None` when absent or blank.
pub(crate) fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
