//! Treatment models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::payload::TreatmentPayload;

/// A treatment entry in a clinical history's ledger.
///
/// Only [`crate::ledger::TreatmentLedger::append`] builds these, so `sequence`,
/// `reason` and `notes` are always resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Treatment {
    /// Service ID
    pub id: Option<String>,
    /// 0-based position in the ledger
    pub sequence: usize,
    /// Treatment date as stored
    pub date: Option<String>,
    /// Treatment name (usually the dental service name)
    pub name: String,
    /// Attending doctor
    pub doctor_name: String,
    /// First non-empty of the legacy reason fields
    pub reason: Option<String>,
    /// Free-text notes, defaulted when absent
    pub notes: String,
    /// Dental service referenced at creation time
    pub dental_service_id: Option<String>,
}

impl From<&Treatment> for TreatmentPayload {
    fn from(treatment: &Treatment) -> Self {
        Self {
            id: treatment.id.clone(),
            date: treatment.date.clone(),
            name: Some(treatment.name.clone()),
            doctor_name: Some(treatment.doctor_name.clone()),
            reason: treatment.reason.clone(),
            notes: Some(treatment.notes.clone()),
            dental_service_id: treatment.dental_service_id.clone(),
            ..Default::default()
        }
    }
}

/// A treatment as entered by the clinician, before it is sent to the service.
#[derive(Debug, Clone, PartialEq)]
pub struct TreatmentDraft {
    pub dental_service_id: String,
    pub treatment_date: NaiveDate,
    pub notes: Option<String>,
}

impl TreatmentDraft {
    /// Create a draft without notes.
    pub fn new(dental_service_id: impl Into<String>, treatment_date: NaiveDate) -> Self {
        Self {
            dental_service_id: dental_service_id.into(),
            treatment_date,
            notes: None,
        }
    }

    /// Attach notes; blank notes are dropped.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = if notes.trim().is_empty() {
            None
        } else {
            Some(notes.trim().to_string())
        };
        self
    }

    /// Wire payload for `append_treatment`.
    pub fn to_request(&self) -> NewTreatment {
        NewTreatment {
            dental_service_id: self.dental_service_id.trim().to_string(),
            treatment_date: self.treatment_date.format("%Y-%m-%d").to_string(),
            notes: self.notes.clone(),
        }
    }
}

/// Request body for appending a treatment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTreatment {
    pub dental_service_id: String,
    /// `YYYY-MM-DD`
    pub treatment_date: String,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_to_request() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let request = TreatmentDraft::new(" 12 ", date)
            .with_notes("  Control en 15 días ")
            .to_request();

        assert_eq!(request.dental_service_id, "12");
        assert_eq!(request.treatment_date, "2024-03-05");
        assert_eq!(request.notes.as_deref(), Some("Control en 15 días"));
    }

    #[test]
    fn test_blank_notes_dropped() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let draft = TreatmentDraft::new("1", date).with_notes("   ");
        assert!(draft.notes.is_none());
    }
}
