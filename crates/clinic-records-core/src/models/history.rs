//! Clinical history models.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::non_blank;
use super::patient::Patient;
use super::payload::{ClinicalHistoryPayload, TreatmentPayload};
use crate::ledger::TreatmentLedger;
use crate::medical_history::{self, MedicalHistory, NOT_SPECIFIED};

/// Lifecycle status of a clinical history.
///
/// A closed history always carries its closure reason.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum HistoryStatus {
    Active,
    Closed { reason: String },
}

impl HistoryStatus {
    /// Canonicalize the wire pair `is_active` + `closure_reason`.
    pub fn from_wire(is_active: Option<bool>, closure_reason: Option<&str>) -> Self {
        match is_active {
            Some(false) => {
                let reason = closure_reason
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .unwrap_or(NOT_SPECIFIED);
                Self::Closed {
                    reason: reason.to_string(),
                }
            }
            _ => Self::Active,
        }
    }

    pub fn state(&self) -> HistoryState {
        match self {
            Self::Active => HistoryState::Active,
            Self::Closed { .. } => HistoryState::Closed,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn closure_reason(&self) -> Option<&str> {
        match self {
            Self::Active => None,
            Self::Closed { reason } => Some(reason.as_str()),
        }
    }
}

/// Status without its payload, for error reporting and comparisons.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HistoryState {
    Active,
    Closed,
}

impl fmt::Display for HistoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Closed => f.write_str("closed"),
        }
    }
}

/// A clinical history with its patient and treatment ledger.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClinicalHistory {
    pub id: String,
    pub patient_id: String,
    /// Owning patient, when the service nested it
    pub patient: Option<Patient>,
    pub status: HistoryStatus,
    /// Intake consultation reason
    pub reason: String,
    pub symptoms: String,
    pub findings: Option<String>,
    pub doctor_signature: String,
    /// Parsed once at canonicalization
    pub medical_history: MedicalHistory,
    pub treatments: TreatmentLedger,
    pub created_at: Option<String>,
}

impl ClinicalHistory {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn state(&self) -> HistoryState {
        self.status.state()
    }

    pub fn closure_reason(&self) -> Option<&str> {
        self.status.closure_reason()
    }

    /// What brought the patient in most recently.
    pub fn current_consultation_reason(&self) -> &str {
        self.treatments.current_consultation_reason(&self.reason)
    }

    /// Render back to the `is_active` + `closure_reason` wire shape.
    ///
    /// The nested patient is not rendered; `patient_id` identifies it.
    pub fn to_payload(&self) -> ClinicalHistoryPayload {
        ClinicalHistoryPayload {
            id: Some(self.id.clone()),
            patient_id: Some(self.patient_id.clone()),
            patient: None,
            is_active: Some(self.is_active()),
            closure_reason: self.closure_reason().map(str::to_string),
            reason: Some(self.reason.clone()),
            symptoms: Some(self.symptoms.clone()),
            findings: self.findings.clone(),
            doctor_signature: Some(self.doctor_signature.clone()),
            medical_history: self.medical_history.clone().into_value(),
            treatments: self.treatments.iter().map(TreatmentPayload::from).collect(),
            created_at: self.created_at.clone(),
        }
    }
}

impl From<ClinicalHistoryPayload> for ClinicalHistory {
    fn from(payload: ClinicalHistoryPayload) -> Self {
        let patient = payload.patient.map(Patient::from);
        let patient_id = payload
            .patient_id
            .or_else(|| patient.as_ref().and_then(|p| p.id.clone()))
            .unwrap_or_default();

        Self {
            id: payload.id.unwrap_or_default(),
            patient_id,
            patient,
            status: HistoryStatus::from_wire(payload.is_active, payload.closure_reason.as_deref()),
            reason: non_blank(&payload.reason).unwrap_or_default(),
            symptoms: non_blank(&payload.symptoms).unwrap_or_default(),
            findings: non_blank(&payload.findings),
            doctor_signature: non_blank(&payload.doctor_signature).unwrap_or_default(),
            medical_history: medical_history::parse(&payload.medical_history),
            treatments: TreatmentLedger::from_payloads(payload.treatments),
            created_at: payload.created_at,
        }
    }
}
