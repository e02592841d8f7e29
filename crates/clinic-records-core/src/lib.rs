//! Clinic Records Core Library
//!
//! Domain core for a dental clinic's patient records.
//!
//! # Architecture
//!
//! ```text
//!   records service (RecordStore)
//!            │ fetch / append_treatment / set_status
//!            ▼
//!   wire payloads ──canonicalize once──► Patient, ClinicalHistory
//!                                               │
//!             ┌─────────────────────────────────┼───────────────────────────┐
//!             ▼                                 ▼                           ▼
//!      AgeAndGuardianPolicy          MedicalHistoryNormalizer       TreatmentLedger
//!      (who needs a guardian)        (coded answers → labels)       (append-only rows)
//!                                                                           ▲
//!                                  ClinicalHistoryLifecycle ────────────────┘
//!                          validate → request → refetch (Active ⇄ Closed)
//! ```
//!
//! # Core Principle
//!
//! **The store is the source of truth.** Every accepted write is followed by a
//! full re-read; nothing is patched locally.
//!
//! # Modules
//!
//! - [`models`]: Domain types and the wire payloads they are built from
//! - [`policy`]: Age and guardian necessity
//! - [`medical_history`]: Quasi-JSON parsing and code→label rendering
//! - [`ledger`]: Append-only treatment ledger
//! - [`lifecycle`]: Close/reopen/add-treatment state machine
//! - [`store`]: Storage boundary trait and in-memory implementation
//! - [`config`] / [`logging`]: Runtime settings and tracing setup

pub mod config;
pub mod ledger;
pub mod lifecycle;
pub mod logging;
pub mod medical_history;
pub mod models;
pub mod policy;
pub mod store;

// Re-export commonly used types
pub use config::RecordsConfig;
pub use ledger::{LedgerRow, TreatmentLedger};
pub use lifecycle::{ClinicalHistoryLifecycle, LifecycleError, Transition, ValidationError};
pub use medical_history::{MedicalHistory, MedicalHistoryNormalizer, MedicalHistoryView};
pub use models::{
    ClinicalHistory, DentalService, Guardian, HistoryState, HistoryStatus, Patient, Person,
    Treatment, TreatmentDraft,
};
pub use policy::{GuardianAssessment, GuardianPolicy, GuardianReason};
pub use store::{MemoryStore, RecordStore, StoreError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::Arc;

use chrono::NaiveDate;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ClinicRecordsError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not allowed: {0}")]
    PolicyError(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<LifecycleError> for ClinicRecordsError {
    fn from(e: LifecycleError) -> Self {
        match e {
            LifecycleError::Validation(e) => ClinicRecordsError::ValidationError(e.to_string()),
            LifecycleError::Policy(msg) => ClinicRecordsError::PolicyError(msg),
            e @ LifecycleError::InvalidTransition { .. } => {
                ClinicRecordsError::InvalidTransition(e.to_string())
            }
            LifecycleError::Transport(e) => ClinicRecordsError::TransportError(e.to_string()),
        }
    }
}

impl From<ValidationError> for ClinicRecordsError {
    fn from(e: ValidationError) -> Self {
        ClinicRecordsError::ValidationError(e.to_string())
    }
}

impl From<StoreError> for ClinicRecordsError {
    fn from(e: StoreError) -> Self {
        ClinicRecordsError::TransportError(e.to_string())
    }
}

impl From<serde_json::Error> for ClinicRecordsError {
    fn from(e: serde_json::Error) -> Self {
        ClinicRecordsError::SerializationError(e.to_string())
    }
}

impl From<config::ConfigError> for ClinicRecordsError {
    fn from(e: config::ConfigError) -> Self {
        ClinicRecordsError::InvalidInput(e.to_string())
    }
}

// =========================================================================
// Pure Functions (exported to FFI)
// =========================================================================

/// Install the tracing subscriber. `config_json` falls back to defaults.
#[uniffi::export]
pub fn init_logging(config_json: Option<String>) -> Result<(), ClinicRecordsError> {
    let config = parse_config(config_json)?;
    logging::init(&config);
    Ok(())
}

/// Age in whole years as of today, or `None` if the birthdate is unusable.
#[uniffi::export]
pub fn compute_age_from_birthdate(birthdate: String) -> Option<i32> {
    policy::compute_age(Some(birthdate.as_str()))
}

/// Guardian section state for a patient payload, as of today, with the
/// default thresholds. [`ClinicRecordsCore::guardian_assessment`] uses the
/// core's configuration.
#[uniffi::export]
pub fn patient_guardian_assessment(
    patient_json: String,
) -> Result<FfiGuardianAssessment, ClinicRecordsError> {
    assess_patient_json(&patient_json, &GuardianPolicy::default())
}

fn assess_patient_json(
    patient_json: &str,
    policy: &GuardianPolicy,
) -> Result<FfiGuardianAssessment, ClinicRecordsError> {
    let payload: models::PatientPayload = serde_json::from_str(patient_json)?;
    let patient = Patient::from(payload);
    Ok(policy.assess(&patient, chrono::Local::now().date_naive()).into())
}

/// Render a stored medical history (JSON or legacy quasi-JSON text).
#[uniffi::export]
pub fn normalize_medical_history(raw: String) -> FfiMedicalHistoryView {
    let history = medical_history::parse_str(&raw);
    MedicalHistoryNormalizer::new().normalize(&history).into()
}

/// Treatment table rows for a clinical history payload.
#[uniffi::export]
pub fn ledger_rows(history_json: String) -> Result<Vec<FfiLedgerRow>, ClinicRecordsError> {
    let payload: models::ClinicalHistoryPayload = serde_json::from_str(&history_json)?;
    let history = ClinicalHistory::from(payload);
    Ok(history.treatments.rows().into_iter().map(|r| r.into()).collect())
}

/// Trimmed closure reason, or the reason it would be rejected, with the
/// default length limit.
#[uniffi::export]
pub fn validate_closure_reason(reason: String) -> Result<String, ClinicRecordsError> {
    let max = RecordsConfig::default().closure_reason_max_chars;
    Ok(lifecycle::validate_closure_reason(&reason, max)?)
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Create a records core backed by an in-memory store.
#[uniffi::export]
pub fn open_records_in_memory(
    config_json: Option<String>,
) -> Result<Arc<ClinicRecordsCore>, ClinicRecordsError> {
    let config = parse_config(config_json)?;
    Ok(Arc::new(ClinicRecordsCore {
        store: MemoryStore::new(),
        config,
    }))
}

fn parse_config(config_json: Option<String>) -> Result<RecordsConfig, ClinicRecordsError> {
    match config_json {
        Some(json) => Ok(RecordsConfig::from_json_str(&json)?),
        None => Ok(RecordsConfig::default()),
    }
}

// =========================================================================
// Main API Object
// =========================================================================

/// Lifecycle operations over a shared store.
#[derive(uniffi::Object)]
pub struct ClinicRecordsCore {
    store: MemoryStore,
    config: RecordsConfig,
}

impl ClinicRecordsCore {
    fn lifecycle(&self) -> ClinicalHistoryLifecycle<'_, MemoryStore> {
        ClinicalHistoryLifecycle::with_config(&self.store, &self.config)
    }

    fn guardian_policy(&self) -> GuardianPolicy {
        GuardianPolicy::from_config(&self.config)
    }

    fn snapshot(&self, history: ClinicalHistory) -> FfiClinicalHistory {
        FfiClinicalHistory::from_history(history, &self.guardian_policy())
    }
}

#[uniffi::export]
impl ClinicRecordsCore {
    // =========================================================================
    // Seeding
    // =========================================================================

    /// Store a clinical history payload; returns its ID.
    pub fn insert_history_json(&self, history_json: String) -> Result<String, ClinicRecordsError> {
        let payload: models::ClinicalHistoryPayload = serde_json::from_str(&history_json)?;
        Ok(self.store.insert_history(payload))
    }

    /// Add a dental service to the catalog.
    pub fn add_dental_service(&self, service: FfiDentalService) {
        self.store.insert_service(service.into());
    }

    // =========================================================================
    // Policy Operations
    // =========================================================================

    /// Guardian section state with the configured age thresholds.
    pub fn guardian_assessment(
        &self,
        patient_json: String,
    ) -> Result<FfiGuardianAssessment, ClinicRecordsError> {
        assess_patient_json(&patient_json, &self.guardian_policy())
    }

    /// Closure reason check with the configured length limit.
    pub fn validate_closure_reason(&self, reason: String) -> Result<String, ClinicRecordsError> {
        let max = self.config.closure_reason_max_chars;
        Ok(lifecycle::validate_closure_reason(&reason, max)?)
    }

    // =========================================================================
    // Lifecycle Operations
    // =========================================================================

    pub fn load_history(
        &self,
        history_id: String,
    ) -> Result<FfiClinicalHistory, ClinicRecordsError> {
        let history = self.lifecycle().load(&history_id)?;
        Ok(self.snapshot(history))
    }

    pub fn close_history(
        &self,
        history_id: String,
        reason: String,
    ) -> Result<FfiClinicalHistory, ClinicRecordsError> {
        let lifecycle = self.lifecycle();
        let history = lifecycle.load(&history_id)?;
        Ok(self.snapshot(lifecycle.close(&history, &reason)?))
    }

    /// Reopen using the patient nested in the stored history.
    pub fn reopen_history(
        &self,
        history_id: String,
    ) -> Result<FfiClinicalHistory, ClinicRecordsError> {
        let lifecycle = self.lifecycle();
        let history = lifecycle.load(&history_id)?;
        let patient = history.patient.clone().ok_or_else(|| {
            ClinicRecordsError::InvalidInput(format!("history {} has no patient", history_id))
        })?;
        Ok(self.snapshot(lifecycle.reopen(&history, &patient)?))
    }

    pub fn add_treatment(
        &self,
        history_id: String,
        draft: FfiTreatmentDraft,
    ) -> Result<FfiClinicalHistory, ClinicRecordsError> {
        let draft = TreatmentDraft::try_from(draft)?;
        let lifecycle = self.lifecycle();
        let history = lifecycle.load(&history_id)?;
        Ok(self.snapshot(lifecycle.add_treatment(&history, &draft)?))
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe guardian assessment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiGuardianAssessment {
    pub age: Option<i32>,
    /// MINOR, ELDER, DISABILITY or NOT_REQUIRED
    pub reason: String,
    pub reason_label: String,
    pub requires_guardian: bool,
    pub show_guardian_info: bool,
}

impl From<GuardianAssessment> for FfiGuardianAssessment {
    fn from(assessment: GuardianAssessment) -> Self {
        let reason = match assessment.reason {
            GuardianReason::Minor => "MINOR",
            GuardianReason::Elder => "ELDER",
            GuardianReason::Disability => "DISABILITY",
            GuardianReason::NotRequired => "NOT_REQUIRED",
        };
        Self {
            age: assessment.age,
            reason: reason.to_string(),
            reason_label: assessment.reason.label().to_string(),
            requires_guardian: assessment.requires_guardian,
            show_guardian_info: assessment.show_guardian_info,
        }
    }
}

/// FFI-safe medical history line.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicalHistoryLine {
    pub key: String,
    pub title: String,
    pub value: String,
}

/// FFI-safe medical history view.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicalHistoryView {
    pub lines: Vec<FfiMedicalHistoryLine>,
    pub observations: String,
}

impl From<MedicalHistoryView> for FfiMedicalHistoryView {
    fn from(view: MedicalHistoryView) -> Self {
        Self {
            lines: view
                .lines
                .into_iter()
                .map(|line| FfiMedicalHistoryLine {
                    key: line.category.key().to_string(),
                    title: line.title.to_string(),
                    value: line.value,
                })
                .collect(),
            observations: view.observations,
        }
    }
}

/// FFI-safe ledger row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLedgerRow {
    pub sequence_label: String,
    pub date: String,
    pub name: String,
    pub doctor_name: String,
    pub reason: String,
    pub notes: String,
}

impl From<LedgerRow> for FfiLedgerRow {
    fn from(row: LedgerRow) -> Self {
        Self {
            sequence_label: row.sequence_label,
            date: row.date,
            name: row.name,
            doctor_name: row.doctor_name,
            reason: row.reason,
            notes: row.notes,
        }
    }
}

/// FFI-safe clinical history snapshot.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiClinicalHistory {
    pub id: String,
    pub patient_id: String,
    pub is_active: bool,
    pub closure_reason: Option<String>,
    pub reason: String,
    pub current_consultation_reason: String,
    pub symptoms: String,
    pub findings: Option<String>,
    pub doctor_signature: String,
    pub medical_history: FfiMedicalHistoryView,
    pub treatments: Vec<FfiLedgerRow>,
    /// Guardian section state of the nested patient, as of today
    pub guardian: Option<FfiGuardianAssessment>,
}

impl FfiClinicalHistory {
    fn from_history(history: ClinicalHistory, policy: &GuardianPolicy) -> Self {
        let medical_history = MedicalHistoryNormalizer::new()
            .normalize(&history.medical_history)
            .into();
        let today = chrono::Local::now().date_naive();
        let guardian = history
            .patient
            .as_ref()
            .map(|patient| policy.assess(patient, today).into());
        Self {
            guardian,
            is_active: history.is_active(),
            closure_reason: history.closure_reason().map(str::to_string),
            current_consultation_reason: history.current_consultation_reason().to_string(),
            treatments: history.treatments.rows().into_iter().map(|r| r.into()).collect(),
            medical_history,
            id: history.id,
            patient_id: history.patient_id,
            reason: history.reason,
            symptoms: history.symptoms,
            findings: history.findings,
            doctor_signature: history.doctor_signature,
        }
    }
}

/// FFI-safe dental service.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDentalService {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub is_active: bool,
}

impl From<FfiDentalService> for DentalService {
    fn from(service: FfiDentalService) -> Self {
        DentalService {
            id: service.id,
            name: service.name,
            description: service.description,
            price: service.price,
            is_active: service.is_active,
        }
    }
}

/// FFI-safe treatment draft.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTreatmentDraft {
    pub dental_service_id: String,
    /// `YYYY-MM-DD`
    pub treatment_date: String,
    pub notes: Option<String>,
}

impl TryFrom<FfiTreatmentDraft> for TreatmentDraft {
    type Error = ClinicRecordsError;

    fn try_from(draft: FfiTreatmentDraft) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(draft.treatment_date.trim(), "%Y-%m-%d").map_err(
            |_| ClinicRecordsError::InvalidInput(format!("bad date: {}", draft.treatment_date)),
        )?;
        let draft_out = TreatmentDraft::new(draft.dental_service_id, date);
        Ok(match draft.notes {
            Some(notes) => draft_out.with_notes(notes),
            None => draft_out,
        })
    }
}
