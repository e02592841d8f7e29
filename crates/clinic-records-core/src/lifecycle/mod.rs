//! Clinical history lifecycle.
//!
//! A history is either Active or Closed. Every accepted change follows the
//! same steps: validate locally, request the change from the store, then
//! re-read the history. The caller's copy is never patched in place.
//!
//! A failed re-read is reported as `Transport` even though the write itself
//! was accepted; callers should reload rather than repeat the request.

mod transition;

pub use transition::*;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::RecordsConfig;
use crate::models::{find_service, ClinicalHistory, HistoryState, Patient, TreatmentDraft};
use crate::store::{RecordStore, StatusChange, StoreError};

/// Lifecycle errors. Only a `Transport` error from the final re-read can
/// follow a change that was stored.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LifecycleError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not allowed: {0}")]
    Policy(String),

    #[error("Cannot {action} a {from} clinical history")]
    InvalidTransition {
        from: HistoryState,
        action: Transition,
    },

    #[error("{0}")]
    Transport(#[from] StoreError),
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Applies lifecycle transitions through a [`RecordStore`].
pub struct ClinicalHistoryLifecycle<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    max_reason_chars: usize,
}

impl<'a, S: RecordStore + ?Sized> ClinicalHistoryLifecycle<'a, S> {
    /// Create a lifecycle with the default limits.
    pub fn new(store: &'a S) -> Self {
        Self::with_config(store, &RecordsConfig::default())
    }

    pub fn with_config(store: &'a S, config: &RecordsConfig) -> Self {
        Self {
            store,
            max_reason_chars: config.closure_reason_max_chars,
        }
    }

    /// Fetch and canonicalize a history.
    pub fn load(&self, id: &str) -> LifecycleResult<ClinicalHistory> {
        let payload = self.store.fetch_clinical_history(id)?;
        Ok(ClinicalHistory::from(payload))
    }

    /// Close an active history. Returns the refetched history.
    pub fn close(
        &self,
        history: &ClinicalHistory,
        reason: &str,
    ) -> LifecycleResult<ClinicalHistory> {
        let change = plan_close(history, reason, self.max_reason_chars)
            .map_err(|e| rejected(history, Transition::Close, e))?;
        self.commit(history, Transition::Close, &change)
    }

    /// Reopen a closed history of an active patient. Returns the refetched history.
    pub fn reopen(
        &self,
        history: &ClinicalHistory,
        patient: &Patient,
    ) -> LifecycleResult<ClinicalHistory> {
        let change =
            plan_reopen(history, patient).map_err(|e| rejected(history, Transition::Reopen, e))?;
        self.commit(history, Transition::Reopen, &change)
    }

    /// Append a treatment to an active history. Returns the refetched history.
    ///
    /// A `Transport` error after the append was accepted means only the
    /// refetch failed: the treatment is stored, so reload instead of retrying.
    pub fn add_treatment(
        &self,
        history: &ClinicalHistory,
        draft: &TreatmentDraft,
    ) -> LifecycleResult<ClinicalHistory> {
        require_state(history, HistoryState::Active, Transition::AddTreatment)
            .map_err(|e| rejected(history, Transition::AddTreatment, e))?;

        let catalog = self.store.list_dental_services()?;
        let service = find_service(&catalog, &draft.dental_service_id).ok_or_else(|| {
            rejected(
                history,
                Transition::AddTreatment,
                ValidationError::UnknownDentalService(draft.dental_service_id.clone()).into(),
            )
        })?;
        if !service.is_active {
            return Err(rejected(
                history,
                Transition::AddTreatment,
                ValidationError::InactiveDentalService(service.name.clone()).into(),
            ));
        }

        let created = self.store.append_treatment(&history.id, &draft.to_request())?;
        info!(
            history_id = %history.id,
            treatment_id = created.id.as_deref().unwrap_or(""),
            service = %service.name,
            "Treatment added"
        );
        self.load(&history.id)
    }

    fn commit(
        &self,
        history: &ClinicalHistory,
        action: Transition,
        change: &StatusChange,
    ) -> LifecycleResult<ClinicalHistory> {
        let snapshot = self.store.set_status(&history.id, change)?;
        if !snapshot.reflects(change) {
            warn!(history_id = %history.id, %action, "Status change not applied by store");
            return Err(StoreError::Rejected("status change not applied".to_string()).into());
        }

        info!(
            history_id = %history.id,
            %action,
            is_active = change.is_active,
            "Transition applied"
        );
        self.load(&history.id)
    }
}

fn rejected(
    history: &ClinicalHistory,
    action: Transition,
    error: LifecycleError,
) -> LifecycleError {
    warn!(history_id = %history.id, %action, %error, "Transition rejected");
    error
}
