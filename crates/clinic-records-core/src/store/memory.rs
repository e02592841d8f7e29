//! In-process [`RecordStore`], for tests and embedders without a service.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tracing::debug;
use uuid::Uuid;

use super::{RecordStore, StatusChange, StatusSnapshot, StoreError, StoreResult};
use crate::models::{ClinicalHistoryPayload, DentalService, NewTreatment, TreatmentPayload};

#[derive(Default)]
struct MemoryState {
    histories: HashMap<String, ClinicalHistoryPayload>,
    services: Vec<DentalService>,
    fetch_count: usize,
    fail_next: Option<StoreError>,
    ignore_status_changes: bool,
}

/// Records held in memory behind a mutex.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    doctor_name: String,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Doctor recorded on appended treatments.
    pub fn with_doctor(mut self, doctor_name: impl Into<String>) -> Self {
        self.doctor_name = doctor_name.into();
        self
    }

    /// Insert or replace a history. Histories without an ID get a fresh one,
    /// which is returned.
    pub fn insert_history(&self, mut history: ClinicalHistoryPayload) -> String {
        let id = history
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        history.id = Some(id.clone());
        self.lock().histories.insert(id.clone(), history);
        id
    }

    pub fn insert_service(&self, service: DentalService) {
        self.lock().services.push(service);
    }

    /// Number of `fetch_clinical_history` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.lock().fetch_count
    }

    /// Fail the next call with `error`.
    pub fn fail_next(&self, error: StoreError) {
        self.lock().fail_next = Some(error);
    }

    /// Acknowledge status changes without applying them.
    pub fn ignore_status_changes(&self, ignore: bool) {
        self.lock().ignore_status_changes = ignore;
    }

    // A poisoned lock only means another test thread panicked mid-call; the
    // maps are still structurally valid.
    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn take_failure(state: &mut MemoryState) -> StoreResult<()> {
        match state.fail_next.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl RecordStore for MemoryStore {
    fn fetch_clinical_history(&self, id: &str) -> StoreResult<ClinicalHistoryPayload> {
        let mut state = self.lock();
        state.fetch_count += 1;
        Self::take_failure(&mut state)?;
        state
            .histories
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("clinical history {}", id)))
    }

    fn append_treatment(
        &self,
        history_id: &str,
        treatment: &NewTreatment,
    ) -> StoreResult<TreatmentPayload> {
        let mut state = self.lock();
        Self::take_failure(&mut state)?;

        let name = state
            .services
            .iter()
            .find(|s| s.id == treatment.dental_service_id)
            .map(|s| s.name.clone())
            .ok_or_else(|| {
                StoreError::Rejected(format!(
                    "unknown dental service {}",
                    treatment.dental_service_id
                ))
            })?;

        let history = state
            .histories
            .get_mut(history_id)
            .ok_or_else(|| StoreError::NotFound(format!("clinical history {}", history_id)))?;

        let created = TreatmentPayload {
            id: Some(Uuid::new_v4().to_string()),
            date: Some(treatment.treatment_date.clone()),
            name: Some(name),
            doctor_name: Some(self.doctor_name.clone()),
            notes: treatment.notes.clone(),
            dental_service_id: Some(treatment.dental_service_id.clone()),
            ..Default::default()
        };
        history.treatments.push(created.clone());
        debug!(history_id, treatments = history.treatments.len(), "Treatment stored");
        Ok(created)
    }

    fn set_status(&self, history_id: &str, change: &StatusChange) -> StoreResult<StatusSnapshot> {
        let mut state = self.lock();
        Self::take_failure(&mut state)?;
        let ignore = state.ignore_status_changes;

        let history = state
            .histories
            .get_mut(history_id)
            .ok_or_else(|| StoreError::NotFound(format!("clinical history {}", history_id)))?;

        if !ignore {
            history.is_active = Some(change.is_active);
            history.closure_reason = change.closure_reason.clone();
        }
        debug!(history_id, is_active = change.is_active, applied = !ignore, "Status stored");

        Ok(StatusSnapshot {
            id: history_id.to_string(),
            is_active: history.is_active.unwrap_or(true),
            closure_reason: history.closure_reason.clone(),
        })
    }

    fn list_dental_services(&self) -> StoreResult<Vec<DentalService>> {
        let mut state = self.lock();
        Self::take_failure(&mut state)?;
        Ok(state.services.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_history() -> (MemoryStore, String) {
        let store = MemoryStore::new().with_doctor("Dra. Pérez");
        store.insert_service(DentalService::new("7", "Profilaxis"));
        let id = store.insert_history(ClinicalHistoryPayload {
            id: Some("h-1".into()),
            ..Default::default()
        });
        (store, id)
    }

    #[test]
    fn test_insert_assigns_id() {
        let store = MemoryStore::new();
        let id = store.insert_history(ClinicalHistoryPayload::default());
        assert!(!id.is_empty());
        assert_eq!(store.fetch_clinical_history(&id).unwrap().id, Some(id));
    }

    #[test]
    fn test_fetch_counts_calls() {
        let (store, id) = store_with_history();
        store.fetch_clinical_history(&id).unwrap();
        assert!(store.fetch_clinical_history("missing").is_err());
        assert_eq!(store.fetch_count(), 2);
    }

    #[test]
    fn test_append_treatment() {
        let (store, id) = store_with_history();
        let request = NewTreatment {
            dental_service_id: "7".into(),
            treatment_date: "2024-03-05".into(),
            notes: None,
        };
        let created = store.append_treatment(&id, &request).unwrap();

        assert_eq!(created.name.as_deref(), Some("Profilaxis"));
        assert_eq!(created.doctor_name.as_deref(), Some("Dra. Pérez"));
        assert_eq!(store.fetch_clinical_history(&id).unwrap().treatments.len(), 1);
    }

    #[test]
    fn test_append_unknown_service_rejected() {
        let (store, id) = store_with_history();
        let request = NewTreatment {
            dental_service_id: "99".into(),
            treatment_date: "2024-03-05".into(),
            notes: None,
        };
        assert!(matches!(
            store.append_treatment(&id, &request),
            Err(StoreError::Rejected(_))
        ));
    }

    #[test]
    fn test_set_status() {
        let (store, id) = store_with_history();
        let change = StatusChange {
            is_active: false,
            closure_reason: Some("Alta".into()),
        };
        let snapshot = store.set_status(&id, &change).unwrap();
        assert!(snapshot.reflects(&change));

        let stored = store.fetch_clinical_history(&id).unwrap();
        assert_eq!(stored.is_active, Some(false));
        assert_eq!(stored.closure_reason.as_deref(), Some("Alta"));
    }

    #[test]
    fn test_ignored_status_change() {
        let (store, id) = store_with_history();
        store.ignore_status_changes(true);
        let change = StatusChange {
            is_active: false,
            closure_reason: Some("Alta".into()),
        };
        let snapshot = store.set_status(&id, &change).unwrap();
        assert!(!snapshot.reflects(&change));
    }

    #[test]
    fn test_fail_next_is_one_shot() {
        let (store, id) = store_with_history();
        store.fail_next(StoreError::Transport("timeout".into()));
        assert_eq!(
            store.fetch_clinical_history(&id),
            Err(StoreError::Transport("timeout".into()))
        );
        assert!(store.fetch_clinical_history(&id).is_ok());
    }
}
