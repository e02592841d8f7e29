//! Pure validation half of the lifecycle transitions.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::{LifecycleError, LifecycleResult};
use crate::models::{ClinicalHistory, HistoryState, Patient};
use crate::store::StatusChange;

/// Input rejected before anything is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("closure reason is required")]
    BlankClosureReason,

    #[error("closure reason is too long ({len} characters, at most {max})")]
    ClosureReasonTooLong { len: usize, max: usize },

    #[error("unknown dental service: {0}")]
    UnknownDentalService(String),

    #[error("dental service is no longer offered: {0}")]
    InactiveDentalService(String),
}

/// A lifecycle operation, for error reporting.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Close,
    Reopen,
    AddTreatment,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Close => f.write_str("close"),
            Self::Reopen => f.write_str("reopen"),
            Self::AddTreatment => f.write_str("add treatment"),
        }
    }
}

/// Trim and length-check a closure reason. Length counts characters, not bytes.
pub fn validate_closure_reason(reason: &str, max_chars: usize) -> Result<String, ValidationError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(ValidationError::BlankClosureReason);
    }
    let len = reason.chars().count();
    if len > max_chars {
        return Err(ValidationError::ClosureReasonTooLong { len, max: max_chars });
    }
    Ok(reason.to_string())
}

/// Check that `history` can be closed with `reason`.
pub fn plan_close(
    history: &ClinicalHistory,
    reason: &str,
    max_chars: usize,
) -> LifecycleResult<StatusChange> {
    require_state(history, HistoryState::Active, Transition::Close)?;
    let reason = validate_closure_reason(reason, max_chars)?;
    Ok(StatusChange {
        is_active: false,
        closure_reason: Some(reason),
    })
}

/// Check that `history` can be reopened for `patient`.
///
/// `patient` must be the history's owner when the history names one. The
/// owner nested in the history must be active too.
pub fn plan_reopen(history: &ClinicalHistory, patient: &Patient) -> LifecycleResult<StatusChange> {
    require_state(history, HistoryState::Closed, Transition::Reopen)?;
    if !history.patient_id.is_empty() && patient.id.as_deref() != Some(history.patient_id.as_str())
    {
        return Err(LifecycleError::Policy(
            "cannot reopen: patient does not own this clinical history".to_string(),
        ));
    }
    let owner_active = history.patient.as_ref().map_or(true, |owner| owner.is_active);
    if !patient.is_active || !owner_active {
        return Err(LifecycleError::Policy(
            "cannot reopen: patient inactive".to_string(),
        ));
    }
    Ok(StatusChange {
        is_active: true,
        closure_reason: None,
    })
}

pub(crate) fn require_state(
    history: &ClinicalHistory,
    expected: HistoryState,
    action: Transition,
) -> LifecycleResult<()> {
    let from = history.state();
    if from == expected {
        Ok(())
    } else {
        Err(LifecycleError::InvalidTransition { from, action })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClinicalHistoryPayload;

    fn history(is_active: bool) -> ClinicalHistory {
        ClinicalHistory::from(ClinicalHistoryPayload {
            id: Some("1".into()),
            is_active: Some(is_active),
            closure_reason: (!is_active).then(|| "Alta".to_string()),
            ..Default::default()
        })
    }

    fn patient(is_active: bool) -> Patient {
        Patient {
            is_active,
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_closure_reason() {
        assert_eq!(
            validate_closure_reason("  Tratamiento finalizado  ", 500).unwrap(),
            "Tratamiento finalizado"
        );
        assert_eq!(
            validate_closure_reason("", 500),
            Err(ValidationError::BlankClosureReason)
        );
        assert_eq!(
            validate_closure_reason(" \n\t ", 500),
            Err(ValidationError::BlankClosureReason)
        );
    }

    #[test]
    fn test_closure_reason_length_in_characters() {
        assert!(validate_closure_reason(&"x".repeat(500), 500).is_ok());
        assert_eq!(
            validate_closure_reason(&"x".repeat(501), 500),
            Err(ValidationError::ClosureReasonTooLong { len: 501, max: 500 })
        );
        // 500 two-byte characters still fit
        assert!(validate_closure_reason(&"ñ".repeat(500), 500).is_ok());
    }

    #[test]
    fn test_plan_close() {
        let change = plan_close(&history(true), "valid reason", 500).unwrap();
        assert!(!change.is_active);
        assert_eq!(change.closure_reason.as_deref(), Some("valid reason"));
    }

    #[test]
    fn test_plan_close_already_closed() {
        // State is checked before the reason
        assert_eq!(
            plan_close(&history(false), "", 500),
            Err(LifecycleError::InvalidTransition {
                from: HistoryState::Closed,
                action: Transition::Close,
            })
        );
    }

    fn owned_closed_history(owner_active: bool) -> ClinicalHistory {
        ClinicalHistory::from(ClinicalHistoryPayload {
            id: Some("1".into()),
            is_active: Some(false),
            closure_reason: Some("Alta".into()),
            patient: Some(crate::models::PatientPayload {
                id: Some("4".into()),
                is_active: Some(owner_active),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    #[test]
    fn test_plan_reopen_requires_owner() {
        let history = owned_closed_history(true);
        let stranger = Patient {
            id: Some("999".into()),
            is_active: true,
            ..Default::default()
        };
        assert_eq!(
            plan_reopen(&history, &stranger),
            Err(LifecycleError::Policy(
                "cannot reopen: patient does not own this clinical history".into()
            ))
        );

        let owner = history.patient.clone().unwrap();
        assert!(plan_reopen(&history, &owner).is_ok());
    }

    #[test]
    fn test_plan_reopen_checks_nested_owner() {
        let history = owned_closed_history(false);
        let caller_copy = Patient {
            id: Some("4".into()),
            is_active: true,
            ..Default::default()
        };
        assert_eq!(
            plan_reopen(&history, &caller_copy),
            Err(LifecycleError::Policy("cannot reopen: patient inactive".into()))
        );
    }

    #[test]
    fn test_plan_reopen() {
        let change = plan_reopen(&history(false), &patient(true)).unwrap();
        assert!(change.is_active);
        assert!(change.closure_reason.is_none());

        assert!(matches!(
            plan_reopen(&history(false), &patient(false)),
            Err(LifecycleError::Policy(_))
        ));
        assert!(matches!(
            plan_reopen(&history(true), &patient(false)),
            Err(LifecycleError::InvalidTransition { .. })
        ));
    }
}
