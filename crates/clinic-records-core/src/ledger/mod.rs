//! Append-only treatment ledger.
//!
//! Entries are never edited or removed; the only mutation is [`TreatmentLedger::append`].

mod rows;

pub use rows::*;

use serde::Serialize;

use crate::models::{non_blank, Treatment, TreatmentPayload};

/// Notes shown when a treatment was recorded without any.
pub const NO_REMARKS: &str = "Sin observaciones";

/// Ordered treatments of one clinical history.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct TreatmentLedger {
    entries: Vec<Treatment>,
}

impl TreatmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger by appending payloads in service order.
    pub fn from_payloads(payloads: impl IntoIterator<Item = TreatmentPayload>) -> Self {
        let mut ledger = Self::new();
        for payload in payloads {
            ledger.append(payload);
        }
        ledger
    }

    /// Append a treatment at the end, resolving its derived fields.
    pub fn append(&mut self, payload: TreatmentPayload) -> &Treatment {
        let treatment = Treatment {
            sequence: self.entries.len(),
            reason: resolve_reason(&payload),
            notes: non_blank(&payload.notes).unwrap_or_else(|| NO_REMARKS.to_string()),
            id: payload.id,
            date: non_blank(&payload.date).or_else(|| non_blank(&payload.treatment_date)),
            name: payload.name.unwrap_or_default(),
            doctor_name: payload.doctor_name.unwrap_or_default(),
            dental_service_id: payload.dental_service_id,
        };
        self.entries.push(treatment);
        &self.entries[self.entries.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Treatment> {
        self.entries.get(index)
    }

    pub fn last(&self) -> Option<&Treatment> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Treatment> {
        self.entries.iter()
    }

    /// Reason of the latest treatment, else the history's intake reason.
    pub fn current_consultation_reason<'a>(&'a self, intake_reason: &'a str) -> &'a str {
        self.last()
            .and_then(|t| t.reason.as_deref())
            .filter(|reason| !reason.is_empty())
            .unwrap_or(intake_reason)
    }
}

impl<'a> IntoIterator for &'a TreatmentLedger {
    type Item = &'a Treatment;
    type IntoIter = std::slice::Iter<'a, Treatment>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// First non-empty of `reason`, `treatment_reason`, `motive`, `motivo`.
pub fn resolve_reason(payload: &TreatmentPayload) -> Option<String> {
    [
        &payload.reason,
        &payload.treatment_reason,
        &payload.motive,
        &payload.motivo,
    ]
    .into_iter()
    .find_map(non_blank)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> TreatmentPayload {
        TreatmentPayload {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_append_motive_fallback() {
        let mut ledger = TreatmentLedger::from_payloads(vec![named("Profilaxis")]);
        let before = ledger.len();

        let entry = ledger
            .append(TreatmentPayload {
                motive: Some("pain".into()),
                ..Default::default()
            })
            .clone();

        assert_eq!(ledger.len(), before + 1);
        assert_eq!(entry.sequence, before);
        assert_eq!(entry.reason.as_deref(), Some("pain"));
    }

    #[test]
    fn test_reason_precedence() {
        let payload = TreatmentPayload {
            reason: Some("  ".into()),
            treatment_reason: Some("Sensibilidad".into()),
            motive: Some("pain".into()),
            motivo: Some("dolor".into()),
            ..Default::default()
        };
        assert_eq!(resolve_reason(&payload).as_deref(), Some("Sensibilidad"));

        let payload = TreatmentPayload {
            motivo: Some("dolor".into()),
            ..Default::default()
        };
        assert_eq!(resolve_reason(&payload).as_deref(), Some("dolor"));

        assert_eq!(resolve_reason(&TreatmentPayload::default()), None);
    }

    #[test]
    fn test_notes_default() {
        let mut ledger = TreatmentLedger::new();
        assert_eq!(ledger.append(named("Resina")).notes, NO_REMARKS);

        let entry = ledger.append(TreatmentPayload {
            notes: Some("   ".into()),
            ..Default::default()
        });
        assert_eq!(entry.notes, NO_REMARKS);

        let entry = ledger.append(TreatmentPayload {
            notes: Some("Control en 8 días".into()),
            ..Default::default()
        });
        assert_eq!(entry.notes, "Control en 8 días");
    }

    #[test]
    fn test_date_key_fallback() {
        let mut ledger = TreatmentLedger::new();
        let entry = ledger.append(TreatmentPayload {
            treatment_date: Some("2024-01-09".into()),
            ..Default::default()
        });
        assert_eq!(entry.date.as_deref(), Some("2024-01-09"));

        let entry = ledger.append(TreatmentPayload {
            date: Some("2024-01-10".into()),
            treatment_date: Some("2024-01-09".into()),
            ..Default::default()
        });
        assert_eq!(entry.date.as_deref(), Some("2024-01-10"));

        let entry = ledger.append(TreatmentPayload {
            date: Some("  ".into()),
            treatment_date: Some("2024-01-09".into()),
            ..Default::default()
        });
        assert_eq!(entry.date.as_deref(), Some("2024-01-09"));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let ledger = TreatmentLedger::from_payloads(vec![
            named("Profilaxis"),
            named("Resina"),
            named("Endodoncia"),
        ]);

        let names: Vec<_> = ledger.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Profilaxis", "Resina", "Endodoncia"]);

        let sequences: Vec<_> = ledger.iter().map(|t| t.sequence).collect();
        assert_eq!(sequences, [0, 1, 2]);
    }

    #[test]
    fn test_current_consultation_reason() {
        let mut ledger = TreatmentLedger::new();
        assert_eq!(ledger.current_consultation_reason("Control"), "Control");

        ledger.append(TreatmentPayload {
            reason: Some("Fractura".into()),
            ..Default::default()
        });
        assert_eq!(ledger.current_consultation_reason("Control"), "Fractura");

        // Only the last entry counts
        ledger.append(named("Pulido"));
        assert_eq!(ledger.current_consultation_reason("Control"), "Control");
    }
}
