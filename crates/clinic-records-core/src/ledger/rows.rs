//! Display rows for the treatment table.

use serde::Serialize;

use super::TreatmentLedger;
use crate::medical_history::NOT_SPECIFIED;
use crate::models::Treatment;
use crate::policy::parse_date;

/// One treatment, formatted for display.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LedgerRow {
    /// "01", "02", ...
    pub sequence_label: String,
    pub date: String,
    pub name: String,
    pub doctor_name: String,
    pub reason: String,
    pub notes: String,
}

impl From<&Treatment> for LedgerRow {
    fn from(treatment: &Treatment) -> Self {
        Self {
            sequence_label: sequence_label(treatment.sequence),
            date: treatment
                .date
                .as_deref()
                .map(display_date)
                .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            name: or_not_specified(&treatment.name),
            doctor_name: or_not_specified(&treatment.doctor_name),
            reason: treatment
                .reason
                .clone()
                .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            notes: treatment.notes.clone(),
        }
    }
}

impl TreatmentLedger {
    /// Display rows in ledger order.
    pub fn rows(&self) -> Vec<LedgerRow> {
        self.iter().map(LedgerRow::from).collect()
    }
}

/// 1-based label for a 0-based sequence, at least two digits wide.
pub fn sequence_label(sequence: usize) -> String {
    format!("{:02}", sequence + 1)
}

/// `DD/MM/YYYY` when the value parses as a date, else the value as stored.
fn display_date(value: &str) -> String {
    match parse_date(value) {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None if value.trim().is_empty() => NOT_SPECIFIED.to_string(),
        None => value.to_string(),
    }
}

fn or_not_specified(value: &str) -> String {
    if value.trim().is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::NO_REMARKS;
    use crate::models::TreatmentPayload;

    #[test]
    fn test_sequence_labels() {
        assert_eq!(sequence_label(0), "01");
        assert_eq!(sequence_label(8), "09");
        assert_eq!(sequence_label(9), "10");
        assert_eq!(sequence_label(99), "100");
    }

    #[test]
    fn test_rows() {
        let ledger = TreatmentLedger::from_payloads(vec![
            TreatmentPayload {
                date: Some("2024-03-05".into()),
                name: Some("Profilaxis".into()),
                doctor_name: Some("Dra. Pérez".into()),
                motivo: Some("Limpieza".into()),
                ..Default::default()
            },
            TreatmentPayload {
                date: Some("2024-03-19T10:00:00Z".into()),
                name: Some("Resina".into()),
                notes: Some("Pieza 36".into()),
                ..Default::default()
            },
        ]);
        let rows = ledger.rows();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sequence_label, "01");
        assert_eq!(rows[0].date, "05/03/2024");
        assert_eq!(rows[0].reason, "Limpieza");
        assert_eq!(rows[0].notes, NO_REMARKS);

        assert_eq!(rows[1].sequence_label, "02");
        assert_eq!(rows[1].date, "19/03/2024");
        assert_eq!(rows[1].doctor_name, NOT_SPECIFIED);
        assert_eq!(rows[1].reason, NOT_SPECIFIED);
        assert_eq!(rows[1].notes, "Pieza 36");
    }

    #[test]
    fn test_unparseable_date_shown_verbatim() {
        assert_eq!(display_date("marzo 2024"), "marzo 2024");
        assert_eq!(display_date(""), NOT_SPECIFIED);
    }
}
