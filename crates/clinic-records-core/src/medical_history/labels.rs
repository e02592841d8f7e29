//! Code→label tables for coded medical-history answers.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{NOT_SPECIFIED, NOT_SPECIFIED_PLURAL};

/// A coded medical-history question.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HistoryCategory {
    GeneralPathologies,
    AnesthesiaTolerance,
    BreathingCondition,
    CoagulationCondition,
    CurrentMedication,
    PreviousTreatments,
    Allergies,
}

impl HistoryCategory {
    /// Display order.
    pub const ALL: [HistoryCategory; 7] = [
        Self::GeneralPathologies,
        Self::AnesthesiaTolerance,
        Self::BreathingCondition,
        Self::CoagulationCondition,
        Self::CurrentMedication,
        Self::PreviousTreatments,
        Self::Allergies,
    ];

    /// Key in the stored payload.
    pub fn key(&self) -> &'static str {
        match self {
            Self::GeneralPathologies => "general_pathologies",
            Self::AnesthesiaTolerance => "anesthesia_tolerance",
            Self::BreathingCondition => "breathing_condition",
            Self::CoagulationCondition => "coagulation_condition",
            Self::CurrentMedication => "current_medication",
            Self::PreviousTreatments => "previous_treatments",
            Self::Allergies => "allergies",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    /// Section title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::GeneralPathologies => "Patologías generales",
            Self::AnesthesiaTolerance => "Tolerancia a la anestesia",
            Self::BreathingCondition => "Condición respiratoria",
            Self::CoagulationCondition => "Condición de coagulación",
            Self::CurrentMedication => "Medicación actual",
            Self::PreviousTreatments => "Tratamientos previos",
            Self::Allergies => "Alergias",
        }
    }

    /// Categories answered with a list of codes.
    pub fn is_list_shaped(&self) -> bool {
        matches!(
            self,
            Self::GeneralPathologies
                | Self::CurrentMedication
                | Self::PreviousTreatments
                | Self::Allergies
        )
    }

    /// Free-text categories are shown verbatim.
    pub fn uses_table(&self) -> bool {
        !matches!(self, Self::CoagulationCondition)
    }

    /// Marker for a missing or empty answer.
    pub fn empty_label(&self) -> &'static str {
        if self.is_list_shaped() {
            NOT_SPECIFIED_PLURAL
        } else {
            NOT_SPECIFIED
        }
    }
}

impl fmt::Display for HistoryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

pub const GENERAL_PATHOLOGIES: &[(&str, &str)] = &[
    ("none", "Ninguna"),
    ("diabetes", "Diabetes"),
    ("hypertension", "Hipertensión arterial"),
    ("heart_disease", "Cardiopatía"),
    ("asthma", "Asma"),
    ("epilepsy", "Epilepsia"),
    ("hepatitis", "Hepatitis"),
    ("hiv", "VIH"),
    ("cancer", "Cáncer"),
    ("kidney_disease", "Enfermedad renal"),
    ("thyroid_disorder", "Trastorno tiroideo"),
    ("gastritis", "Gastritis"),
];

pub const ANESTHESIA_TOLERANCE: &[(&str, &str)] = &[
    ("good", "Buena"),
    ("regular", "Regular"),
    ("bad", "Mala"),
    ("unknown", "Desconoce"),
    ("never_received", "Nunca ha recibido anestesia"),
];

pub const BREATHING_CONDITION: &[(&str, &str)] = &[
    ("normal", "Normal"),
    ("nasal", "Respiración nasal"),
    ("oral", "Respiración oral"),
    ("mixed", "Respiración mixta"),
    ("sleep_apnea", "Apnea del sueño"),
];

pub const CURRENT_MEDICATION: &[(&str, &str)] = &[
    ("none", "Ninguno"),
    ("anticoagulants", "Anticoagulantes"),
    ("antihypertensives", "Antihipertensivos"),
    ("insulin", "Insulina"),
    ("antibiotics", "Antibióticos"),
    ("analgesics", "Analgésicos"),
    ("corticosteroids", "Corticoides"),
    ("bisphosphonates", "Bifosfonatos"),
    ("anticonvulsants", "Anticonvulsivos"),
    ("other", "Otro"),
];

pub const PREVIOUS_TREATMENTS: &[(&str, &str)] = &[
    ("none", "Ninguno"),
    ("orthodontics", "Ortodoncia"),
    ("endodontics", "Endodoncia"),
    ("extractions", "Extracciones"),
    ("implants", "Implantes"),
    ("periodontics", "Periodoncia"),
    ("prosthesis", "Prótesis"),
    ("oral_surgery", "Cirugía oral"),
    ("whitening", "Blanqueamiento"),
];

pub const ALLERGIES: &[(&str, &str)] = &[
    ("none", "Ninguna"),
    ("penicillin", "Penicilina"),
    ("latex", "Látex"),
    ("local_anesthetics", "Anestésicos locales"),
    ("nsaids", "AINEs"),
    ("iodine", "Yodo"),
    ("sulfonamides", "Sulfonamidas"),
    ("other", "Otra"),
];

/// Label tables per category.
#[derive(Debug, Clone)]
pub struct OptionLabels {
    tables: HashMap<HistoryCategory, HashMap<String, String>>,
}

impl Default for OptionLabels {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionLabels {
    /// Create the tables with the default codes.
    pub fn new() -> Self {
        let mut tables = HashMap::new();
        for category in HistoryCategory::ALL {
            tables.insert(category, Self::default_table(category));
        }
        Self { tables }
    }

    /// Label for a code, case-insensitive. `None` for unknown codes and for
    /// categories shown verbatim.
    pub fn lookup(&self, category: HistoryCategory, code: &str) -> Option<&str> {
        if !category.uses_table() {
            return None;
        }
        self.tables
            .get(&category)?
            .get(&code.trim().to_lowercase())
            .map(String::as_str)
    }

    /// Register an extra code, e.g. one added upstream after this release.
    pub fn add_label(&mut self, category: HistoryCategory, code: &str, label: &str) {
        self.tables
            .entry(category)
            .or_default()
            .insert(code.trim().to_lowercase(), label.to_string());
    }

    fn default_table(category: HistoryCategory) -> HashMap<String, String> {
        let entries: &[(&str, &str)] = match category {
            HistoryCategory::GeneralPathologies => GENERAL_PATHOLOGIES,
            HistoryCategory::AnesthesiaTolerance => ANESTHESIA_TOLERANCE,
            HistoryCategory::BreathingCondition => BREATHING_CONDITION,
            HistoryCategory::CoagulationCondition => &[],
            HistoryCategory::CurrentMedication => CURRENT_MEDICATION,
            HistoryCategory::PreviousTreatments => PREVIOUS_TREATMENTS,
            HistoryCategory::Allergies => ALLERGIES,
        };
        entries
            .iter()
            .map(|(code, label)| (code.to_string(), label.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_case_insensitive() {
        let labels = OptionLabels::new();
        assert_eq!(labels.lookup(HistoryCategory::Allergies, "latex"), Some("Látex"));
        assert_eq!(labels.lookup(HistoryCategory::Allergies, "LATEX"), Some("Látex"));
        assert_eq!(labels.lookup(HistoryCategory::Allergies, "pollen"), None);
    }

    #[test]
    fn test_coagulation_has_no_table() {
        let mut labels = OptionLabels::new();
        labels.add_label(HistoryCategory::CoagulationCondition, "normal", "Normal");
        assert_eq!(labels.lookup(HistoryCategory::CoagulationCondition, "normal"), None);
    }

    #[test]
    fn test_add_label() {
        let mut labels = OptionLabels::new();
        labels.add_label(HistoryCategory::GeneralPathologies, "Osteoporosis", "Osteoporosis");
        assert_eq!(
            labels.lookup(HistoryCategory::GeneralPathologies, "osteoporosis"),
            Some("Osteoporosis")
        );
    }

    #[test]
    fn test_tables_have_unique_codes() {
        for table in [
            GENERAL_PATHOLOGIES,
            ANESTHESIA_TOLERANCE,
            BREATHING_CONDITION,
            CURRENT_MEDICATION,
            PREVIOUS_TREATMENTS,
            ALLERGIES,
        ] {
            let mut codes: Vec<_> = table.iter().map(|(code, _)| *code).collect();
            let total = codes.len();
            codes.sort_unstable();
            codes.dedup();
            assert_eq!(codes.len(), total);
        }
    }

    #[test]
    fn test_keys_round_trip() {
        for category in HistoryCategory::ALL {
            assert_eq!(HistoryCategory::from_key(category.key()), Some(category));
        }
        assert_eq!(HistoryCategory::from_key("symptoms"), None);
    }

    #[test]
    fn test_empty_labels() {
        assert_eq!(HistoryCategory::Allergies.empty_label(), "No especificados");
        assert_eq!(HistoryCategory::BreathingCondition.empty_label(), "No especificado");
    }
}
