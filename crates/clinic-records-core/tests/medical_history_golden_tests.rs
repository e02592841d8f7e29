//! Golden tests for medical history normalization.
//!
//! Each case is a stored payload as found in historical rows and the text the
//! presentation layer should show for it.

use clinic_records_core::medical_history::{
    HistoryCategory, MedicalHistoryNormalizer, NOT_SPECIFIED, NOT_SPECIFIED_PLURAL,
};
use serde_json::{json, Value};

/// Test case from golden file.
struct GoldenCase {
    id: &'static str,
    raw: Value,
    expected: Vec<(HistoryCategory, &'static str)>,
    expected_observations: &'static str,
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "structured-object",
            raw: json!({
                "general_pathologies": ["diabetes", "hypertension"],
                "anesthesia_tolerance": "good",
                "breathing_condition": "nasal",
                "coagulation_condition": "Normal",
                "current_medication": ["insulin"],
                "previous_treatments": ["orthodontics", "extractions"],
                "allergies": ["penicillin"],
                "observations": "Control glicémico estable"
            }),
            expected: vec![
                (HistoryCategory::GeneralPathologies, "Diabetes, Hipertensión arterial"),
                (HistoryCategory::AnesthesiaTolerance, "Buena"),
                (HistoryCategory::BreathingCondition, "Respiración nasal"),
                (HistoryCategory::CoagulationCondition, "Normal"),
                (HistoryCategory::CurrentMedication, "Insulina"),
                (HistoryCategory::PreviousTreatments, "Ortodoncia, Extracciones"),
                (HistoryCategory::Allergies, "Penicilina"),
            ],
            expected_observations: "Control glicémico estable",
        },
        GoldenCase {
            id: "python-dict-text",
            raw: json!(concat!(
                "{'general_pathologies': ['asthma'], 'allergies': None, ",
                "'anesthesia_tolerance': 'regular', 'pregnant': False}"
            )),
            expected: vec![
                (HistoryCategory::GeneralPathologies, "Asma"),
                (HistoryCategory::AnesthesiaTolerance, "Regular"),
                (HistoryCategory::Allergies, NOT_SPECIFIED_PLURAL),
                (HistoryCategory::BreathingCondition, NOT_SPECIFIED),
            ],
            expected_observations: NOT_SPECIFIED,
        },
        GoldenCase {
            id: "json-text",
            raw: json!(r#"{"allergies": ["latex", "iodine"], "observations": "  "}"#),
            expected: vec![(HistoryCategory::Allergies, "Látex, Yodo")],
            expected_observations: NOT_SPECIFIED,
        },
        GoldenCase {
            id: "apostrophe-in-observations",
            raw: json!(r#"{'observations': 'Refiere "miedo" al torno, no tolera l\'anestesia'}"#),
            expected: vec![(HistoryCategory::CurrentMedication, NOT_SPECIFIED_PLURAL)],
            expected_observations: r#"Refiere "miedo" al torno, no tolera l'anestesia"#,
        },
        GoldenCase {
            id: "unknown-codes-pass-through",
            raw: json!({
                "current_medication": ["metformin", "insulin"],
                "breathing_condition": "Ronquido"
            }),
            expected: vec![
                (HistoryCategory::CurrentMedication, "metformin, Insulina"),
                (HistoryCategory::BreathingCondition, "Ronquido"),
            ],
            expected_observations: NOT_SPECIFIED,
        },
        GoldenCase {
            id: "null-payload",
            raw: Value::Null,
            expected: vec![
                (HistoryCategory::GeneralPathologies, NOT_SPECIFIED_PLURAL),
                (HistoryCategory::AnesthesiaTolerance, NOT_SPECIFIED),
            ],
            expected_observations: NOT_SPECIFIED,
        },
        GoldenCase {
            id: "garbage-text",
            raw: json!("not json at all"),
            expected: vec![
                (HistoryCategory::Allergies, NOT_SPECIFIED_PLURAL),
                (HistoryCategory::CoagulationCondition, NOT_SPECIFIED),
            ],
            expected_observations: NOT_SPECIFIED,
        },
        GoldenCase {
            id: "top-level-array",
            raw: json!("['latex']"),
            expected: vec![(HistoryCategory::Allergies, NOT_SPECIFIED_PLURAL)],
            expected_observations: NOT_SPECIFIED,
        },
        GoldenCase {
            id: "truncated-text",
            raw: json!("{'allergies': ['latex'"),
            expected: vec![(HistoryCategory::Allergies, NOT_SPECIFIED_PLURAL)],
            expected_observations: NOT_SPECIFIED,
        },
    ]
}

#[test]
fn test_golden_cases() {
    let normalizer = MedicalHistoryNormalizer::new();

    for case in get_golden_cases() {
        let view = normalizer.normalize_raw(&case.raw);

        assert_eq!(
            view.lines.len(),
            HistoryCategory::ALL.len(),
            "Case {}: every category must render",
            case.id
        );

        for (category, expected) in &case.expected {
            let line = view.get(*category).unwrap();
            assert_eq!(
                line.value, *expected,
                "Case {}: {} mismatch",
                case.id, category
            );
        }

        assert_eq!(
            view.observations, case.expected_observations,
            "Case {}: observations mismatch",
            case.id
        );
    }
}

#[test]
fn test_no_line_is_ever_blank() {
    let normalizer = MedicalHistoryNormalizer::new();

    for case in get_golden_cases() {
        let view = normalizer.normalize_raw(&case.raw);
        for line in &view.lines {
            assert!(
                !line.value.trim().is_empty(),
                "Case {}: {} rendered blank",
                case.id,
                line.category
            );
        }
    }
}

#[test]
fn test_display_order_and_titles() {
    let view = MedicalHistoryNormalizer::new().normalize_raw(&Value::Null);
    let titles: Vec<_> = view.lines.iter().map(|line| line.title).collect();

    assert_eq!(
        titles,
        [
            "Patologías generales",
            "Tolerancia a la anestesia",
            "Condición respiratoria",
            "Condición de coagulación",
            "Medicación actual",
            "Tratamientos previos",
            "Alergias",
        ]
    );
}
