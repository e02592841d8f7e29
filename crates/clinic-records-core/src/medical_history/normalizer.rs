//! Human-readable rendering of a medical-history record.

use serde::Serialize;
use serde_json::Value;

use super::labels::{HistoryCategory, OptionLabels};
use super::{parse, MedicalHistory, NOT_SPECIFIED};

/// Free-text key rendered under the coded categories.
pub const OBSERVATIONS_KEY: &str = "observations";

/// One rendered category.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MedicalHistoryLine {
    pub category: HistoryCategory,
    pub title: &'static str,
    pub value: String,
}

/// A medical history ready for display.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MedicalHistoryView {
    /// One line per category, in display order
    pub lines: Vec<MedicalHistoryLine>,
    pub observations: String,
}

impl MedicalHistoryView {
    pub fn get(&self, category: HistoryCategory) -> Option<&MedicalHistoryLine> {
        self.lines.iter().find(|line| line.category == category)
    }
}

/// Maps coded answers to display labels.
pub struct MedicalHistoryNormalizer {
    labels: OptionLabels,
}

impl Default for MedicalHistoryNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MedicalHistoryNormalizer {
    /// Create a normalizer with the default label tables.
    pub fn new() -> Self {
        Self::with_labels(OptionLabels::new())
    }

    pub fn with_labels(labels: OptionLabels) -> Self {
        Self { labels }
    }

    pub fn labels(&self) -> &OptionLabels {
        &self.labels
    }

    pub fn labels_mut(&mut self) -> &mut OptionLabels {
        &mut self.labels
    }

    /// Render one answer: a single code or an ordered list of codes.
    ///
    /// Unknown codes pass through verbatim; empty answers render the
    /// category's "not specified" marker.
    pub fn map_option(&self, value: Option<&Value>, category: HistoryCategory) -> String {
        let codes = codes_of(value);
        if codes.is_empty() {
            return category.empty_label().to_string();
        }

        codes
            .iter()
            .map(|code| {
                self.labels
                    .lookup(category, code)
                    .map(str::to_string)
                    .unwrap_or_else(|| code.clone())
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Render every category of a parsed record.
    pub fn normalize(&self, history: &MedicalHistory) -> MedicalHistoryView {
        let lines = HistoryCategory::ALL
            .into_iter()
            .map(|category| MedicalHistoryLine {
                category,
                title: category.title(),
                value: self.map_option(history.get(category.key()), category),
            })
            .collect();

        let observations = history
            .get(OBSERVATIONS_KEY)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(NOT_SPECIFIED)
            .to_string();

        MedicalHistoryView {
            lines,
            observations,
        }
    }

    /// Parse then render a raw payload.
    pub fn normalize_raw(&self, raw: &Value) -> MedicalHistoryView {
        self.normalize(&parse(raw))
    }
}

/// Scalar codes of an answer, blanks dropped. Objects carry no codes.
fn codes_of(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_code).collect(),
        Some(other) => scalar_code(other).into_iter().collect(),
        None => Vec::new(),
    }
}

fn scalar_code(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
