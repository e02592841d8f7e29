//! Guardian necessity and visibility.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::RecordsConfig;
use crate::models::Patient;

/// Why a patient needs a guardian. Exactly one reason applies to any input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuardianReason {
    Minor,
    Elder,
    Disability,
    NotRequired,
}

impl GuardianReason {
    pub fn requires_guardian(&self) -> bool {
        !matches!(self, Self::NotRequired)
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Minor => "Menor de edad",
            Self::Elder => "Adulto mayor",
            Self::Disability => "Persona con discapacidad",
            Self::NotRequired => "No requiere",
        }
    }
}

/// Age thresholds for guardian necessity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardianPolicy {
    /// Patients younger than this need a guardian
    pub minor_age: i32,
    /// Patients older than this need a guardian
    pub elder_age: i32,
}

impl Default for GuardianPolicy {
    fn default() -> Self {
        Self::from_config(&RecordsConfig::default())
    }
}

/// Everything the presentation layer needs to render the guardian section.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GuardianAssessment {
    pub age: Option<i32>,
    pub reason: GuardianReason,
    pub requires_guardian: bool,
    pub show_guardian_info: bool,
}

impl GuardianPolicy {
    pub fn from_config(config: &RecordsConfig) -> Self {
        Self {
            minor_age: config.minor_age,
            elder_age: config.elder_age,
        }
    }

    /// Ordered checks: minor, then elder, then disability.
    ///
    /// An unknown age skips the age checks.
    pub fn reason(&self, age: Option<i32>, has_disability: bool) -> GuardianReason {
        match age {
            Some(age) if age < self.minor_age => GuardianReason::Minor,
            Some(age) if age > self.elder_age => GuardianReason::Elder,
            _ if has_disability => GuardianReason::Disability,
            _ => GuardianReason::NotRequired,
        }
    }

    pub fn reason_for(&self, patient: &Patient, today: NaiveDate) -> GuardianReason {
        self.reason(patient.age_on(today), patient.has_disability)
    }

    pub fn requires_guardian(&self, patient: &Patient, today: NaiveDate) -> bool {
        self.reason_for(patient, today).requires_guardian()
    }

    /// A guardian on file is shown only while the patient actually needs one.
    pub fn should_show_guardian_info(&self, patient: &Patient, today: NaiveDate) -> bool {
        patient.guardian_person().is_some() && self.requires_guardian(patient, today)
    }

    pub fn assess(&self, patient: &Patient, today: NaiveDate) -> GuardianAssessment {
        let age = patient.age_on(today);
        let reason = self.reason(age, patient.has_disability);
        GuardianAssessment {
            age,
            reason,
            requires_guardian: reason.requires_guardian(),
            show_guardian_info: patient.guardian_person().is_some() && reason.requires_guardian(),
        }
    }
}

/// [`GuardianPolicy::reason`] with the default thresholds.
pub fn guardian_reason(age: Option<i32>, has_disability: bool) -> GuardianReason {
    GuardianPolicy::default().reason(age, has_disability)
}

/// Whether the patient needs a guardian as of the local date.
pub fn requires_guardian(patient: &Patient) -> bool {
    GuardianPolicy::default().requires_guardian(patient, chrono::Local::now().date_naive())
}

/// Whether guardian details should be displayed as of the local date.
pub fn should_show_guardian_info(patient: &Patient) -> bool {
    GuardianPolicy::default().should_show_guardian_info(patient, chrono::Local::now().date_naive())
}
