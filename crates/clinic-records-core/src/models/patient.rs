//! Patient models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::payload::PatientPayload;
use super::non_blank;
use super::person::{Guardian, Person};
use crate::policy;

/// A clinic patient, canonicalized from whatever shape the service returned.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Service ID
    pub id: Option<String>,
    /// Identity data
    pub person: Person,
    /// Whether the patient has a declared disability
    pub has_disability: bool,
    pub disability_description: Option<String>,
    /// Blood group (e.g., "O+")
    pub blood_group: Option<String>,
    pub occupation: Option<String>,
    /// Inactive patients cannot have their clinical histories reopened
    pub is_active: bool,
    /// Guardian on file, if any
    pub guardian: Option<Guardian>,
    /// Creation timestamp
    pub created_at: Option<String>,
    /// Last update timestamp
    pub updated_at: Option<String>,
}

impl Patient {
    /// Create an active patient with only identity data.
    pub fn new(person: Person) -> Self {
        Self {
            person,
            is_active: true,
            created_at: Some(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
    }

    /// Age in whole years on `today`, if the birthdate is known.
    pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
        policy::compute_age_on(self.person.birthdate.as_deref(), today)
    }

    /// Age in whole years as of the local date.
    pub fn age(&self) -> Option<i32> {
        policy::compute_age(self.person.birthdate.as_deref())
    }

    /// Guardian person, when both the guardian record and its person exist.
    pub fn guardian_person(&self) -> Option<&Person> {
        self.guardian.as_ref().and_then(|g| g.person.as_ref())
    }
}

impl From<PatientPayload> for Patient {
    fn from(payload: PatientPayload) -> Self {
        Self {
            id: payload.id,
            person: Person::from_payloads(payload.person.as_ref(), &payload.flat)
                .unwrap_or_default(),
            has_disability: payload.has_disability.unwrap_or(false),
            disability_description: non_blank(&payload.disability_description),
            blood_group: non_blank(&payload.blood_group),
            occupation: non_blank(&payload.occupation),
            // Records are created active; an absent flag means nobody deactivated it
            is_active: payload.is_active.unwrap_or(true),
            guardian: payload.guardian.map(Guardian::from),
            created_at: payload.created_at,
            updated_at: payload.updated_at,
        }
    }
}
