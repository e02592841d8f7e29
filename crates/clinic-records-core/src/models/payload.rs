//! Wire payloads as returned by the records service.
//!
//! Every field is optional or defaulted so that a partial record never fails to
//! deserialize. Nothing outside [`crate::models`] should read these directly:
//! they are canonicalized once into [`Patient`](super::Patient),
//! [`ClinicalHistory`](super::ClinicalHistory) and friends.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Person fields, either nested under `person` or flattened onto the owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PersonPayload {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub first_surname: Option<String>,
    pub second_surname: Option<String>,
    pub document_type: Option<String>,
    pub document_number: Option<String>,
    pub birthdate: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl PersonPayload {
    /// True when no field carries a non-blank value.
    pub fn is_blank(&self) -> bool {
        [
            &self.first_name,
            &self.middle_name,
            &self.first_surname,
            &self.second_surname,
            &self.document_type,
            &self.document_number,
            &self.birthdate,
            &self.phone,
            &self.email,
        ]
        .iter()
        .all(|field| field.as_deref().map_or(true, |v| v.trim().is_empty()))
    }
}

/// Guardian as sent by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GuardianPayload {
    pub person: Option<PersonPayload>,
    #[serde(flatten)]
    pub flat: PersonPayload,
    pub relationship_type: Option<String>,
}

/// Patient as sent by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PatientPayload {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Option<String>,
    pub person: Option<PersonPayload>,
    #[serde(flatten)]
    pub flat: PersonPayload,
    pub has_disability: Option<bool>,
    pub disability_description: Option<String>,
    pub blood_group: Option<String>,
    pub occupation: Option<String>,
    pub is_active: Option<bool>,
    pub guardian: Option<GuardianPayload>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Treatment as sent by the service.
///
/// The displayed reason has historically been stored under four different keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TreatmentPayload {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Option<String>,
    pub date: Option<String>,
    /// Older endpoints send the date under this key; `date` wins when both are set
    pub treatment_date: Option<String>,
    pub name: Option<String>,
    pub doctor_name: Option<String>,
    pub reason: Option<String>,
    pub treatment_reason: Option<String>,
    pub motive: Option<String>,
    pub motivo: Option<String>,
    pub notes: Option<String>,
    #[serde(deserialize_with = "deserialize_id")]
    pub dental_service_id: Option<String>,
}

/// Clinical history as sent by the service, with nested patient and treatments.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClinicalHistoryPayload {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Option<String>,
    #[serde(deserialize_with = "deserialize_id")]
    pub patient_id: Option<String>,
    pub patient: Option<PatientPayload>,
    pub is_active: Option<bool>,
    pub closure_reason: Option<String>,
    pub reason: Option<String>,
    pub symptoms: Option<String>,
    pub findings: Option<String>,
    pub doctor_signature: Option<String>,
    /// Object, quasi-JSON string, or null.
    pub medical_history: Value,
    pub treatments: Vec<TreatmentPayload>,
    pub created_at: Option<String>,
}

/// Identifiers arrive as strings or bare numbers depending on the endpoint.
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Like [`deserialize_id`] for identifiers that must be present.
pub(crate) fn deserialize_required_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_id(deserializer)?.ok_or_else(|| serde::de::Error::custom("missing identifier"))
}
