//! Person and guardian models.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::non_blank;
use super::payload::{GuardianPayload, PersonPayload};

/// Identity data shared by patients and guardians.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Person {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub first_surname: String,
    pub second_surname: Option<String>,
    /// Document kind (e.g., "CC", "TI", "CE")
    pub document_type: String,
    pub document_number: String,
    /// Birthdate as stored; parsed on demand by [`crate::policy::compute_age`]
    pub birthdate: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Person {
    /// Canonicalize person data: nested value first, flattened value as fallback.
    ///
    /// Returns `None` when neither source carries any data.
    pub fn from_payloads(nested: Option<&PersonPayload>, flat: &PersonPayload) -> Option<Self> {
        let nested = nested.filter(|p| !p.is_blank());
        if nested.is_none() && flat.is_blank() {
            return None;
        }

        Some(Self {
            first_name: pick(nested, flat, |p| &p.first_name).unwrap_or_default(),
            middle_name: pick(nested, flat, |p| &p.middle_name),
            first_surname: pick(nested, flat, |p| &p.first_surname).unwrap_or_default(),
            second_surname: pick(nested, flat, |p| &p.second_surname),
            document_type: pick(nested, flat, |p| &p.document_type).unwrap_or_default(),
            document_number: pick(nested, flat, |p| &p.document_number).unwrap_or_default(),
            birthdate: pick(nested, flat, |p| &p.birthdate),
            phone: pick(nested, flat, |p| &p.phone),
            email: pick(nested, flat, |p| &p.email),
        })
    }

    /// Full display name, skipping absent parts.
    pub fn full_name(&self) -> String {
        [
            Some(self.first_name.as_str()),
            self.middle_name.as_deref(),
            Some(self.first_surname.as_str()),
            self.second_surname.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Document rendered as "CC 1234".
    pub fn document_label(&self) -> String {
        format!("{} {}", self.document_type, self.document_number)
            .trim()
            .to_string()
    }
}

fn pick(
    nested: Option<&PersonPayload>,
    flat: &PersonPayload,
    field: fn(&PersonPayload) -> &Option<String>,
) -> Option<String> {
    nested
        .and_then(|p| non_blank(field(p)))
        .or_else(|| non_blank(field(flat)))
}

/// Relationship of a guardian to the patient.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RelationshipType {
    Father,
    Mother,
    Grandfather,
    Grandmother,
    Son,
    Daughter,
    #[serde(rename = "Legal_Guardian")]
    LegalGuardian,
    Brother,
    Sister,
    Other,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 10] = [
        Self::Father,
        Self::Mother,
        Self::Grandfather,
        Self::Grandmother,
        Self::Son,
        Self::Daughter,
        Self::LegalGuardian,
        Self::Brother,
        Self::Sister,
        Self::Other,
    ];

    /// Parse a stored relationship value. Unknown values map to `Other`.
    pub fn parse(value: &str) -> Self {
        let key: String = value
            .trim()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c.to_ascii_lowercase() })
            .collect();

        match key.as_str() {
            "father" => Self::Father,
            "mother" => Self::Mother,
            "grandfather" => Self::Grandfather,
            "grandmother" => Self::Grandmother,
            "son" => Self::Son,
            "daughter" => Self::Daughter,
            "legal_guardian" | "legalguardian" => Self::LegalGuardian,
            "brother" => Self::Brother,
            "sister" => Self::Sister,
            _ => Self::Other,
        }
    }

    /// Wire name of the relationship.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Father => "Father",
            Self::Mother => "Mother",
            Self::Grandfather => "Grandfather",
            Self::Grandmother => "Grandmother",
            Self::Son => "Son",
            Self::Daughter => "Daughter",
            Self::LegalGuardian => "Legal_Guardian",
            Self::Brother => "Brother",
            Self::Sister => "Sister",
            Self::Other => "Other",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Father => "Padre",
            Self::Mother => "Madre",
            Self::Grandfather => "Abuelo",
            Self::Grandmother => "Abuela",
            Self::Son => "Hijo",
            Self::Daughter => "Hija",
            Self::LegalGuardian => "Tutor legal",
            Self::Brother => "Hermano",
            Self::Sister => "Hermana",
            Self::Other => "Otro",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A legally responsible person associated with a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Guardian {
    /// May be missing when the service returns a dangling guardian record
    pub person: Option<Person>,
    pub relationship_type: RelationshipType,
}

impl From<GuardianPayload> for Guardian {
    fn from(payload: GuardianPayload) -> Self {
        Self {
            person: Person::from_payloads(payload.person.as_ref(), &payload.flat),
            relationship_type: payload
                .relationship_type
                .as_deref()
                .map(RelationshipType::parse)
                .unwrap_or(RelationshipType::Other),
        }
    }
}
