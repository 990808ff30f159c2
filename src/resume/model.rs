use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::media::DataUri;

/// Writing style requested from the AI when rewriting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Formal,
    #[default]
    Modern,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tone::Formal => write!(f, "formal"),
            Tone::Modern => write!(f, "modern"),
        }
    }
}

/// Declared résumé length. Stored with the record but never consulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Length {
    Short,
    #[default]
    Full,
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Short => write!(f, "short"),
            Length::Full => write!(f, "full"),
        }
    }
}

/// Reads a JSON `null` as the empty string. Models fill unknown values
/// with `null` as often as they omit them.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A skill list with `null` entries dropped; `null` for the whole list is empty.
fn skill_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(skills_without_nulls(deserializer)?.unwrap_or_default())
}

/// Like [`skill_list`] but keeps a `null` list distinct from an empty one.
pub(super) fn skills_without_nulls<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    let list = Option::<Vec<Option<String>>>::deserialize(deserializer)?;
    Ok(list.map(|skills| skills.into_iter().flatten().collect()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    #[serde(deserialize_with = "null_as_empty")]
    pub company: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub position: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub period: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    #[serde(deserialize_with = "null_as_empty")]
    pub institution: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub degree: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

/// The single record threaded through a wizard session.
///
/// `Default` is the empty record a session starts with and returns to on
/// restart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    pub full_name: String,
    pub job_title: String,
    pub summary: String,
    pub experiences: Vec<Experience>,
    pub education: Vec<Education>,
    #[serde(deserialize_with = "skill_list")]
    pub skills: Vec<String>,
    pub contact: Contact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<DataUri>,
    pub tone: Tone,
    pub length: Length,
}

/// Editable top-level text fields, including the contact block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    FullName,
    JobTitle,
    Summary,
    Email,
    Phone,
    Location,
    Linkedin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceField {
    Company,
    Position,
    Period,
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EducationField {
    Institution,
    Degree,
    Year,
}

/// Error returned when a field name typed by the user is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for ProfileField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" | "fullname" | "full_name" => Ok(Self::FullName),
            "title" | "jobtitle" | "job_title" => Ok(Self::JobTitle),
            "summary" => Ok(Self::Summary),
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            "location" => Ok(Self::Location),
            "linkedin" => Ok(Self::Linkedin),
            _ => Err(UnknownField(s.to_string())),
        }
    }
}

impl FromStr for ExperienceField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "company" => Ok(Self::Company),
            "position" => Ok(Self::Position),
            "period" => Ok(Self::Period),
            "description" => Ok(Self::Description),
            _ => Err(UnknownField(s.to_string())),
        }
    }
}

impl FromStr for EducationField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "institution" => Ok(Self::Institution),
            "degree" => Ok(Self::Degree),
            "year" => Ok(Self::Year),
            _ => Err(UnknownField(s.to_string())),
        }
    }
}

impl Experience {
    pub fn set(&mut self, field: ExperienceField, value: String) {
        match field {
            ExperienceField::Company => self.company = value,
            ExperienceField::Position => self.position = value,
            ExperienceField::Period => self.period = value,
            ExperienceField::Description => self.description = value,
        }
    }
}

impl Education {
    pub fn set(&mut self, field: EducationField, value: String) {
        match field {
            EducationField::Institution => self.institution = value,
            EducationField::Degree => self.degree = value,
            EducationField::Year => self.year = value,
        }
    }
}

impl ResumeData {
    pub fn set(&mut self, field: ProfileField, value: String) {
        match field {
            ProfileField::FullName => self.full_name = value,
            ProfileField::JobTitle => self.job_title = value,
            ProfileField::Summary => self.summary = value,
            ProfileField::Email => self.contact.email = value,
            ProfileField::Phone => self.contact.phone = value,
            ProfileField::Location => self.contact.location = value,
            ProfileField::Linkedin => {
                self.contact.linkedin = (!value.trim().is_empty()).then_some(value);
            }
        }
    }
}
