use serde::{Deserialize, Serialize};

use super::model::{Contact, Education, Experience, ResumeData, skills_without_nulls};

/// A partial résumé as returned by extraction or rewriting.
///
/// Absent or `null` keys stay `None` and leave the record untouched when
/// applied; present keys replace the corresponding top-level field whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experiences: Option<Vec<Experience>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<Education>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "skills_without_nulls"
    )]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
}

impl ResumePatch {
    /// Shallow-merges this patch into `data`.
    pub fn apply_to(self, data: &mut ResumeData) {
        if let Some(v) = self.full_name {
            data.full_name = v;
        }
        if let Some(v) = self.job_title {
            data.job_title = v;
        }
        if let Some(v) = self.summary {
            data.summary = v;
        }
        if let Some(v) = self.experiences {
            data.experiences = v;
        }
        if let Some(v) = self.education {
            data.education = v;
        }
        if let Some(v) = self.skills {
            data.skills = v;
        }
        if let Some(v) = self.contact {
            data.contact = v;
        }
    }

    /// Names of the fields this patch will overwrite, for logging.
    pub fn present_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.full_name.is_some() {
            fields.push("fullName");
        }
        if self.job_title.is_some() {
            fields.push("jobTitle");
        }
        if self.summary.is_some() {
            fields.push("summary");
        }
        if self.experiences.is_some() {
            fields.push("experiences");
        }
        if self.education.is_some() {
            fields.push("education");
        }
        if self.skills.is_some() {
            fields.push("skills");
        }
        if self.contact.is_some() {
            fields.push("contact");
        }
        fields
    }
}
