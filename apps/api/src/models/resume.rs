use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Visual layout applied to a resume for preview and export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    #[default]
    Modern,
    Minimal,
    Executive,
}

impl TemplateId {
    pub const ALL: [TemplateId; 3] = [TemplateId::Modern, TemplateId::Minimal, TemplateId::Executive];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::Modern => "modern",
            TemplateId::Minimal => "minimal",
            TemplateId::Executive => "executive",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateId::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown template '{s}'"))
    }
}

// Stored JSONB sub-objects default missing fields so rows edited out-of-band still load.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    /// Professional title, e.g. "Senior Backend Engineer".
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: Option<String>,
}

impl PersonalInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub position: String,
    pub company: String,
    pub start_date: String,
    pub end_date: Option<String>,
    /// Currently employed here; the end date is ignored for display.
    pub current: bool,
    pub description: String,
}

impl Experience {
    /// "2021-03 - Present" style date range used by every template.
    pub fn date_range(&self) -> String {
        let end = match (&self.end_date, self.current) {
            (_, true) => "Present",
            (Some(end), false) if !end.is_empty() => end.as_str(),
            _ => "Present",
        };
        format!("{} - {}", self.start_date, end)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub degree: String,
    pub school: String,
    pub graduation_date: String,
    pub gpa: Option<String>,
}

/// A validated resume submission. Produced only by `schema::form::ResumeInput::validate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeForm {
    pub title: String,
    pub personal_info: PersonalInfo,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    pub template_id: TemplateId,
    pub job_description: Option<String>,
}

/// A persisted resume as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub personal_info: PersonalInfo,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    /// Denormalized copy of `personal_info.summary`.
    pub summary: Option<String>,
    pub template_id: TemplateId,
    pub job_description: Option<String>,
    pub match_score: Option<i32>,
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resume {
    /// The structured content of this resume in submission shape.
    pub fn to_form(&self) -> ResumeForm {
        ResumeForm {
            title: self.title.clone(),
            personal_info: self.personal_info.clone(),
            experience: self.experience.clone(),
            education: self.education.clone(),
            skills: self.skills.clone(),
            template_id: self.template_id,
            job_description: self.job_description.clone(),
        }
    }
}

/// Values for a resume insert. Ids and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewResume {
    pub user_id: String,
    pub form: ResumeForm,
    pub match_score: Option<i32>,
    pub is_premium: bool,
}

impl NewResume {
    pub fn summary(&self) -> Option<String> {
        self.form.personal_info.summary.clone()
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub personal_info: Json<PersonalInfo>,
    pub experience: Json<Vec<Experience>>,
    pub education: Json<Vec<Education>>,
    pub skills: Vec<String>,
    pub summary: Option<String>,
    pub template_id: String,
    pub job_description: Option<String>,
    pub match_score: Option<i32>,
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ResumeRow> for Resume {
    fn from(row: ResumeRow) -> Self {
        Resume {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            personal_info: row.personal_info.0,
            experience: row.experience.0,
            education: row.education.0,
            skills: row.skills,
            summary: row.summary,
            // Unknown ids in storage render with the default layout.
            template_id: row.template_id.parse().unwrap_or_default(),
            job_description: row.job_description,
            match_score: row.match_score,
            is_premium: row.is_premium,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
