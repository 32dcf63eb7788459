use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::cover_letter::tone::Tone;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetter {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub content: String,
    pub tone: Tone,
    /// Job description the letter was written against.
    pub job_description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCoverLetter {
    pub resume_id: Uuid,
    pub content: String,
    pub tone: Tone,
    pub job_description: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CoverLetterRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub content: String,
    pub tone: String,
    pub job_description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CoverLetterRow> for CoverLetter {
    fn from(row: CoverLetterRow) -> Self {
        CoverLetter {
            id: row.id,
            resume_id: row.resume_id,
            content: row.content,
            tone: row.tone.parse().unwrap_or_default(),
            job_description: row.job_description,
            created_at: row.created_at,
        }
    }
}
