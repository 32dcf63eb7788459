//! Persistence for users, resumes and cover letters.
//!
//! Handlers only see `Arc<dyn ResumeStore>`. Production uses `PgStore`; tests swap in
//! the in-memory store.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::cover_letter::{CoverLetter, NewCoverLetter};
use crate::models::resume::{NewResume, Resume};
use crate::models::user::{UpsertUser, User};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn upsert_user(&self, user: UpsertUser) -> Result<User, sqlx::Error>;

    async fn create_resume(&self, resume: NewResume) -> Result<Resume, sqlx::Error>;

    async fn get_resume(&self, id: Uuid) -> Result<Option<Resume>, sqlx::Error>;

    /// Most recently updated first.
    async fn list_user_resumes(&self, user_id: &str) -> Result<Vec<Resume>, sqlx::Error>;

    /// Replaces every structured field of the stored row with `resume`'s values and bumps
    /// `updated_at`. Returns `None` when the row no longer exists.
    async fn update_resume(&self, resume: &Resume) -> Result<Option<Resume>, sqlx::Error>;

    /// Deletes the resume and, by cascade, its cover letters.
    async fn delete_resume(&self, id: Uuid) -> Result<(), sqlx::Error>;

    async fn create_cover_letter(&self, letter: NewCoverLetter) -> Result<CoverLetter, sqlx::Error>;

    /// The most recently created cover letter for a resume.
    async fn latest_cover_letter(&self, resume_id: Uuid)
        -> Result<Option<CoverLetter>, sqlx::Error>;
}
