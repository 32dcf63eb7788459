use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::cover_letter::{CoverLetter, NewCoverLetter};
use crate::models::resume::{NewResume, Resume};
use crate::models::user::{UpsertUser, User};
use crate::store::ResumeStore;

/// In-process store with the same cascade rules as the SQL schema.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    resumes: HashMap<Uuid, Resume>,
    cover_letters: Vec<CoverLetter>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a row directly, bypassing the API, the way an operator would.
    pub fn put_resume(&self, resume: Resume) {
        let mut tables = self.inner.lock().unwrap();
        tables.resumes.insert(resume.id, resume);
    }

    pub fn user(&self, id: &str) -> Option<User> {
        self.inner.lock().unwrap().users.get(id).cloned()
    }

    pub fn cover_letter_count(&self, resume_id: Uuid) -> usize {
        let tables = self.inner.lock().unwrap();
        tables
            .cover_letters
            .iter()
            .filter(|l| l.resume_id == resume_id)
            .count()
    }

    /// Deletes a user with the `ON DELETE CASCADE` chain applied.
    pub fn delete_user(&self, id: &str) {
        let mut tables = self.inner.lock().unwrap();
        tables.users.remove(id);
        let removed: Vec<Uuid> = tables
            .resumes
            .values()
            .filter(|r| r.user_id == id)
            .map(|r| r.id)
            .collect();
        for resume_id in removed {
            tables.resumes.remove(&resume_id);
            tables.cover_letters.retain(|l| l.resume_id != resume_id);
        }
    }
}

#[async_trait]
impl ResumeStore for MemoryStore {
    async fn upsert_user(&self, user: UpsertUser) -> Result<User, sqlx::Error> {
        let mut tables = self.inner.lock().unwrap();
        let now = Utc::now();
        let created_at = tables.users.get(&user.id).map_or(now, |u| u.created_at);
        let row = User {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            profile_image_url: user.profile_image_url,
            created_at,
            updated_at: now,
        };
        tables.users.insert(row.id.clone(), row.clone());
        Ok(row)
    }

    async fn create_resume(&self, resume: NewResume) -> Result<Resume, sqlx::Error> {
        let mut tables = self.inner.lock().unwrap();
        if !tables.users.contains_key(&resume.user_id) {
            return Err(sqlx::Error::Protocol(format!(
                "foreign key violation: user {} does not exist",
                resume.user_id
            )));
        }
        let now = Utc::now();
        let summary = resume.summary();
        let row = Resume {
            id: Uuid::new_v4(),
            user_id: resume.user_id,
            title: resume.form.title,
            personal_info: resume.form.personal_info,
            experience: resume.form.experience,
            education: resume.form.education,
            skills: resume.form.skills,
            summary,
            template_id: resume.form.template_id,
            job_description: resume.form.job_description,
            match_score: resume.match_score,
            is_premium: resume.is_premium,
            created_at: now,
            updated_at: now,
        };
        tables.resumes.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_resume(&self, id: Uuid) -> Result<Option<Resume>, sqlx::Error> {
        Ok(self.inner.lock().unwrap().resumes.get(&id).cloned())
    }

    async fn list_user_resumes(&self, user_id: &str) -> Result<Vec<Resume>, sqlx::Error> {
        let tables = self.inner.lock().unwrap();
        let mut resumes: Vec<Resume> = tables
            .resumes
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        resumes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(resumes)
    }

    async fn update_resume(&self, resume: &Resume) -> Result<Option<Resume>, sqlx::Error> {
        let mut tables = self.inner.lock().unwrap();
        let Some(stored) = tables.resumes.get_mut(&resume.id) else {
            return Ok(None);
        };
        let created_at = stored.created_at;
        let user_id = stored.user_id.clone();
        *stored = Resume {
            user_id,
            created_at,
            updated_at: Utc::now(),
            ..resume.clone()
        };
        Ok(Some(stored.clone()))
    }

    async fn delete_resume(&self, id: Uuid) -> Result<(), sqlx::Error> {
        let mut tables = self.inner.lock().unwrap();
        tables.resumes.remove(&id);
        tables.cover_letters.retain(|l| l.resume_id != id);
        Ok(())
    }

    async fn create_cover_letter(&self, letter: NewCoverLetter) -> Result<CoverLetter, sqlx::Error> {
        let mut tables = self.inner.lock().unwrap();
        if !tables.resumes.contains_key(&letter.resume_id) {
            return Err(sqlx::Error::Protocol(format!(
                "foreign key violation: resume {} does not exist",
                letter.resume_id
            )));
        }
        let row = CoverLetter {
            id: Uuid::new_v4(),
            resume_id: letter.resume_id,
            content: letter.content,
            tone: letter.tone,
            job_description: letter.job_description,
            created_at: Utc::now(),
        };
        tables.cover_letters.push(row.clone());
        Ok(row)
    }

    async fn latest_cover_letter(
        &self,
        resume_id: Uuid,
    ) -> Result<Option<CoverLetter>, sqlx::Error> {
        let tables = self.inner.lock().unwrap();
        // max_by_key keeps the last maximum, so later inserts win ties on created_at.
        Ok(tables
            .cover_letters
            .iter()
            .filter(|l| l.resume_id == resume_id)
            .max_by_key(|l| l.created_at)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cover_letter::tone::Tone;
    use crate::models::resume::{PersonalInfo, ResumeForm, TemplateId};

    fn new_resume(user_id: &str) -> NewResume {
        NewResume {
            user_id: user_id.to_string(),
            form: ResumeForm {
                title: "SWE".to_string(),
                personal_info: PersonalInfo {
                    summary: Some("Summary".to_string()),
                    ..Default::default()
                },
                experience: vec![],
                education: vec![],
                skills: vec!["Rust".to_string()],
                template_id: TemplateId::Modern,
                job_description: None,
            },
            match_score: None,
            is_premium: false,
        }
    }

    async fn seeded_user(store: &MemoryStore, id: &str) {
        store
            .upsert_user(UpsertUser {
                id: id.to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_copies_summary_from_personal_info() {
        let store = MemoryStore::new();
        seeded_user(&store, "u1").await;
        let resume = store.create_resume(new_resume("u1")).await.unwrap();
        assert_eq!(resume.summary.as_deref(), Some("Summary"));
    }

    #[tokio::test]
    async fn test_create_requires_existing_user() {
        let store = MemoryStore::new();
        assert!(store.create_resume(new_resume("ghost")).await.is_err());
    }

    #[tokio::test]
    async fn test_user_delete_cascades_to_resumes_and_letters() {
        let store = MemoryStore::new();
        seeded_user(&store, "u1").await;
        let resume = store.create_resume(new_resume("u1")).await.unwrap();
        store
            .create_cover_letter(NewCoverLetter {
                resume_id: resume.id,
                content: "Dear team".to_string(),
                tone: Tone::Professional,
                job_description: None,
            })
            .await
            .unwrap();

        store.delete_user("u1");

        assert!(store.get_resume(resume.id).await.unwrap().is_none());
        assert_eq!(store.cover_letter_count(resume.id), 0);
    }

    #[tokio::test]
    async fn test_latest_cover_letter_is_most_recent() {
        let store = MemoryStore::new();
        seeded_user(&store, "u1").await;
        let resume = store.create_resume(new_resume("u1")).await.unwrap();
        for content in ["first", "second"] {
            store
                .create_cover_letter(NewCoverLetter {
                    resume_id: resume.id,
                    content: content.to_string(),
                    tone: Tone::Friendly,
                    job_description: None,
                })
                .await
                .unwrap();
        }
        let latest = store.latest_cover_letter(resume.id).await.unwrap().unwrap();
        assert_eq!(latest.content, "second");
    }
}
