use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::cover_letter::{CoverLetter, CoverLetterRow, NewCoverLetter};
use crate::models::resume::{NewResume, Resume, ResumeRow};
use crate::models::user::{UpsertUser, User};
use crate::store::ResumeStore;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeStore for PgStore {
    async fn upsert_user(&self, user: UpsertUser) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, first_name, last_name, profile_image_url)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                profile_image_url = EXCLUDED.profile_image_url,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.profile_image_url)
        .fetch_one(&self.pool)
        .await
    }

    async fn create_resume(&self, resume: NewResume) -> Result<Resume, sqlx::Error> {
        let id = Uuid::new_v4();
        let summary = resume.summary();
        let NewResume {
            user_id,
            form,
            match_score,
            is_premium,
        } = resume;

        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes
                (id, user_id, title, personal_info, experience, education, skills,
                 summary, template_id, job_description, match_score, is_premium)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&user_id)
        .bind(&form.title)
        .bind(Json(&form.personal_info))
        .bind(Json(&form.experience))
        .bind(Json(&form.education))
        .bind(&form.skills)
        .bind(&summary)
        .bind(form.template_id.as_str())
        .bind(&form.job_description)
        .bind(match_score)
        .bind(is_premium)
        .fetch_one(&self.pool)
        .await?;

        debug!("Inserted resume {id} for user {user_id}");
        Ok(row.into())
    }

    async fn get_resume(&self, id: Uuid) -> Result<Option<Resume>, sqlx::Error> {
        let row = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Resume::from))
    }

    async fn list_user_resumes(&self, user_id: &str) -> Result<Vec<Resume>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE user_id = $1 ORDER BY updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Resume::from).collect())
    }

    async fn update_resume(&self, resume: &Resume) -> Result<Option<Resume>, sqlx::Error> {
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            UPDATE resumes SET
                title = $2,
                personal_info = $3,
                experience = $4,
                education = $5,
                skills = $6,
                summary = $7,
                template_id = $8,
                job_description = $9,
                match_score = $10,
                is_premium = $11,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(resume.id)
        .bind(&resume.title)
        .bind(Json(&resume.personal_info))
        .bind(Json(&resume.experience))
        .bind(Json(&resume.education))
        .bind(&resume.skills)
        .bind(&resume.summary)
        .bind(resume.template_id.as_str())
        .bind(&resume.job_description)
        .bind(resume.match_score)
        .bind(resume.is_premium)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Resume::from))
    }

    async fn delete_resume(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn create_cover_letter(&self, letter: NewCoverLetter) -> Result<CoverLetter, sqlx::Error> {
        let row = sqlx::query_as::<_, CoverLetterRow>(
            r#"
            INSERT INTO cover_letters (id, resume_id, content, tone, job_description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(letter.resume_id)
        .bind(&letter.content)
        .bind(letter.tone.as_str())
        .bind(&letter.job_description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn latest_cover_letter(
        &self,
        resume_id: Uuid,
    ) -> Result<Option<CoverLetter>, sqlx::Error> {
        let row = sqlx::query_as::<_, CoverLetterRow>(
            "SELECT * FROM cover_letters WHERE resume_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(resume_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(CoverLetter::from))
    }
}
