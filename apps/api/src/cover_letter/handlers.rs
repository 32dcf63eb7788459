//! Axum route handlers for cover letters.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::cover_letter::generator::{generate_cover_letter, CoverLetterContext};
use crate::cover_letter::tone::Tone;
use crate::errors::AppError;
use crate::extract::OptionalJson;
use crate::models::cover_letter::{CoverLetter, NewCoverLetter};
use crate::optimization::optimizer::has_job_description;
use crate::resumes::load_owned;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterRequest {
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
}

/// POST /api/resumes/:id/cover-letter
///
/// Generates and stores a new letter. Without a `jobDescription` in the body the resume's
/// stored one is used.
pub async fn handle_create_cover_letter(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    body: OptionalJson<CoverLetterRequest>,
) -> Result<Json<CoverLetter>, AppError> {
    let resume = load_owned(state.store.as_ref(), &user, &id).await?;
    let request = body.or_default();

    let tone = match request.tone.as_deref() {
        None | Some("") => Tone::default(),
        Some(raw) => raw.parse::<Tone>().map_err(AppError::Validation)?,
    };

    let job_description = request
        .job_description
        .filter(|jd| has_job_description(jd))
        .or_else(|| {
            resume
                .job_description
                .clone()
                .filter(|jd| has_job_description(jd))
        });

    let content = generate_cover_letter(
        state.llm.as_ref(),
        state.failure_policy,
        &CoverLetterContext::from_resume(&resume),
        job_description.as_deref().unwrap_or_default(),
        tone,
    )
    .await?;

    let letter = state
        .store
        .create_cover_letter(NewCoverLetter {
            resume_id: resume.id,
            content,
            tone,
            job_description,
        })
        .await?;

    info!("Stored cover letter {} for resume {}", letter.id, resume.id);
    Ok(Json(letter))
}

/// GET /api/resumes/:id/cover-letter
///
/// The most recent letter, or `null` when none has been generated.
pub async fn handle_get_cover_letter(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Option<CoverLetter>>, AppError> {
    let resume = load_owned(state.store.as_ref(), &user, &id).await?;
    Ok(Json(state.store.latest_cover_letter(resume.id).await?))
}
