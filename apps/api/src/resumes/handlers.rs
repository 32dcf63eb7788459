//! Axum route handlers for resume CRUD.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::resume::{NewResume, Resume};
use crate::optimization::optimizer::{has_job_description, optimize};
use crate::resumes::load_owned;
use crate::schema::form::ResumeInput;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
}

/// POST /api/resumes
///
/// Validates the submission and stores it. When a job description is supplied the form is
/// optimized first, so the first stored row already carries the optimized content and score.
pub async fn handle_create_resume(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    let Json(body) = body?;
    let form = ResumeInput::from_json(body)?.validate()?;

    // resumes.user_id references users.id
    state.store.upsert_user(user.to_upsert()).await?;

    let (form, match_score) = match form.job_description.as_deref() {
        Some(jd) if has_job_description(jd) => {
            let outcome = optimize(state.llm.as_ref(), state.failure_policy, &form, jd).await?;
            let mut optimized = outcome.optimized_resume;
            optimized.job_description = form.job_description.clone();
            (optimized, Some(i32::from(outcome.match_score)))
        }
        _ => (form, None),
    };

    let resume = state
        .store
        .create_resume(NewResume {
            user_id: user.id,
            form,
            match_score,
            is_premium: false,
        })
        .await?;

    info!("Created resume {} (match score {:?})", resume.id, resume.match_score);
    Ok((StatusCode::CREATED, Json(resume)))
}

/// GET /api/resumes
///
/// The caller's resumes, most recently updated first.
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Resume>>, AppError> {
    Ok(Json(state.store.list_user_resumes(&user.id).await?))
}

/// GET /api/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(load_owned(state.store.as_ref(), &user, &id).await?))
}

/// PUT /api/resumes/:id
///
/// Partial update: only the fields present in the body are validated and replaced.
pub async fn handle_update_resume(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Resume>, AppError> {
    let mut resume = load_owned(state.store.as_ref(), &user, &id).await?;
    let Json(body) = body?;
    let patch = ResumeInput::from_json(body)?.validate_partial()?;
    patch.apply(&mut resume);

    let updated = state
        .store
        .update_resume(&resume)
        .await?
        .ok_or_else(AppError::resume_not_found)?;

    info!("Updated resume {}", updated.id);
    Ok(Json(updated))
}

/// DELETE /api/resumes/:id
///
/// Cover letters go with the resume.
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let resume = load_owned(state.store.as_ref(), &user, &id).await?;
    state.store.delete_resume(resume.id).await?;

    info!("Deleted resume {}", resume.id);
    Ok(Json(DeleteResponse {
        message: "Resume deleted successfully",
    }))
}
