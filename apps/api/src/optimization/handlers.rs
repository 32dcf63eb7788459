use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::OptionalJson;
use crate::models::resume::Resume;
use crate::optimization::optimizer::{has_job_description, optimize};
use crate::resumes::load_owned;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    #[serde(default)]
    pub job_description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    pub resume: Resume,
    pub match_score: u8,
    pub optimizations: Vec<String>,
}

/// POST /api/resumes/:id/optimize
///
/// Optimizes the stored resume against `jobDescription` and writes the result in a single
/// update. Nothing is written when validation or the provider call fails.
pub async fn handle_optimize(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    body: OptionalJson<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, AppError> {
    let mut resume = load_owned(state.store.as_ref(), &user, &id).await?;

    let job_description = body
        .or_default()
        .job_description
        .filter(|jd| has_job_description(jd))
        .ok_or_else(|| AppError::Validation("Job description is required".to_string()))?;

    let outcome = optimize(
        state.llm.as_ref(),
        state.failure_policy,
        &resume.to_form(),
        &job_description,
    )
    .await?;

    let optimized = outcome.optimized_resume;
    resume.summary = optimized.personal_info.summary.clone();
    resume.personal_info = optimized.personal_info;
    resume.experience = optimized.experience;
    resume.education = optimized.education;
    resume.skills = optimized.skills;
    resume.job_description = Some(job_description);
    resume.match_score = Some(i32::from(outcome.match_score));

    let updated = state
        .store
        .update_resume(&resume)
        .await?
        .ok_or_else(AppError::resume_not_found)?;

    info!("Optimized resume {} to {}/100", updated.id, outcome.match_score);
    Ok(Json(OptimizeResponse {
        resume: updated,
        match_score: outcome.match_score,
        optimizations: outcome.optimizations,
    }))
}
