use std::sync::Arc;

use crate::auth::JwtVerifier;
use crate::config::FailurePolicy;
use crate::llm_client::LlmProvider;
use crate::render::pdf::PdfEngine;
use crate::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every collaborator is a trait object so tests can swap in fakes.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ResumeStore>,
    /// OpenAI or Gemini, chosen from AI_PROVIDER at startup.
    pub llm: Arc<dyn LlmProvider>,
    pub pdf: Arc<dyn PdfEngine>,
    pub auth: Arc<JwtVerifier>,
    pub failure_policy: FailurePolicy,
}
