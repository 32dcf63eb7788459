pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth;
use crate::cover_letter::handlers as cover_letter;
use crate::optimization::handlers as optimization;
use crate::render::handlers as render;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/auth/user", get(auth::handle_current_user))
        // Resume CRUD
        .route(
            "/api/resumes",
            get(resumes::handle_list_resumes).post(resumes::handle_create_resume),
        )
        .route(
            "/api/resumes/:id",
            get(resumes::handle_get_resume)
                .put(resumes::handle_update_resume)
                .delete(resumes::handle_delete_resume),
        )
        // Actions
        .route("/api/resumes/:id/optimize", post(optimization::handle_optimize))
        .route(
            "/api/resumes/:id/cover-letter",
            get(cover_letter::handle_get_cover_letter)
                .post(cover_letter::handle_create_cover_letter),
        )
        .route("/api/resumes/:id/pdf", get(render::handle_export))
        .with_state(state)
}
