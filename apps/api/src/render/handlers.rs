use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::render::render_resume_html;
use crate::resumes::load_owned;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Pdf,
    /// The print markup itself, for when no rendering engine is available.
    Html,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

/// GET /api/resumes/:id/pdf
///
/// Exports the resume as an A4 PDF. `?format=html` returns the print markup instead; an
/// engine failure on a PDF request is a 500 and never falls back to markup.
pub async fn handle_export(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let resume = load_owned(state.store.as_ref(), &user, &id).await?;
    let Query(query) = query?;
    let html = render_resume_html(&resume).map_err(|e| AppError::Render(e.to_string()))?;
    let stem = sanitize_filename(&resume.title);

    match query.format {
        ExportFormat::Html => {
            info!("Exported resume {} as HTML", resume.id);
            Ok(attachment("text/html; charset=utf-8", &format!("{stem}.html"), html))
        }
        ExportFormat::Pdf => {
            let pdf = state
                .pdf
                .html_to_pdf(&html)
                .await
                .map_err(|e| AppError::Render(e.to_string()))?;
            info!("Exported resume {} as PDF ({} bytes)", resume.id, pdf.len());
            Ok(attachment("application/pdf", &format!("{stem}.pdf"), pdf))
        }
    }
}

fn attachment(content_type: &'static str, filename: &str, body: impl IntoResponse) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

/// Makes a title safe to place inside a quoted `filename="..."` header value.
/// Quotes, backslashes, path separators and control characters become `_`.
/// Non-ASCII is replaced too since header values must be visible ASCII.
pub fn sanitize_filename(title: &str) -> String {
    let cleaned: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '"' | '\\' | '/' => '_',
            c if c.is_ascii_control() || !c.is_ascii() => '_',
            c => c,
        })
        .collect();

    if cleaned.is_empty() {
        "resume".to_string()
    } else {
        cleaned
    }
}
