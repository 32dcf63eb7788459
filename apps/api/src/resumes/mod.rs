pub mod handlers;

use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::resume::Resume;
use crate::store::ResumeStore;

/// Loads a resume the caller owns.
///
/// A malformed id, a missing row and a row owned by someone else all produce the same
/// 404, so responses never reveal whether another user's resume exists.
pub async fn load_owned(
    store: &dyn ResumeStore,
    user: &AuthUser,
    raw_id: &str,
) -> Result<Resume, AppError> {
    let id = Uuid::parse_str(raw_id).map_err(|_| AppError::resume_not_found())?;
    store
        .get_resume(id)
        .await?
        .filter(|resume| resume.user_id == user.id)
        .ok_or_else(AppError::resume_not_found)
}
