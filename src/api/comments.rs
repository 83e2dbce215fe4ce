use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::delete,
    Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentIdentity;
use crate::core::state::AppState;
use crate::repositories;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/:comment_id", delete(delete_comment))
}

/// Comments are immutable once posted; the only moderation is the author
/// removing their own.
async fn delete_comment(
    Path(comment_id): Path<String>,
    identity: CurrentIdentity,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let comment = repositories::comments::find_by_id(state.db(), &comment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load comment"))?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    if comment.user_id != identity.user.id {
        return Err(ApiError::Forbidden("Only the author may delete a comment"));
    }

    repositories::comments::delete(state.db(), &comment.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete comment"))?;

    Ok(StatusCode::NO_CONTENT)
}
