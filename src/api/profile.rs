use axum::{
    extract::State,
    routing::get,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentIdentity;
use crate::api::validation::required_trimmed;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::user::{ProfileUpdateRequest, StudentProfileResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(get_profile).patch(update_profile))
}

async fn get_profile(identity: CurrentIdentity) -> Result<Json<StudentProfileResponse>, ApiError> {
    let student = identity
        .student()
        .ok_or(ApiError::Forbidden("Profile editing is available to students only"))?;

    Ok(Json(StudentProfileResponse::from_db(student.clone())))
}

async fn update_profile(
    identity: CurrentIdentity,
    State(state): State<AppState>,
    Json(payload): Json<ProfileUpdateRequest>,
) -> Result<Json<StudentProfileResponse>, ApiError> {
    let student = identity
        .student()
        .ok_or(ApiError::Forbidden("Profile editing is available to students only"))?;

    let name = payload.name.as_deref().map(|value| required_trimmed(value, "name")).transpose()?;

    let updated = repositories::students::update_profile(
        state.db(),
        &student.id,
        repositories::students::UpdateProfile { name, avatar: payload.avatar },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update profile"))?;

    Ok(Json(StudentProfileResponse::from_db(updated)))
}

#[cfg(test)]
mod tests;
