use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::teacher::{TeacherCreate, TeacherResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(list_teachers).post(create_teacher))
}

/// The roster admins pick from when assigning a course to a teacher.
async fn list_teachers(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<TeacherResponse>>, ApiError> {
    let teachers = repositories::teachers::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list teachers"))?;

    Ok(Json(teachers.into_iter().map(TeacherResponse::from_db).collect()))
}

/// An account may back at most one of a teacher or a student record.
async fn create_teacher(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<TeacherCreate>,
) -> Result<(StatusCode, Json<TeacherResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let user_id = payload.user_id.as_deref().map(str::trim).filter(|value| !value.is_empty());

    if let Some(user_id) = user_id {
        let user = repositories::users::find_by_id(state.db(), user_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load user"))?;
        if user.is_none() {
            return Err(ApiError::NotFound("User not found".to_string()));
        }

        let student = repositories::students::find_by_user_id(state.db(), user_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check student link"))?;
        if student.is_some() {
            return Err(ApiError::Conflict(
                "User is already linked to a student record".to_string(),
            ));
        }
    }

    let teacher = repositories::teachers::create(
        state.db(),
        repositories::teachers::CreateTeacher {
            id: &Uuid::new_v4().to_string(),
            user_id,
            name: payload.name.trim(),
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict("User is already linked to a teacher record".to_string())
        } else {
            ApiError::internal(e, "Failed to create teacher")
        }
    })?;

    tracing::info!(
        admin_id = %admin.id,
        teacher_id = %teacher.id,
        action = "teacher_create",
        "Teacher record created"
    );

    Ok((StatusCode::CREATED, Json(TeacherResponse::from_db(teacher))))
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => {
            matches!(db_error.code().as_deref(), Some("2067") | Some("1555"))
        }
        _ => false,
    }
}
