use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentIdentity, Role};
use crate::api::validation::{finite_score, required_trimmed};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::Course;
use crate::repositories;
use crate::repositories::enrollments::{ScoreUpdate, ScoreUpdateOutcome};
use crate::schemas::comment::{CommentCreate, CommentResponse};
use crate::schemas::course::{
    CourseCreate, CourseDetailResponse, CourseListResponse, CourseResponse, EnrolledCourseResponse,
    GradeBatchRequest, GradeBatchResponse, RosterEntryResponse,
};
use crate::schemas::MessageResponse;
use crate::services::grading;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/:course_id", get(course_detail))
        .route("/:course_id/enroll", post(enroll_course))
        .route("/:course_id/drop", post(drop_course))
        .route("/:course_id/grades", put(grade_course))
        .route("/:course_id/comments", post(add_comment))
}

/// Role-scoped catalog. Admins see everything, teachers their own courses,
/// students their enrollments (with averages) plus what is left to enroll.
async fn list_courses(
    identity: CurrentIdentity,
    State(state): State<AppState>,
) -> Result<Json<CourseListResponse>, ApiError> {
    let response = match &identity.role {
        Role::Admin => {
            let courses = repositories::courses::list_all(state.db())
                .await
                .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;
            CourseListResponse::Admin {
                courses: courses.into_iter().map(CourseResponse::from_view).collect(),
            }
        }
        Role::Teacher(teacher) => {
            let courses = repositories::courses::list_by_teacher(state.db(), &teacher.id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;
            CourseListResponse::Teacher {
                courses: courses.into_iter().map(CourseResponse::from_view).collect(),
            }
        }
        Role::Student(student) => {
            let enrollments = repositories::enrollments::list_for_student(state.db(), &student.id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to list enrollments"))?;
            let available =
                repositories::courses::list_available_for_student(state.db(), &student.id)
                    .await
                    .map_err(|e| ApiError::internal(e, "Failed to list available courses"))?;

            let enrollments: Vec<EnrolledCourseResponse> =
                enrollments.into_iter().map(EnrolledCourseResponse::from_row).collect();
            let averages: Vec<f64> = enrollments.iter().map(|entry| entry.average).collect();

            CourseListResponse::Student {
                semester_average: grading::semester_average(&averages),
                available: available.into_iter().map(CourseResponse::from_view).collect(),
                enrollments,
            }
        }
        Role::Unaffiliated => {
            return Err(ApiError::Forbidden("Course access requires a linked role"));
        }
    };

    Ok(Json(response))
}

/// Admins choose the teacher; a teacher caller always creates the course
/// under their own record, whatever the payload says.
async fn create_course(
    identity: CurrentIdentity,
    State(state): State<AppState>,
    Json(payload): Json<CourseCreate>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    let name = required_trimmed(&payload.name, "name")?;
    let course_code = required_trimmed(&payload.course_code, "course_code")?;

    let teacher = match &identity.role {
        Role::Admin => {
            let teacher_id = payload
                .teacher_id
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| ApiError::BadRequest("teacher_id is required".to_string()))?;

            repositories::teachers::find_by_id(state.db(), teacher_id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to load teacher"))?
                .ok_or_else(|| ApiError::NotFound("Teacher not found".to_string()))?
        }
        Role::Teacher(teacher) => teacher.clone(),
        _ => return Err(ApiError::Forbidden("Only admins and teachers may create courses")),
    };

    let now = primitive_now_utc();
    let course = repositories::courses::create(
        state.db(),
        repositories::courses::CreateCourse {
            id: &Uuid::new_v4().to_string(),
            course_code: &course_code,
            name: &name,
            teacher_id: &teacher.id,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create course"))?;

    tracing::info!(
        user_id = %identity.user.id,
        course_id = %course.id,
        course_code = %course.course_code,
        action = "course_create",
        "Course created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CourseResponse {
            id: course.id,
            course_code: course.course_code,
            name: course.name,
            teacher_id: teacher.id,
            teacher_name: teacher.name,
            created_at: crate::core::time::format_primitive(course.created_at),
        }),
    ))
}

async fn course_detail(
    Path(course_id): Path<String>,
    _identity: CurrentIdentity,
    State(state): State<AppState>,
) -> Result<Json<CourseDetailResponse>, ApiError> {
    let course = repositories::courses::find_view_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    let roster = repositories::enrollments::list_for_course(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load roster"))?;

    let comments = repositories::comments::list_for_course(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load comments"))?;

    Ok(Json(CourseDetailResponse {
        course: CourseResponse::from_view(course),
        roster: roster.into_iter().map(RosterEntryResponse::from_row).collect(),
        comments: comments.into_iter().map(CommentResponse::from_row).collect(),
    }))
}

/// Get-or-create: enrolling twice in the same course is a no-op, not an
/// error.
async fn enroll_course(
    Path(course_id): Path<String>,
    identity: CurrentIdentity,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let student =
        identity.student().ok_or(ApiError::Forbidden("Only students may enroll in courses"))?;

    let course = fetch_course(&state, &course_id).await?;

    let enrollment =
        repositories::enrollments::ensure(state.db(), &student.id, &course.id, primitive_now_utc())
            .await
            .map_err(|e| ApiError::internal(e, "Failed to enroll in course"))?;

    tracing::info!(
        user_id = %identity.user.id,
        enrollment_id = %enrollment.id,
        course_id = %course.id,
        action = "course_enroll",
        "Student enrolled"
    );

    Ok(Json(MessageResponse::success(format!("Enrolled in course: {}", course.name))))
}

async fn drop_course(
    Path(course_id): Path<String>,
    identity: CurrentIdentity,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let student =
        identity.student().ok_or(ApiError::Forbidden("Only students may drop courses"))?;

    let course = fetch_course(&state, &course_id).await?;

    repositories::enrollments::delete_for_student_course(state.db(), &student.id, &course.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to drop course"))?;

    Ok(Json(MessageResponse::warning(format!("Dropped course: {}", course.name))))
}

/// Batch score entry for a course. The whole batch is applied in one
/// transaction; a bad entry aborts it without touching any enrollment.
async fn grade_course(
    Path(course_id): Path<String>,
    identity: CurrentIdentity,
    State(state): State<AppState>,
    Json(payload): Json<GradeBatchRequest>,
) -> Result<Json<GradeBatchResponse>, ApiError> {
    let course = fetch_course(&state, &course_id).await?;

    let allowed = identity.is_admin()
        || identity.teacher().map(|teacher| teacher.id == course.teacher_id).unwrap_or(false);
    if !allowed {
        return Err(ApiError::Forbidden("Only the course's teacher may enter scores"));
    }

    let mut updates = Vec::with_capacity(payload.updates.len());
    for update in payload.updates {
        let midterm_score =
            update.midterm_score.map(|score| finite_score(score, "midterm_score")).transpose()?;
        let final_score =
            update.final_score.map(|score| finite_score(score, "final_score")).transpose()?;
        updates.push(ScoreUpdate {
            enrollment_id: update.enrollment_id,
            midterm_score,
            final_score,
        });
    }

    let outcome = repositories::enrollments::apply_score_updates(state.db(), &course.id, &updates)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update scores"))?;

    let updated = match outcome {
        ScoreUpdateOutcome::Applied(count) => count,
        ScoreUpdateOutcome::UnknownEnrollment(enrollment_id) => {
            return Err(ApiError::BadRequest(format!(
                "enrollment {enrollment_id} does not belong to this course"
            )));
        }
    };

    tracing::info!(
        user_id = %identity.user.id,
        course_id = %course.id,
        updated,
        action = "course_grade",
        "Scores updated"
    );

    Ok(Json(GradeBatchResponse { updated, message: format!("Updated {updated} enrollments") }))
}

/// Any authenticated identity viewing a course may comment on it.
async fn add_comment(
    Path(course_id): Path<String>,
    identity: CurrentIdentity,
    State(state): State<AppState>,
    Json(payload): Json<CommentCreate>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let content = required_trimmed(&payload.content, "content")?;

    let course = fetch_course(&state, &course_id).await?;

    let comment = repositories::comments::create(
        state.db(),
        repositories::comments::CreateComment {
            id: &Uuid::new_v4().to_string(),
            course_id: &course.id,
            user_id: &identity.user.id,
            content: &content,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create comment"))?;

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse {
            id: comment.id,
            course_id: comment.course_id,
            author_id: comment.user_id,
            author_username: identity.user.username,
            content: comment.content,
            created_at: crate::core::time::format_primitive(comment.created_at),
        }),
    ))
}

async fn fetch_course(state: &AppState, course_id: &str) -> Result<Course, ApiError> {
    repositories::courses::find_by_id(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))
}
