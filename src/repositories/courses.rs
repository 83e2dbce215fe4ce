use sqlx::SqlitePool;

use crate::db::models::Course;

const COLUMNS: &str = "id, course_code, name, teacher_id, created_at, updated_at";

/// Course joined with its teacher's display name, the shape every listing
/// and detail response needs.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct CourseView {
    pub(crate) id: String,
    pub(crate) course_code: String,
    pub(crate) name: String,
    pub(crate) teacher_id: String,
    pub(crate) teacher_name: String,
    pub(crate) created_at: time::PrimitiveDateTime,
}

const VIEW_QUERY: &str = "\
    SELECT c.id, c.course_code, c.name, c.teacher_id, t.name AS teacher_name, c.created_at
    FROM courses c
    JOIN teachers t ON t.id = c.teacher_id";

pub(crate) async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COLUMNS} FROM courses WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_view_by_id(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<CourseView>, sqlx::Error> {
    sqlx::query_as::<_, CourseView>(&format!("{VIEW_QUERY} WHERE c.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_all(pool: &SqlitePool) -> Result<Vec<CourseView>, sqlx::Error> {
    sqlx::query_as::<_, CourseView>(&format!("{VIEW_QUERY} ORDER BY c.course_code, c.name"))
        .fetch_all(pool)
        .await
}

pub(crate) async fn list_by_teacher(
    pool: &SqlitePool,
    teacher_id: &str,
) -> Result<Vec<CourseView>, sqlx::Error> {
    sqlx::query_as::<_, CourseView>(&format!(
        "{VIEW_QUERY} WHERE c.teacher_id = ? ORDER BY c.course_code, c.name"
    ))
    .bind(teacher_id)
    .fetch_all(pool)
    .await
}

/// Courses the student has not enrolled in, the enrollment candidates of the
/// student listing.
pub(crate) async fn list_available_for_student(
    pool: &SqlitePool,
    student_id: &str,
) -> Result<Vec<CourseView>, sqlx::Error> {
    sqlx::query_as::<_, CourseView>(&format!(
        "{VIEW_QUERY}
         WHERE c.id NOT IN (SELECT course_id FROM enrollments WHERE student_id = ?)
         ORDER BY c.course_code, c.name"
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await
}

pub(crate) struct CreateCourse<'a> {
    pub id: &'a str,
    pub course_code: &'a str,
    pub name: &'a str,
    pub teacher_id: &'a str,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &SqlitePool,
    params: CreateCourse<'_>,
) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "INSERT INTO courses (id, course_code, name, teacher_id, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.course_code)
    .bind(params.name)
    .bind(params.teacher_id)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}
