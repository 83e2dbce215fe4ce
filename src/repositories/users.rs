use sqlx::SqlitePool;

use crate::db::models::{Student, User};

const COLUMNS: &str =
    "id, username, email, hashed_password, is_staff, is_active, created_at, updated_at";

pub(crate) async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE username = ?"))
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn exists_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT id FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub(crate) struct CreateUser<'a> {
    pub id: &'a str,
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub hashed_password: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &SqlitePool, params: CreateUser<'_>) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (id, username, email, hashed_password, is_staff, is_active, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.username)
    .bind(params.email)
    .bind(params.hashed_password)
    .bind(params.is_staff)
    .bind(params.is_active)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) struct RegisterStudentUser<'a> {
    pub user_id: &'a str,
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub hashed_password: String,
    pub student_id: &'a str,
    pub student_name: &'a str,
    pub now: time::PrimitiveDateTime,
}

/// Registration writes the login account and its student record together;
/// neither row may exist without the other.
pub(crate) async fn create_with_student(
    pool: &SqlitePool,
    params: RegisterStudentUser<'_>,
) -> Result<(User, Student), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (id, username, email, hashed_password, is_staff, is_active, created_at, updated_at)
         VALUES (?, ?, ?, ?, 0, 1, ?, ?)
         RETURNING {COLUMNS}",
    ))
    .bind(params.user_id)
    .bind(params.username)
    .bind(params.email)
    .bind(params.hashed_password)
    .bind(params.now)
    .bind(params.now)
    .fetch_one(&mut *tx)
    .await?;

    let student = sqlx::query_as::<_, Student>(
        "INSERT INTO students (id, user_id, name, avatar, created_at)
         VALUES (?, ?, ?, NULL, ?)
         RETURNING id, user_id, name, avatar, created_at",
    )
    .bind(params.student_id)
    .bind(params.user_id)
    .bind(params.student_name)
    .bind(params.now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok((user, student))
}
