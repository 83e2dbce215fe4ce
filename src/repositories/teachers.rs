use sqlx::SqlitePool;

use crate::db::models::Teacher;

const COLUMNS: &str = "id, user_id, name, created_at";

pub(crate) async fn find_by_id(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<Teacher>, sqlx::Error> {
    sqlx::query_as::<_, Teacher>(&format!("SELECT {COLUMNS} FROM teachers WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_user_id(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Option<Teacher>, sqlx::Error> {
    sqlx::query_as::<_, Teacher>(&format!("SELECT {COLUMNS} FROM teachers WHERE user_id = ?"))
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_all(pool: &SqlitePool) -> Result<Vec<Teacher>, sqlx::Error> {
    sqlx::query_as::<_, Teacher>(&format!("SELECT {COLUMNS} FROM teachers ORDER BY name"))
        .fetch_all(pool)
        .await
}

pub(crate) struct CreateTeacher<'a> {
    pub id: &'a str,
    pub user_id: Option<&'a str>,
    pub name: &'a str,
    pub created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &SqlitePool,
    params: CreateTeacher<'_>,
) -> Result<Teacher, sqlx::Error> {
    sqlx::query_as::<_, Teacher>(&format!(
        "INSERT INTO teachers (id, user_id, name, created_at)
         VALUES (?, ?, ?, ?)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.user_id)
    .bind(params.name)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}
