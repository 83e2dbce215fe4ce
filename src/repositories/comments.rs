use sqlx::SqlitePool;

use crate::db::models::Comment;

const COLUMNS: &str = "id, course_id, user_id, content, created_at";

/// Comment joined with its author's username for rendering.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct CommentRow {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) user_id: String,
    pub(crate) author_username: String,
    pub(crate) content: String,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) struct CreateComment<'a> {
    pub id: &'a str,
    pub course_id: &'a str,
    pub user_id: &'a str,
    pub content: &'a str,
    pub created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &SqlitePool,
    params: CreateComment<'_>,
) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!(
        "INSERT INTO comments (id, course_id, user_id, content, created_at)
         VALUES (?, ?, ?, ?, ?)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.course_id)
    .bind(params.user_id)
    .bind(params.content)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!("SELECT {COLUMNS} FROM comments WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Newest first, matching the course discussion view.
pub(crate) async fn list_for_course(
    pool: &SqlitePool,
    course_id: &str,
) -> Result<Vec<CommentRow>, sqlx::Error> {
    sqlx::query_as::<_, CommentRow>(
        "SELECT cm.id,
                cm.course_id,
                cm.user_id,
                u.username AS author_username,
                cm.content,
                cm.created_at
         FROM comments cm
         JOIN users u ON u.id = cm.user_id
         WHERE cm.course_id = ?
         ORDER BY cm.created_at DESC, cm.id DESC",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE id = ?").bind(id).execute(pool).await?;
    Ok(result.rows_affected() == 1)
}
