use sqlx::SqlitePool;

use crate::db::models::Student;

const COLUMNS: &str = "id, user_id, name, avatar, created_at";

pub(crate) async fn find_by_user_id(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!("SELECT {COLUMNS} FROM students WHERE user_id = ?"))
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub(crate) struct UpdateProfile {
    pub name: Option<String>,
    pub avatar: Option<String>,
}

pub(crate) async fn update_profile(
    pool: &SqlitePool,
    id: &str,
    params: UpdateProfile,
) -> Result<Student, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "UPDATE students
         SET name = COALESCE(?, name),
             avatar = COALESCE(?, avatar)
         WHERE id = ?
         RETURNING {COLUMNS}",
    ))
    .bind(params.name)
    .bind(params.avatar)
    .bind(id)
    .fetch_one(pool)
    .await
}
