use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::Enrollment;

const COLUMNS: &str = "id, student_id, course_id, midterm_score, final_score, created_at";

/// Enrollment joined with its course for the student-facing listing.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct StudentEnrollmentRow {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) course_code: String,
    pub(crate) course_name: String,
    pub(crate) teacher_name: String,
    pub(crate) midterm_score: f64,
    pub(crate) final_score: f64,
}

/// Enrollment joined with its student for the course roster.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct RosterRow {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) student_name: String,
    pub(crate) midterm_score: f64,
    pub(crate) final_score: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct ScoreUpdate {
    pub(crate) enrollment_id: String,
    pub(crate) midterm_score: Option<f64>,
    pub(crate) final_score: Option<f64>,
}

/// Result of a grading batch. The batch is transactional: on
/// `UnknownEnrollment` nothing has been written.
#[derive(Debug)]
pub(crate) enum ScoreUpdateOutcome {
    Applied(usize),
    UnknownEnrollment(String),
}

/// Get-or-create enroll. The unique (student_id, course_id) index makes the
/// insert race-safe; a second call returns the existing row untouched.
pub(crate) async fn ensure(
    pool: &SqlitePool,
    student_id: &str,
    course_id: &str,
    now: time::PrimitiveDateTime,
) -> Result<Enrollment, sqlx::Error> {
    sqlx::query(
        "INSERT INTO enrollments (id, student_id, course_id, midterm_score, final_score, created_at)
         VALUES (?, ?, ?, 0, 0, ?)
         ON CONFLICT (student_id, course_id) DO NOTHING",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(student_id)
    .bind(course_id)
    .bind(now)
    .execute(pool)
    .await?;

    sqlx::query_as::<_, Enrollment>(&format!(
        "SELECT {COLUMNS} FROM enrollments WHERE student_id = ? AND course_id = ?"
    ))
    .bind(student_id)
    .bind(course_id)
    .fetch_one(pool)
    .await
}

/// Drop. Deleting zero rows is not an error.
pub(crate) async fn delete_for_student_course(
    pool: &SqlitePool,
    student_id: &str,
    course_id: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM enrollments WHERE student_id = ? AND course_id = ?")
        .bind(student_id)
        .bind(course_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub(crate) async fn list_for_student(
    pool: &SqlitePool,
    student_id: &str,
) -> Result<Vec<StudentEnrollmentRow>, sqlx::Error> {
    sqlx::query_as::<_, StudentEnrollmentRow>(
        "SELECT e.id,
                e.course_id,
                c.course_code,
                c.name AS course_name,
                t.name AS teacher_name,
                e.midterm_score,
                e.final_score
         FROM enrollments e
         JOIN courses c ON c.id = e.course_id
         JOIN teachers t ON t.id = c.teacher_id
         WHERE e.student_id = ?
         ORDER BY c.course_code, c.name",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_for_course(
    pool: &SqlitePool,
    course_id: &str,
) -> Result<Vec<RosterRow>, sqlx::Error> {
    sqlx::query_as::<_, RosterRow>(
        "SELECT e.id,
                e.student_id,
                s.name AS student_name,
                e.midterm_score,
                e.final_score
         FROM enrollments e
         JOIN students s ON s.id = e.student_id
         WHERE e.course_id = ?
         ORDER BY s.name, e.id",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
}

/// Apply a grading batch in one transaction. An absent score leaves the
/// stored value unchanged; an update naming an enrollment outside the course
/// rolls back the whole batch.
pub(crate) async fn apply_score_updates(
    pool: &SqlitePool,
    course_id: &str,
    updates: &[ScoreUpdate],
) -> Result<ScoreUpdateOutcome, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut applied = 0usize;

    for update in updates {
        let result = sqlx::query(
            "UPDATE enrollments
             SET midterm_score = COALESCE(?, midterm_score),
                 final_score = COALESCE(?, final_score)
             WHERE id = ? AND course_id = ?",
        )
        .bind(update.midterm_score)
        .bind(update.final_score)
        .bind(&update.enrollment_id)
        .bind(course_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(ScoreUpdateOutcome::UnknownEnrollment(update.enrollment_id.clone()));
        }

        applied += 1;
    }

    tx.commit().await?;
    Ok(ScoreUpdateOutcome::Applied(applied))
}
