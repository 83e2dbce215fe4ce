use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    Router,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::api;
use crate::core::{config::Settings, security, state::AppState, time::primitive_now_utc};
use crate::db::models::{Course, Student, Teacher, User};
use crate::repositories;

const TEST_SECRET_KEY: &str = "test-secret";

pub(crate) struct TestContext {
    pub(crate) state: AppState,
    pub(crate) app: Router,
    _guard: OwnedMutexGuard<()>,
}

pub(crate) async fn env_lock() -> OwnedMutexGuard<()> {
    static LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Arc::new(Mutex::new(()))).clone();
    lock.lock_owned().await
}

pub(crate) fn set_test_env() {
    std::env::set_var("SCOREBOOK_ENV", "test");
    std::env::set_var("SCOREBOOK_STRICT_CONFIG", "0");
    std::env::set_var("SECRET_KEY", TEST_SECRET_KEY);
    std::env::set_var("DATABASE_URL", "sqlite::memory:");
    std::env::remove_var("FIRST_SUPERUSER_PASSWORD");
}

pub(crate) async fn setup_test_context() -> TestContext {
    let guard = env_lock().await;
    set_test_env();

    let settings = Settings::load().expect("settings");
    let db = prepare_db(&settings).await;

    let state = AppState::new(settings, db);
    let app = api::router::router(state.clone());

    TestContext { state, app, _guard: guard }
}

async fn prepare_db(settings: &Settings) -> SqlitePool {
    let options = SqliteConnectOptions::from_str(&settings.database().database_url())
        .expect("connect options")
        .foreign_keys(true);

    // One connection keeps the in-memory database alive for the whole test.
    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("db pool");

    crate::db::run_migrations(&db).await.expect("migrations");

    let has_users: Option<i32> = sqlx::query_scalar(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'users'",
    )
    .fetch_optional(&db)
    .await
    .expect("users table");
    assert!(has_users.is_some(), "users table missing after migrations");

    db
}

pub(crate) async fn insert_user(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    is_staff: bool,
) -> User {
    let hashed_password = security::hash_password(password).expect("hash password");
    let now = primitive_now_utc();

    repositories::users::create(
        pool,
        repositories::users::CreateUser {
            id: &Uuid::new_v4().to_string(),
            username,
            email: None,
            hashed_password,
            is_staff,
            is_active: true,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .expect("insert user")
}

pub(crate) async fn insert_admin(pool: &SqlitePool, username: &str, password: &str) -> User {
    insert_user(pool, username, password, true).await
}

/// Login account plus linked student record, the shape `/auth/register`
/// produces.
pub(crate) async fn insert_student_user(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    name: &str,
) -> (User, Student) {
    let hashed_password = security::hash_password(password).expect("hash password");

    repositories::users::create_with_student(
        pool,
        repositories::users::RegisterStudentUser {
            user_id: &Uuid::new_v4().to_string(),
            username,
            email: None,
            hashed_password,
            student_id: &Uuid::new_v4().to_string(),
            student_name: name,
            now: primitive_now_utc(),
        },
    )
    .await
    .expect("insert student user")
}

pub(crate) async fn insert_teacher(
    pool: &SqlitePool,
    name: &str,
    user_id: Option<&str>,
) -> Teacher {
    repositories::teachers::create(
        pool,
        repositories::teachers::CreateTeacher {
            id: &Uuid::new_v4().to_string(),
            user_id,
            name,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .expect("insert teacher")
}

/// Login account plus linked teacher record.
pub(crate) async fn insert_teacher_user(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    name: &str,
) -> (User, Teacher) {
    let user = insert_user(pool, username, password, false).await;
    let teacher = insert_teacher(pool, name, Some(&user.id)).await;
    (user, teacher)
}

pub(crate) async fn insert_course(
    pool: &SqlitePool,
    course_code: &str,
    name: &str,
    teacher_id: &str,
) -> Course {
    let now = primitive_now_utc();

    repositories::courses::create(
        pool,
        repositories::courses::CreateCourse {
            id: &Uuid::new_v4().to_string(),
            course_code,
            name,
            teacher_id,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .expect("insert course")
}

pub(crate) async fn enroll(pool: &SqlitePool, student_id: &str, course_id: &str) {
    repositories::enrollments::ensure(pool, student_id, course_id, primitive_now_utc())
        .await
        .expect("enroll");
}

pub(crate) async fn enrollment_count(pool: &SqlitePool, student_id: &str, course_id: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM enrollments WHERE student_id = ? AND course_id = ?",
    )
    .bind(student_id)
    .bind(course_id)
    .fetch_one(pool)
    .await
    .expect("count enrollments")
}

/// (midterm_score, final_score) currently stored for an enrollment.
pub(crate) async fn enrollment_scores(pool: &SqlitePool, enrollment_id: &str) -> (f64, f64) {
    sqlx::query_as::<_, (f64, f64)>(
        "SELECT midterm_score, final_score FROM enrollments WHERE id = ?",
    )
    .bind(enrollment_id)
    .fetch_one(pool)
    .await
    .expect("enrollment scores")
}

pub(crate) fn bearer_token(user_id: &str, settings: &Settings) -> String {
    security::create_access_token(user_id, settings, None).expect("token")
}

pub(crate) fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    if let Some(body) = body {
        let bytes = serde_json::to_vec(&body).expect("serialize body");
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(bytes))
            .expect("request body")
    } else {
        builder.body(Body::empty()).expect("request body")
    }
}

pub(crate) async fn read_json(response: axum::response::Response<Body>) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("response body");
    serde_json::from_slice(&body).unwrap_or_else(|err| {
        let body_text = String::from_utf8_lossy(&body);
        panic!("json parse: {err}; body: {body_text}");
    })
}
