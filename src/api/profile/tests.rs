use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::test_support;

#[tokio::test]
async fn student_updates_name_and_avatar() {
    let ctx = test_support::setup_test_context().await;

    let (user, _student) =
        test_support::insert_student_user(ctx.state.db(), "profile01", "student-pass", "Old Name")
            .await;
    let token = test_support::bearer_token(&user.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            "/api/v1/profile",
            Some(&token),
            Some(json!({"name": "New Name", "avatar": "avatars/profile01.png"})),
        ))
        .await
        .expect("update profile");

    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert_eq!(body["name"], "New Name");
    assert_eq!(body["avatar"], "avatars/profile01.png");

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/v1/profile", Some(&token), None))
        .await
        .expect("get profile");
    let body = test_support::read_json(response).await;
    assert_eq!(body["name"], "New Name");
}

#[tokio::test]
async fn partial_update_keeps_existing_fields() {
    let ctx = test_support::setup_test_context().await;

    let (user, _student) =
        test_support::insert_student_user(ctx.state.db(), "profile02", "student-pass", "Keeper")
            .await;
    let token = test_support::bearer_token(&user.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::PATCH,
            "/api/v1/profile",
            Some(&token),
            Some(json!({"avatar": "avatars/profile02.png"})),
        ))
        .await
        .expect("update avatar only");

    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert_eq!(body["name"], "Keeper");
    assert_eq!(body["avatar"], "avatars/profile02.png");
}

#[tokio::test]
async fn profile_is_student_only() {
    let ctx = test_support::setup_test_context().await;

    let (user, _teacher) =
        test_support::insert_teacher_user(ctx.state.db(), "tprofile01", "teacher-pass", "Prof")
            .await;
    let token = test_support::bearer_token(&user.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/v1/profile", Some(&token), None))
        .await
        .expect("get profile as teacher");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn blank_name_is_rejected() {
    let ctx = test_support::setup_test_context().await;

    let (user, _student) =
        test_support::insert_student_user(ctx.state.db(), "profile03", "student-pass", "Name")
            .await;
    let token = test_support::bearer_token(&user.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::PATCH,
            "/api/v1/profile",
            Some(&token),
            Some(json!({"name": "  "})),
        ))
        .await
        .expect("blank name");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
