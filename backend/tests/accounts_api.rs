//! Registration, login and profile flows over the in-memory store.

#[expect(
    dead_code,
    reason = "Shared harness exposes helpers used only by other suites."
)]
mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::{Value, json};
use support::{Harness, detail, json_body, log_in, send, signed_up};

#[actix_web::test]
async fn registration_normalises_the_email_domain() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;

    let response = send(
        &app,
        test::TestRequest::post().uri("/api/v1/users").set_json(json!({
            "email": "test@OUTLOOK.COM",
            "password": "testpass123",
            "name": "Test",
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body.get("email").and_then(Value::as_str), Some("test@outlook.com"));
    assert_eq!(body.get("name").and_then(Value::as_str), Some("Test"));
    assert!(body.get("password").is_none());
    assert!(log_in(&app, "test@outlook.com", "testpass123").await.is_some());
}

#[actix_web::test]
async fn duplicate_emails_are_rejected_on_the_email_field() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    signed_up(&app, "cook@example.com", "secret").await;

    let response = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({ "email": "cook@EXAMPLE.com", "password": "other" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(detail(&body, "field"), Some("email"));
    assert_eq!(detail(&body, "code"), Some("duplicate"));
}

#[rstest]
#[case(json!({ "password": "secret" }), "missing_field")]
#[case(json!({ "email": "", "password": "secret" }), "missing_field")]
#[case(json!({ "email": "not-an-email", "password": "secret" }), "invalid_email")]
#[actix_web::test]
async fn registration_requires_a_usable_email(#[case] body: Value, #[case] code: &str) {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;

    let response = send(&app, test::TestRequest::post().uri("/api/v1/users").set_json(body)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(detail(&body, "field"), Some("email"));
    assert_eq!(detail(&body, "code"), Some(code));
}

#[actix_web::test]
async fn wrong_passwords_do_not_open_a_session() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    signed_up(&app, "cook@example.com", "secret").await;

    assert!(log_in(&app, "cook@example.com", "wrong").await.is_none());
    assert!(log_in(&app, "nobody@example.com", "secret").await.is_none());
}

#[actix_web::test]
async fn profile_updates_change_name_and_password() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    let cookie = signed_up(&app, "cook@example.com", "secret").await;

    let updated = send(
        &app,
        test::TestRequest::patch()
            .uri("/api/v1/users/me")
            .cookie(cookie.clone())
            .set_json(json!({ "name": "Chef", "password": "new-secret" })),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::OK);

    let me = send(
        &app,
        test::TestRequest::get().uri("/api/v1/users/me").cookie(cookie),
    )
    .await;
    let body = json_body(me).await;
    assert_eq!(body.get("name").and_then(Value::as_str), Some("Chef"));
    assert_eq!(body.get("email").and_then(Value::as_str), Some("cook@example.com"));

    assert!(log_in(&app, "cook@example.com", "secret").await.is_none());
    assert!(log_in(&app, "cook@example.com", "new-secret").await.is_some());
}

#[actix_web::test]
async fn errors_carry_the_request_trace_id() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;

    let response = send(&app, test::TestRequest::get().uri("/api/v1/users/me")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let header = response
        .headers()
        .get("trace-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace-id header");
    let body = json_body(response).await;
    assert_eq!(body.get("code").and_then(Value::as_str), Some("unauthorized"));
    assert_eq!(body.get("traceId").and_then(Value::as_str), Some(header.as_str()));
}
