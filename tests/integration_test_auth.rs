mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{parse_body, TestApp, TEST_PASSWORD};
use serde_json::json;
use tokio::task::JoinSet;
use tower::ServiceExt;

#[tokio::test]
async fn test_register_creates_partner_establishment_and_tokens() {
    let app = TestApp::new().await;

    let auth = app.register("julie@lecomptoir.fr").await;
    assert!(auth.partner_id.starts_with("partner_"));
    assert!(auth.establishment_id.starts_with("est_"));
    assert_eq!(auth.refresh_token.len(), 64);

    let me_res = app.request("GET", "/api/auth/me", Some(&auth.access_token), None).await;
    assert_eq!(me_res.status(), StatusCode::OK);
    let me = parse_body(me_res).await;
    assert_eq!(me["data"]["email"], "julie@lecomptoir.fr");
    assert_eq!(me["data"]["firstName"], "Julie");
    assert!(me["data"].get("passwordHash").is_none());

    // Registration seeds a full week of opening hours, Sunday closed.
    let est_res = app.request("GET", "/api/partner/establishment", Some(&auth.access_token), None).await;
    let est = parse_body(est_res).await;
    let days = est["data"]["openingHours"].as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days[0]["day"], "monday");
    assert_eq!(days[0]["slots"][0]["open"], "17:00");
    assert_eq!(days[6]["day"], "sunday");
    assert_eq!(days[6]["slots"].as_array().unwrap().len(), 0);
    assert_eq!(est["data"]["name"], "Le Comptoir");
}

#[tokio::test]
async fn test_register_rejects_invalid_and_duplicate() {
    let app = TestApp::new().await;

    let invalid = app.request("POST", "/api/auth/register", None, Some(json!({
        "firstName": "J",
        "lastName": "Morel",
        "email": "not-an-email",
        "password": "123",
        "establishmentName": "Le Comptoir",
        "acceptTerms": false
    }))).await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(invalid).await;
    assert_eq!(body["error"], "Validation failed");
    for field in ["firstName", "email", "password", "acceptTerms"] {
        assert!(body["fields"][field].is_string(), "missing error for {}", field);
    }
    assert!(body["fields"]["lastName"].is_null());

    app.register("dup@lecomptoir.fr").await;
    let duplicate = app.request("POST", "/api/auth/register", None, Some(json!({
        "firstName": "Marc",
        "lastName": "Petit",
        "email": "DUP@lecomptoir.fr",
        "password": TEST_PASSWORD,
        "establishmentName": "Chez Marc",
        "acceptTerms": true
    }))).await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_checks_password() {
    let app = TestApp::new().await;
    let registered = app.register("login@lecomptoir.fr").await;

    let auth = app.login("Login@LeComptoir.fr", TEST_PASSWORD).await;
    assert_eq!(auth.partner_id, registered.partner_id);

    let wrong = app.request("POST", "/api/auth/login", None, Some(json!({
        "email": "login@lecomptoir.fr",
        "password": "wrong-password"
    }))).await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(parse_body(wrong).await["error"], "Invalid email or password");

    let unknown = app.request("POST", "/api/auth/login", None, Some(json!({
        "email": "nobody@lecomptoir.fr",
        "password": TEST_PASSWORD
    }))).await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_or_bad_token_is_a_session_error() {
    let app = TestApp::new().await;

    let missing = app.request("GET", "/api/partner/offers", None, None).await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(parse_body(missing).await["error"], "Session expired, please sign in again");

    let garbage = app.request("GET", "/api/auth/me", Some("not.a.jwt"), None).await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_access_token_is_rejected() {
    let app = TestApp::with_token_ttls(-5, 7).await;
    let auth = app.register("expired@lecomptoir.fr").await;

    let res = app.request("GET", "/api/auth/me", Some(&auth.access_token), None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rotates_and_consumes_token() {
    let app = TestApp::new().await;
    let auth = app.register("refresh@lecomptoir.fr").await;

    let res = app.request("POST", "/api/auth/refresh", None, Some(json!({ "refreshToken": auth.refresh_token }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    let new_refresh = body["data"]["tokens"]["refreshToken"].as_str().unwrap().to_string();
    let new_access = body["data"]["tokens"]["token"].as_str().unwrap().to_string();
    assert_ne!(new_refresh, auth.refresh_token);

    let me = app.request("GET", "/api/auth/me", Some(&new_access), None).await;
    assert_eq!(me.status(), StatusCode::OK);

    let replay = app.request("POST", "/api/auth/refresh", None, Some(json!({ "refreshToken": auth.refresh_token }))).await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_refresh_token_is_rejected() {
    let app = TestApp::with_token_ttls(15, -1).await;
    let auth = app.register("stale@lecomptoir.fr").await;

    let res = app.request("POST", "/api/auth/refresh", None, Some(json!({ "refreshToken": auth.refresh_token }))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let swept = app.state.auth_repo.delete_expired(chrono::Utc::now()).await.unwrap();
    assert_eq!(swept, 0, "the rejected token was already consumed");
}

#[tokio::test]
async fn test_logout_revokes_refresh_tokens() {
    let app = TestApp::new().await;
    let auth = app.register("logout@lecomptoir.fr").await;

    let res = app.request("POST", "/api/auth/logout", Some(&auth.access_token), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["message"], "Signed out");

    let refresh = app.request("POST", "/api/auth/refresh", None, Some(json!({ "refreshToken": auth.refresh_token }))).await;
    assert_eq!(refresh.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let res = app.request("GET", "/health", None, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["status"], "ok");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registrations_leave_no_orphan_rows() {
    let app = TestApp::new().await;
    let payload = json!({
        "firstName": "Julie",
        "lastName": "Morel",
        "email": "race@lecomptoir.fr",
        "password": TEST_PASSWORD,
        "establishmentName": "Le Comptoir",
        "acceptTerms": true
    });

    let mut requests = JoinSet::new();
    for _ in 0..6 {
        let router = app.router.clone();
        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap();
        requests.spawn(async move { router.oneshot(request).await.unwrap().status() });
    }

    let mut statuses = Vec::new();
    while let Some(status) = requests.join_next().await {
        statuses.push(status.unwrap());
    }
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CREATED).count(), 1, "{:?}", statuses);
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count(), 5, "{:?}", statuses);

    for table in ["partners", "establishments", "establishment_stats"] {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&app.pool)
            .await
            .unwrap();
        assert_eq!(count, 1, "rows in {}", table);
    }
}
