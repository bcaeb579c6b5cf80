mod common;

use axum::http::StatusCode;
use common::{parse_body, percentage_offer, TestApp};
use serde_json::{json, Value};
use std::time::Duration;

async fn create(app: &TestApp, token: &str, body: Value) -> Value {
    let res = app.request("POST", "/api/partner/offers", Some(token), Some(body)).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    parse_body(res).await["data"].clone()
}

#[tokio::test]
async fn test_create_percentage_offer() {
    let app = TestApp::new().await;
    let auth = app.register("offers@lecomptoir.fr").await;

    let res = app.request("POST", "/api/partner/offers", Some(&auth.access_token), Some(percentage_offer())).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = parse_body(res).await;
    assert_eq!(body["message"], "Offer created");

    let offer = &body["data"];
    assert!(offer["id"].as_str().unwrap().starts_with("offer_"));
    assert_eq!(offer["establishmentId"], auth.establishment_id.as_str());
    assert_eq!(offer["type"], "percentage");
    assert_eq!(offer["percentage"], 30);
    assert_eq!(offer["isActive"], true);
    assert_eq!(offer["schedule"], json!({ "days": ["friday"], "startTime": "17:00", "endTime": "20:00" }));
    assert_eq!(offer["validity"], json!({ "startDate": "2024-09-01", "endDate": "2024-12-31" }));
    assert!(offer.get("happyHourPrice").is_none());
    assert!(offer.get("specialText").is_none());

    let fetched = app.request("GET", &format!("/api/partner/offers/{}", offer["id"].as_str().unwrap()), Some(&auth.access_token), None).await;
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_eq!(&parse_body(fetched).await["data"], offer);
}

#[tokio::test]
async fn test_happy_hour_without_price_is_rejected() {
    let app = TestApp::new().await;
    let auth = app.register("hh@lecomptoir.fr").await;

    let mut body = percentage_offer();
    body["type"] = json!("happy-hour");
    body.as_object_mut().unwrap().remove("percentage");

    let res = app.request("POST", "/api/partner/offers", Some(&auth.access_token), Some(body.clone())).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let fields = parse_body(res).await["fields"].clone();
    assert_eq!(fields["happyHourPrice"], "Enter a happy hour price");
    assert_eq!(fields.as_object().unwrap().len(), 1);

    body["happyHourPrice"] = json!(6.5);
    let offer = create(&app, &auth.access_token, body).await;
    assert_eq!(offer["type"], "happy-hour");
    assert_eq!(offer["happyHourPrice"], 6.5);
}

#[tokio::test]
async fn test_validation_collects_all_errors() {
    let app = TestApp::new().await;
    let auth = app.register("rules@lecomptoir.fr").await;

    let res = app.request("POST", "/api/partner/offers", Some(&auth.access_token), Some(json!({
        "title": "Hi",
        "description": "Short",
        "type": "percentage",
        "percentage": 95,
        "schedule": { "days": [], "startTime": "5pm", "endTime": "20:00" },
        "validity": { "startDate": "2024-12-31", "endDate": "2024-09-01" }
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let fields = parse_body(res).await["fields"].clone();
    for path in ["title", "description", "percentage", "schedule.days", "schedule.startTime", "validity.endDate"] {
        assert!(fields[path].is_string(), "expected an error at {}", path);
    }
    assert_eq!(fields["validity.endDate"], "End date must not be before start date");
    assert!(fields["schedule.endTime"].is_null());

    let list = parse_body(app.request("GET", "/api/partner/offers", Some(&auth.access_token), None).await).await;
    assert_eq!(list["total"], 0);
}

#[tokio::test]
async fn test_toggle_only_changes_active_flag() {
    let app = TestApp::new().await;
    let auth = app.register("toggle@lecomptoir.fr").await;
    let created = create(&app, &auth.access_token, percentage_offer()).await;
    let id = created["id"].as_str().unwrap();

    tokio::time::sleep(Duration::from_millis(10)).await;

    let res = app.request("PUT", &format!("/api/partner/offers/{}", id), Some(&auth.access_token), Some(json!({ "isActive": false }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = parse_body(res).await["data"].clone();

    assert_eq!(updated["isActive"], false);
    assert_ne!(updated["updatedAt"], created["updatedAt"]);

    let mut expected = created.clone();
    expected["isActive"] = json!(false);
    expected["updatedAt"] = updated["updatedAt"].clone();
    assert_eq!(updated, expected);
}

#[tokio::test]
async fn test_partial_update_switches_variant() {
    let app = TestApp::new().await;
    let auth = app.register("switch@lecomptoir.fr").await;
    let created = create(&app, &auth.access_token, percentage_offer()).await;
    let uri = format!("/api/partner/offers/{}", created["id"].as_str().unwrap());

    let res = app.request("PUT", &uri, Some(&auth.access_token), Some(json!({
        "type": "special",
        "specialText": "Une planche offerte pour deux cocktails",
        "schedule": { "days": ["saturday", "friday", "friday"] }
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = parse_body(res).await["data"].clone();

    assert_eq!(updated["type"], "special");
    assert_eq!(updated["specialText"], "Une planche offerte pour deux cocktails");
    assert!(updated.get("percentage").is_none());
    assert_eq!(updated["schedule"], json!({ "days": ["friday", "saturday"], "startTime": "17:00", "endTime": "20:00" }));
    assert_eq!(updated["title"], created["title"]);

    // A patch that breaks the merged offer is rejected and leaves it untouched.
    let res = app.request("PUT", &uri, Some(&auth.access_token), Some(json!({ "validity": { "endDate": "2024-01-01" } }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(parse_body(res).await["fields"]["validity.endDate"].is_string());

    let fetched = parse_body(app.request("GET", &uri, Some(&auth.access_token), None).await).await;
    assert_eq!(fetched["data"]["validity"]["endDate"], "2024-12-31");
}

#[tokio::test]
async fn test_list_and_delete() {
    let app = TestApp::new().await;
    let auth = app.register("list@lecomptoir.fr").await;

    let first = create(&app, &auth.access_token, percentage_offer()).await;
    tokio::time::sleep(Duration::from_millis(10)).await;
    let mut second_body = percentage_offer();
    second_body["title"] = json!("Mardi tapas");
    let second = create(&app, &auth.access_token, second_body).await;

    let list = parse_body(app.request("GET", "/api/partner/offers", Some(&auth.access_token), None).await).await;
    assert_eq!(list["total"], 2);
    assert_eq!(list["data"][0]["id"], second["id"]);
    assert_eq!(list["data"][1]["id"], first["id"]);

    let uri = format!("/api/partner/offers/{}", first["id"].as_str().unwrap());
    let res = app.request("DELETE", &uri, Some(&auth.access_token), None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let again = app.request("DELETE", &uri, Some(&auth.access_token), None).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);

    let gone = app.request("GET", &uri, Some(&auth.access_token), None).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);

    let list = parse_body(app.request("GET", "/api/partner/offers", Some(&auth.access_token), None).await).await;
    assert_eq!(list["total"], 1);
}

#[tokio::test]
async fn test_offers_are_scoped_to_the_establishment() {
    let app = TestApp::new().await;
    let owner = app.register("owner@lecomptoir.fr").await;
    let other = app.register("other@lecomptoir.fr").await;

    let offer = create(&app, &owner.access_token, percentage_offer()).await;
    let uri = format!("/api/partner/offers/{}", offer["id"].as_str().unwrap());

    assert_eq!(app.request("GET", &uri, Some(&other.access_token), None).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        app.request("PUT", &uri, Some(&other.access_token), Some(json!({ "isActive": false }))).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(app.request("DELETE", &uri, Some(&other.access_token), None).await.status(), StatusCode::NOT_FOUND);

    let list = parse_body(app.request("GET", "/api/partner/offers", Some(&other.access_token), None).await).await;
    assert_eq!(list["total"], 0);
}
