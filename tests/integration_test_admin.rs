mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::TestApp;
use serde_json::{json, Value};

fn ids(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_cabin_crud() {
    let app = TestApp::new().await;
    app.create_admin("admin").await;
    let admin = app.login("admin").await;

    let (status, body) = app.request("POST", "/admin/cabins/", Some(&admin), Some(json!({ "description": "no name" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["name"].is_array());

    let (status, body) = app.request("POST", "/admin/cabins/", Some(&admin), Some(json!({ "name": "Zen", "capacity": 0 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["capacity"].is_array());

    let (status, zen) = app.request("POST", "/admin/cabins/", Some(&admin), Some(json!({ "name": "Zen", "description": "Quiet" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(zen["capacity"], 1);
    let zen_id = zen["id"].as_str().unwrap().to_string();

    let (_, _) = app.request("POST", "/admin/cabins/", Some(&admin), Some(json!({ "name": "Aurora", "capacity": 3 }))).await;

    let (status, list) = app.request("GET", "/admin/cabins/", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = list.as_array().unwrap().iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Aurora", "Zen"]);

    let (status, updated) = app.request("PUT", &format!("/admin/cabins/{}/", zen_id), Some(&admin), Some(json!({ "capacity": 4 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["capacity"], 4);
    assert_eq!(updated["name"], "Zen");
    assert_eq!(updated["description"], "Quiet");

    let (status, fetched) = app.request("GET", &format!("/admin/cabins/{}/", zen_id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["capacity"], 4);

    let (status, _) = app.request("DELETE", &format!("/admin/cabins/{}/", zen_id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.request("GET", &format!("/admin/cabins/{}/", zen_id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_cabin_removes_its_bookings() {
    let app = TestApp::new().await;
    app.create_admin("admin").await;
    let cabin = app.create_cabin("C1").await;
    let start = Utc::now() + Duration::days(1);
    let slot = app.create_open_slot(&cabin.id, start, start + Duration::hours(1)).await;
    let admin = app.login("admin").await;

    let (status, _) = app.request("DELETE", &format!("/admin/cabins/{}/", cabin.id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(app.state.booking_repo.find_by_id(&slot.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_my_bookings_filters() {
    let app = TestApp::new().await;
    app.create_therapist("ana").await;
    app.create_therapist("ben").await;
    let cabin = app.create_cabin("C1").await;
    let ana = app.login("ana").await;
    let ben = app.login("ben").await;

    let now = Utc::now();
    let past = app.create_open_slot(&cabin.id, now - Duration::days(2), now - Duration::days(2) + Duration::hours(1)).await;
    let soon = app.create_open_slot(&cabin.id, now + Duration::days(1), now + Duration::days(1) + Duration::hours(1)).await;
    let later = app.create_open_slot(&cabin.id, now + Duration::days(5), now + Duration::days(5) + Duration::hours(1)).await;
    let bens = app.create_open_slot(&cabin.id, now + Duration::days(2), now + Duration::days(2) + Duration::hours(1)).await;

    for slot in [&past, &soon, &later] {
        let (status, _) = app.request("POST", &format!("/therapist/slots/{}/book/", slot.id), Some(&ana), None).await;
        assert_eq!(status, StatusCode::OK);
    }
    app.request("POST", &format!("/therapist/slots/{}/book/", bens.id), Some(&ben), None).await;
    app.request("POST", &format!("/therapist/bookings/{}/cancel/", later.id), Some(&ana), None).await;

    let (status, mine) = app.request("GET", "/therapist/bookings/mine/", Some(&ana), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&mine), vec![past.id.clone(), soon.id.clone(), later.id.clone()]);

    let (_, upcoming) = app.request("GET", "/therapist/bookings/mine/?period=upcoming", Some(&ana), None).await;
    assert_eq!(ids(&upcoming), vec![soon.id.clone(), later.id.clone()]);

    let (_, done) = app.request("GET", "/therapist/bookings/mine/?period=past", Some(&ana), None).await;
    assert_eq!(ids(&done), vec![past.id.clone()]);

    let (_, cancelled) = app.request("GET", "/therapist/bookings/mine/?status=cancelled", Some(&ana), None).await;
    assert_eq!(ids(&cancelled), vec![later.id.clone()]);
}

#[tokio::test]
async fn test_all_bookings_filters() {
    let app = TestApp::new().await;
    app.create_admin("admin").await;
    let ana_user = app.create_therapist("ana").await;
    let c1 = app.create_cabin("C1").await;
    let c2 = app.create_cabin("C2").await;
    let admin = app.login("admin").await;
    let ana = app.login("ana").await;

    let day = (Utc::now() + Duration::days(7)).date_naive().and_hms_opt(8, 0, 0).unwrap().and_utc();
    let a = app.create_open_slot(&c1.id, day, day + Duration::hours(1)).await;
    let b = app.create_open_slot(&c2.id, day + Duration::hours(3), day + Duration::hours(4)).await;
    let c = app.create_open_slot(&c1.id, day + Duration::days(1), day + Duration::days(1) + Duration::hours(1)).await;

    app.request("POST", &format!("/therapist/slots/{}/book/", b.id), Some(&ana), None).await;

    let (status, all) = app.request("GET", "/admin/bookings/all/", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&all), vec![a.id.clone(), b.id.clone(), c.id.clone()]);

    let (_, by_cabin) = app.request("GET", &format!("/admin/bookings/all/?cabin_id={}", c1.id), Some(&admin), None).await;
    assert_eq!(ids(&by_cabin), vec![a.id.clone(), c.id.clone()]);

    let (_, by_therapist) = app.request("GET", &format!("/admin/bookings/all/?therapist_id={}", ana_user.id), Some(&admin), None).await;
    assert_eq!(ids(&by_therapist), vec![b.id.clone()]);

    let date = day.format("%Y-%m-%d").to_string();
    let (_, by_date) = app.request("GET", &format!("/admin/bookings/all/?date={}", date), Some(&admin), None).await;
    assert_eq!(ids(&by_date), vec![a.id.clone(), b.id.clone()]);

    let (_, by_status) = app.request("GET", "/admin/bookings/all/?status=available", Some(&admin), None).await;
    assert_eq!(ids(&by_status), vec![a.id.clone(), c.id.clone()]);

    let entry = &by_therapist.as_array().unwrap()[0];
    assert_eq!(entry["therapist_username"], "ana");
    assert_eq!(entry["cabin_name"], "C2");
    assert_eq!(entry["price"], "50.00");
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;
    let (status, body) = app.request("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
