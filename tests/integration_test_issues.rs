mod common;

use common::{parse_body, AuthHeaders, TestApp};
use serde_json::Value;

async fn report_issue(app: &TestApp, auth: &AuthHeaders, room_id: Option<&str>) -> axum::response::Response {
    let mut payload = serde_json::json!({
        "title": "Leaking tap",
        "description": "The bathroom tap drips all night",
        "category": "plumbing"
    });
    if let Some(room_id) = room_id {
        payload["room_id"] = Value::String(room_id.to_string());
    }
    app.request("POST", "/api/v1/issues", Some(auth), Some(payload)).await
}

#[tokio::test]
async fn test_staff_report_issue_against_named_room() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let room_id = app.create_room(&auth, "R101", 2).await;

    let response = report_issue(&app, &auth, Some(&room_id)).await;
    assert_eq!(response.status(), 201);

    let body = parse_body(response).await;
    assert_eq!(body["room_id"], Value::String(room_id));
    assert_eq!(body["status"], "open");
    assert_eq!(body["priority"], "medium");
    assert!(body["resolved_date"].is_null());

    // Staff must name a room.
    let response = report_issue(&app, &auth, None).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_student_issue_room_is_derived_from_occupancy() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;

    let alice_id = app.create_student(&admin, "alice").await;
    let home = app.create_room(&admin, "R101", 2).await;
    let other = app.create_room(&admin, "R102", 2).await;
    app.assign(&admin, &alice_id, &home, "A").await;

    let alice = app.login("alice", "student-pw-123").await;

    // A client-supplied room_id is ignored for students.
    let response = report_issue(&app, &alice, Some(&other)).await;
    assert_eq!(response.status(), 201);
    let body = parse_body(response).await;
    assert_eq!(body["room_id"], Value::String(home));
    assert_eq!(body["reported_by"], Value::String(alice_id));
}

#[tokio::test]
async fn test_student_without_occupancy_cannot_report() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;

    app.create_student(&admin, "alice").await;
    let alice = app.login("alice", "student-pw-123").await;

    let response = report_issue(&app, &alice, None).await;
    assert_eq!(response.status(), 403);

    let response = app.request("GET", "/api/v1/issues", Some(&admin), None).await;
    assert_eq!(parse_body(response).await.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_students_see_only_their_own_issues() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;

    let alice_id = app.create_student(&admin, "alice").await;
    let bob_id = app.create_student(&admin, "bob").await;
    let room = app.create_room(&admin, "R101", 2).await;
    app.assign(&admin, &alice_id, &room, "A").await;
    app.assign(&admin, &bob_id, &room, "B").await;

    let alice = app.login("alice", "student-pw-123").await;
    let bob = app.login("bob", "student-pw-123").await;

    let response = report_issue(&app, &alice, None).await;
    let alice_issue = parse_body(response).await["id"].as_str().unwrap().to_string();
    report_issue(&app, &bob, None).await;

    let response = app.request("GET", "/api/v1/issues", Some(&alice), None).await;
    let issues = parse_body(response).await;
    let issues = issues.as_array().unwrap().clone();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["id"], Value::String(alice_issue.clone()));

    let response = app.request("GET", "/api/v1/issues", Some(&admin), None).await;
    assert_eq!(parse_body(response).await.as_array().unwrap().len(), 2);

    // Bob cannot read Alice's issue, Alice can.
    let response = app.request("GET", &format!("/api/v1/issues/{}", alice_issue), Some(&bob), None).await;
    assert_eq!(response.status(), 403);
    let response = app.request("GET", &format!("/api/v1/issues/{}", alice_issue), Some(&alice), None).await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_issue_lifecycle_and_resolved_date() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let room_id = app.create_room(&auth, "R101", 2).await;

    let response = report_issue(&app, &auth, Some(&room_id)).await;
    let issue_id = parse_body(response).await["id"].as_str().unwrap().to_string();
    let issue_uri = format!("/api/v1/issues/{}", issue_id);

    let response = app.request("PUT", &issue_uri, Some(&auth), Some(serde_json::json!({
        "status": "in_progress"
    }))).await;
    assert_eq!(response.status(), 200);
    assert_eq!(parse_body(response).await["status"], "in_progress");

    let response = app.request("PUT", &issue_uri, Some(&auth), Some(serde_json::json!({
        "status": "resolved",
        "resolution_notes": "Replaced the washer"
    }))).await;
    assert_eq!(response.status(), 200);
    let body = parse_body(response).await;
    assert_eq!(body["status"], "resolved");
    assert_eq!(body["resolution_notes"], "Replaced the washer");
    let stamped = body["resolved_date"].as_str().unwrap().to_string();

    // Closing later keeps the original resolution timestamp.
    let response = app.request("PUT", &issue_uri, Some(&auth), Some(serde_json::json!({
        "status": "closed"
    }))).await;
    let body = parse_body(response).await;
    assert_eq!(body["status"], "closed");
    assert_eq!(body["resolved_date"].as_str().unwrap(), stamped);

    // Closed issues never reopen.
    let response = app.request("PUT", &issue_uri, Some(&auth), Some(serde_json::json!({
        "status": "open"
    }))).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_reopen_only_from_in_progress() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let room_id = app.create_room(&auth, "R101", 2).await;

    let response = report_issue(&app, &auth, Some(&room_id)).await;
    let issue_uri = format!("/api/v1/issues/{}", parse_body(response).await["id"].as_str().unwrap());

    app.request("PUT", &issue_uri, Some(&auth), Some(serde_json::json!({ "status": "in_progress" }))).await;

    let response = app.request("PUT", &issue_uri, Some(&auth), Some(serde_json::json!({ "status": "open" }))).await;
    assert_eq!(response.status(), 200);
    assert_eq!(parse_body(response).await["status"], "open");

    app.request("PUT", &issue_uri, Some(&auth), Some(serde_json::json!({ "status": "resolved" }))).await;
    let response = app.request("PUT", &issue_uri, Some(&auth), Some(serde_json::json!({ "status": "in_progress" }))).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_issue_assignment_requires_staff_assignee() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let room_id = app.create_room(&auth, "R101", 2).await;
    let alice_id = app.create_student(&auth, "alice").await;

    let response = report_issue(&app, &auth, Some(&room_id)).await;
    let issue_uri = format!("/api/v1/issues/{}", parse_body(response).await["id"].as_str().unwrap());

    let response = app.request("PUT", &issue_uri, Some(&auth), Some(serde_json::json!({
        "status": "in_progress",
        "assigned_to": alice_id
    }))).await;
    assert_eq!(response.status(), 400);

    let response = app.request("POST", "/api/v1/users", Some(&auth), Some(serde_json::json!({
        "username": "warden",
        "email": "warden@example.com",
        "password": "warden-pw-123",
        "role": "manager"
    }))).await;
    let warden_id = parse_body(response).await["id"].as_str().unwrap().to_string();

    let response = app.request("PUT", &issue_uri, Some(&auth), Some(serde_json::json!({
        "status": "in_progress",
        "assigned_to": warden_id
    }))).await;
    assert_eq!(response.status(), 200);
    let body = parse_body(response).await;
    assert_eq!(body["assigned_to"], Value::String(warden_id));
}

#[tokio::test]
async fn test_students_cannot_update_issues() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;

    let alice_id = app.create_student(&admin, "alice").await;
    let room = app.create_room(&admin, "R101", 2).await;
    app.assign(&admin, &alice_id, &room, "A").await;

    let alice = app.login("alice", "student-pw-123").await;
    let response = report_issue(&app, &alice, None).await;
    let issue_id = parse_body(response).await["id"].as_str().unwrap().to_string();

    let response = app.request("PUT", &format!("/api/v1/issues/{}", issue_id), Some(&alice), Some(serde_json::json!({
        "status": "resolved"
    }))).await;
    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn test_list_issues_filters_by_status_and_priority() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let room_id = app.create_room(&auth, "R101", 2).await;

    let response = app.request("POST", "/api/v1/issues", Some(&auth), Some(serde_json::json!({
        "room_id": room_id,
        "title": "Broken lock",
        "description": "Door lock jammed",
        "category": "security",
        "priority": "urgent"
    }))).await;
    assert_eq!(response.status(), 201);

    let response = report_issue(&app, &auth, Some(&room_id)).await;
    let issue_id = parse_body(response).await["id"].as_str().unwrap().to_string();
    app.request("PUT", &format!("/api/v1/issues/{}", issue_id), Some(&auth), Some(serde_json::json!({
        "status": "resolved"
    }))).await;

    let response = app.request("GET", "/api/v1/issues?priority=urgent", Some(&auth), None).await;
    let issues = parse_body(response).await;
    assert_eq!(issues.as_array().unwrap().len(), 1);
    assert_eq!(issues.as_array().unwrap()[0]["title"], "Broken lock");

    let response = app.request("GET", "/api/v1/issues?status=resolved", Some(&auth), None).await;
    assert_eq!(parse_body(response).await.as_array().unwrap().len(), 1);

    let response = app.request("GET", "/api/v1/issues?status=open&priority=urgent", Some(&auth), None).await;
    assert_eq!(parse_body(response).await.as_array().unwrap().len(), 1);
}
