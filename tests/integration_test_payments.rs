mod common;

use common::{parse_body, AuthHeaders, TestApp};
use serde_json::Value;

async fn setup_occupancy(app: &TestApp, auth: &AuthHeaders) -> String {
    let student_id = app.create_student(auth, "alice").await;
    let room_id = app.create_room(auth, "R101", 2).await;
    let response = app.assign(auth, &student_id, &room_id, "A").await;
    parse_body(response).await["id"].as_str().unwrap().to_string()
}

async fn create_payment(
    app: &TestApp,
    auth: &AuthHeaders,
    occupancy_id: &str,
    due_date: &str,
) -> Value {
    let response = app.request("POST", "/api/v1/payments", Some(auth), Some(serde_json::json!({
        "occupancy_id": occupancy_id,
        "amount": 500.0,
        "payment_type": "rent",
        "due_date": due_date
    }))).await;
    assert_eq!(response.status(), 201);
    parse_body(response).await
}

#[tokio::test]
async fn test_create_payment_defaults() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let occupancy_id = setup_occupancy(&app, &auth).await;

    let body = create_payment(&app, &auth, &occupancy_id, "2099-01-01").await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["payment_method"], "Cash");
    assert_eq!(body["amount"], 500.0);
    assert_eq!(body["is_overdue"], false);
    assert!(body["payment_date"].is_null());
    assert!(body["transaction_id"].is_null());
}

#[tokio::test]
async fn test_create_payment_rejects_negative_amount_and_missing_occupancy() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let occupancy_id = setup_occupancy(&app, &auth).await;

    let response = app.request("POST", "/api/v1/payments", Some(&auth), Some(serde_json::json!({
        "occupancy_id": occupancy_id,
        "amount": -10.0,
        "payment_type": "rent",
        "due_date": "2099-01-01"
    }))).await;
    assert_eq!(response.status(), 400);

    let response = app.request("POST", "/api/v1/payments", Some(&auth), Some(serde_json::json!({
        "occupancy_id": "no-such-occupancy",
        "amount": 10.0,
        "payment_type": "rent",
        "due_date": "2099-01-01"
    }))).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_pending_payment_past_due_date_reads_overdue() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let occupancy_id = setup_occupancy(&app, &auth).await;

    let body = create_payment(&app, &auth, &occupancy_id, "2020-01-01").await;
    assert_eq!(body["is_overdue"], true);

    // Completing the payment clears the overdue flag regardless of due date.
    let payment_id = body["id"].as_str().unwrap();
    let response = app.request(
        "PUT",
        &format!("/api/v1/payments/{}/status", payment_id),
        Some(&auth),
        Some(serde_json::json!({ "status": "completed", "transaction_id": "TXN-1" })),
    ).await;
    assert_eq!(response.status(), 200);
    let body = parse_body(response).await;
    assert_eq!(body["is_overdue"], false);
    assert_eq!(body["transaction_id"], "TXN-1");
    assert!(body["payment_date"].is_string());
}

#[tokio::test]
async fn test_completing_requires_transaction_id() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let occupancy_id = setup_occupancy(&app, &auth).await;

    let body = create_payment(&app, &auth, &occupancy_id, "2099-01-01").await;
    let payment_id = body["id"].as_str().unwrap().to_string();

    let response = app.request(
        "PUT",
        &format!("/api/v1/payments/{}/status", payment_id),
        Some(&auth),
        Some(serde_json::json!({ "status": "completed" })),
    ).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_payment_status_transitions() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let occupancy_id = setup_occupancy(&app, &auth).await;

    let body = create_payment(&app, &auth, &occupancy_id, "2099-01-01").await;
    let payment_id = body["id"].as_str().unwrap().to_string();
    let status_uri = format!("/api/v1/payments/{}/status", payment_id);

    let response = app.request(
        "PUT", &status_uri, Some(&auth),
        Some(serde_json::json!({ "status": "completed", "transaction_id": "TXN-2" })),
    ).await;
    assert_eq!(response.status(), 200);

    // Failed is terminal for a separate payment.
    let other = create_payment(&app, &auth, &occupancy_id, "2099-03-01").await;
    let other_uri = format!("/api/v1/payments/{}/status", other["id"].as_str().unwrap());
    let response = app.request("PUT", &other_uri, Some(&auth), Some(serde_json::json!({ "status": "failed" }))).await;
    assert_eq!(response.status(), 200);
    let response = app.request("PUT", &other_uri, Some(&auth), Some(serde_json::json!({ "status": "pending" }))).await;
    assert_eq!(response.status(), 400);

    // A completed payment cannot go back to pending or failed.
    let response = app.request("PUT", &status_uri, Some(&auth), Some(serde_json::json!({ "status": "pending" }))).await;
    assert_eq!(response.status(), 400);
    let response = app.request("PUT", &status_uri, Some(&auth), Some(serde_json::json!({ "status": "failed" }))).await;
    assert_eq!(response.status(), 400);

    let response = app.request("PUT", &status_uri, Some(&auth), Some(serde_json::json!({ "status": "refunded" }))).await;
    assert_eq!(response.status(), 200);
    assert_eq!(parse_body(response).await["status"], "refunded");

    // Refunded is terminal.
    let response = app.request("PUT", &status_uri, Some(&auth), Some(serde_json::json!({ "status": "pending" }))).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_students_see_only_their_own_payments() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;

    let alice_id = app.create_student(&admin, "alice").await;
    let bob_id = app.create_student(&admin, "bob").await;
    let room_id = app.create_room(&admin, "R101", 2).await;

    let response = app.assign(&admin, &alice_id, &room_id, "A").await;
    let alice_occ = parse_body(response).await["id"].as_str().unwrap().to_string();
    let response = app.assign(&admin, &bob_id, &room_id, "B").await;
    let bob_occ = parse_body(response).await["id"].as_str().unwrap().to_string();

    create_payment(&app, &admin, &alice_occ, "2099-01-01").await;
    create_payment(&app, &admin, &bob_occ, "2099-01-01").await;

    let alice = app.login("alice", "student-pw-123").await;
    let response = app.request("GET", "/api/v1/payments", Some(&alice), None).await;
    assert_eq!(response.status(), 200);
    let payments = parse_body(response).await;
    let payments = payments.as_array().unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0]["occupancy_id"], Value::String(alice_occ));

    // Staff get everything.
    let response = app.request("GET", "/api/v1/payments", Some(&admin), None).await;
    assert_eq!(parse_body(response).await.as_array().unwrap().len(), 2);

    // Students cannot record payments or flip statuses.
    let response = app.request("POST", "/api/v1/payments", Some(&alice), Some(serde_json::json!({
        "occupancy_id": bob_occ,
        "amount": 1.0,
        "payment_type": "rent",
        "due_date": "2099-01-01"
    }))).await;
    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn test_list_payments_filters_by_status() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let occupancy_id = setup_occupancy(&app, &auth).await;

    let first = create_payment(&app, &auth, &occupancy_id, "2099-01-01").await;
    create_payment(&app, &auth, &occupancy_id, "2099-02-01").await;

    let payment_id = first["id"].as_str().unwrap();
    app.request(
        "PUT",
        &format!("/api/v1/payments/{}/status", payment_id),
        Some(&auth),
        Some(serde_json::json!({ "status": "completed", "transaction_id": "TXN-3" })),
    ).await;

    let response = app.request("GET", "/api/v1/payments?status=pending", Some(&auth), None).await;
    let payments = parse_body(response).await;
    assert_eq!(payments.as_array().unwrap().len(), 1);

    let response = app.request("GET", "/api/v1/payments?status=completed", Some(&auth), None).await;
    let payments = parse_body(response).await;
    assert_eq!(payments.as_array().unwrap().len(), 1);
}
