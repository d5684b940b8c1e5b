use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;

use crate::api::handlers::{auth, dashboard, health, issue, occupancy, payment, room, user};
use crate::state::AppState;
use tower_cookies::CookieManagerLayer;
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth & account lifecycle
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/verify-email/{token}", get(auth::verify_email))
        .route("/api/v1/auth/resend-verification", post(auth::resend_verification))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))

        // Staff account management
        .route("/api/v1/users", post(user::create_user).get(user::list_users))

        // Rooms
        .route("/api/v1/rooms", get(room::list_rooms).post(room::create_room))
        .route("/api/v1/rooms/{room_id}", get(room::get_room).put(room::update_room).delete(room::delete_room))

        // Occupancies
        .route("/api/v1/occupancies", get(occupancy::list_occupancies).post(occupancy::assign_occupancy))
        .route("/api/v1/occupancies/{occupancy_id}/checkout", post(occupancy::checkout_occupancy))

        // Payments
        .route("/api/v1/payments", get(payment::list_payments).post(payment::create_payment))
        .route("/api/v1/payments/{payment_id}/status", put(payment::update_payment_status))

        // Issues
        .route("/api/v1/issues", get(issue::list_issues).post(issue::create_issue))
        .route("/api/v1/issues/{issue_id}", get(issue::get_issue).put(issue::update_issue))

        // Dashboard
        .route("/api/v1/dashboard/stats", get(dashboard::dashboard_stats))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
