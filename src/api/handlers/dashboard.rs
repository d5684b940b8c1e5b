use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::dtos::responses::DashboardStats;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::payment::PaymentStatus;
use crate::domain::models::user::Role;
use crate::domain::policy::{authorize, Action};
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;

pub async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    authorize(&actor, Action::ViewDashboard)?;

    let today = Utc::now().date_naive();

    let stats = DashboardStats {
        rooms: state.room_repo.counts().await?,
        total_students: state.user_repo.count_by_role(Role::Student).await?,
        active_occupancies: state.occupancy_repo.count_active().await?,
        pending_payments: state.payment_repo.count_by_status(PaymentStatus::Pending).await?,
        overdue_payments: state.payment_repo.count_overdue(today).await?,
        open_issues: state.issue_repo.count_unresolved().await?,
        urgent_issues: state.issue_repo.count_unresolved_urgent().await?,
    };

    Ok(Json(stats))
}
