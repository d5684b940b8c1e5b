use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::dtos::requests::{CreatePaymentRequest, PaymentListQuery, UpdatePaymentStatusRequest};
use crate::api::dtos::responses::PaymentResponse;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::payment::{NewPaymentParams, Payment};
use crate::domain::policy::{authorize, Action};
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use tracing::info;

pub async fn create_payment(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&actor, Action::ManagePayments)?;

    let occupancy = state.occupancy_repo.find_by_id(&payload.occupancy_id).await?
        .ok_or(AppError::NotFound("Occupancy not found".into()))?;

    let payment = Payment::new(NewPaymentParams {
        occupancy_id: occupancy.id,
        amount: payload.amount,
        payment_type: payload.payment_type,
        payment_method: payload.payment_method.unwrap_or_else(|| "Cash".to_string()),
        due_date: payload.due_date,
        notes: payload.notes,
    })?;
    let created = state.payment_repo.create(&payment).await?;

    info!("Created payment {} for occupancy {}", created.id, created.occupancy_id);

    let is_overdue = created.is_overdue(Utc::now().date_naive());
    Ok((StatusCode::CREATED, Json(PaymentResponse { payment: created, is_overdue })))
}

pub async fn list_payments(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Query(query): Query<PaymentListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let owner = if actor.role.is_staff() { None } else { Some(actor.id.as_str()) };
    authorize(&actor, Action::ListPayments { owner })?;

    let payments = match owner {
        // Students see their own ledger across past and present occupancies.
        Some(student_id) => state.payment_repo.list_by_student(student_id, query.status).await?,
        None => state.payment_repo.list(query.status).await?,
    };

    let today = Utc::now().date_naive();
    let response: Vec<PaymentResponse> = payments
        .into_iter()
        .map(|p| {
            let is_overdue = p.is_overdue(today);
            PaymentResponse { payment: p, is_overdue }
        })
        .collect();

    Ok(Json(response))
}

pub async fn update_payment_status(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(payment_id): Path<String>,
    Json(payload): Json<UpdatePaymentStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&actor, Action::ManagePayments)?;

    let mut payment = state.payment_repo.find_by_id(&payment_id).await?
        .ok_or(AppError::NotFound("Payment not found".into()))?;

    let today = Utc::now().date_naive();
    payment.transition(payload.status, payload.transaction_id, today)?;

    let updated = state.payment_repo.update(&payment).await?;

    info!("Payment {} moved to {:?}", updated.id, updated.status);

    let is_overdue = updated.is_overdue(today);
    Ok(Json(PaymentResponse { payment: updated, is_overdue }))
}
