use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::dtos::requests::{AssignOccupancyRequest, OccupancyListQuery};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::occupancy::{NewOccupancyParams, Occupancy};
use crate::domain::models::user::Role;
use crate::domain::policy::{authorize, Action};
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use tracing::info;

pub async fn assign_occupancy(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<AssignOccupancyRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&actor, Action::ManageOccupancies)?;

    let student = state.user_repo.find_by_id(&payload.student_id).await?
        .ok_or(AppError::NotFound("Student not found".into()))?;
    if student.role != Role::Student {
        return Err(AppError::Validation("Occupancies can only be assigned to students".into()));
    }

    let room = state.room_repo.find_by_id(&payload.room_id).await?
        .ok_or(AppError::NotFound("Room not found".into()))?;

    // Pre-checks give precise error messages; the assign transaction and the
    // partial unique indexes re-verify all three under concurrency.
    if !room.is_available() {
        return Err(AppError::Conflict(format!("Room {} is not available", room.room_number)));
    }
    if state.occupancy_repo.find_active_by_student(&student.id).await?.is_some() {
        return Err(AppError::Conflict("Student already has an active occupancy".into()));
    }
    let beds_taken = state.occupancy_repo.list_active_by_room(&room.id).await?;
    if beds_taken.iter().any(|o| o.bed_number == payload.bed_number) {
        return Err(AppError::Conflict(format!(
            "Bed {} in room {} is already occupied",
            payload.bed_number, room.room_number
        )));
    }

    let occupancy = Occupancy::new(NewOccupancyParams {
        student_id: student.id.clone(),
        room_id: room.id.clone(),
        check_in_date: payload.check_in_date,
        bed_number: payload.bed_number,
        emergency_contact_name: payload.emergency_contact_name,
        emergency_contact_phone: payload.emergency_contact_phone,
        notes: payload.notes,
    });
    let created = state.occupancy_repo.assign(&occupancy).await?;

    info!(
        "Assigned student {} to room {} bed {}",
        student.username, room.room_number, created.bed_number
    );

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn checkout_occupancy(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(occupancy_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&actor, Action::ManageOccupancies)?;

    let today = Utc::now().date_naive();
    let checked_out = state.occupancy_repo.checkout(&occupancy_id, today).await?;

    info!("Checked out occupancy {}", checked_out.id);

    Ok(Json(checked_out))
}

pub async fn list_occupancies(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Query(query): Query<OccupancyListQuery>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&actor, Action::ManageOccupancies)?;

    let occupancies = state.occupancy_repo.list(query.active).await?;
    Ok(Json(occupancies))
}
