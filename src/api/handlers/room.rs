use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::dtos::requests::{CreateRoomRequest, RoomListQuery, UpdateRoomRequest};
use crate::api::dtos::responses::{OccupantSummary, RoomDetailResponse, RoomResponse};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::room::{self, NewRoomParams, Room};
use crate::domain::policy::{authorize, Action};
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use tracing::info;

pub async fn create_room(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<CreateRoomRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&actor, Action::ManageRooms)?;

    let room_number = payload.room_number.trim().to_string();
    if room_number.is_empty() {
        return Err(AppError::Validation("Room number is required".into()));
    }
    if state.room_repo.find_by_number(&room_number).await?.is_some() {
        return Err(AppError::Conflict(format!("Room {} already exists", room_number)));
    }

    let room = Room::new(NewRoomParams {
        room_number,
        capacity: payload.capacity,
        room_type: payload.room_type.unwrap_or_else(|| "Standard".to_string()),
        monthly_rent: payload.monthly_rent,
        description: payload.description,
        amenities: payload.amenities,
    })?;
    let created = state.room_repo.create(&room).await?;

    info!("Created room {} ({})", created.room_number, created.id);

    Ok((StatusCode::CREATED, Json(RoomResponse::from(&created))))
}

pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Query(query): Query<RoomListQuery>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&actor, Action::ListRooms)?;

    let rooms = state.room_repo.list(query.status).await?;
    let response: Vec<RoomResponse> = rooms.iter().map(RoomResponse::from).collect();
    Ok(Json(response))
}

/// Room detail with active occupants, as consumed by the room cards.
pub async fn get_room(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(room_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&actor, Action::ReadRoom)?;

    let room = state.room_repo.find_by_id(&room_id).await?
        .ok_or(AppError::NotFound("Room not found".into()))?;

    let occupancies = state.occupancy_repo.list_active_by_room(&room.id).await?;

    let mut occupants = Vec::with_capacity(occupancies.len());
    for occupancy in &occupancies {
        let name = state.user_repo.find_by_id(&occupancy.student_id).await?
            .map(|u| u.username)
            .unwrap_or_else(|| occupancy.student_id.clone());
        occupants.push(OccupantSummary {
            name,
            bed_number: occupancy.bed_number.clone(),
            check_in_date: occupancy.check_in_date,
            emergency_contact: format!(
                "{} - {}",
                occupancy.emergency_contact_name, occupancy.emergency_contact_phone
            ),
        });
    }

    Ok(Json(RoomDetailResponse {
        room: RoomResponse::from(&room),
        occupants,
    }))
}

pub async fn update_room(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(room_id): Path<String>,
    Json(payload): Json<UpdateRoomRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&actor, Action::ManageRooms)?;

    let mut room = state.room_repo.find_by_id(&room_id).await?
        .ok_or(AppError::NotFound("Room not found".into()))?;

    if let Some(room_number) = payload.room_number {
        let room_number = room_number.trim().to_string();
        if room_number != room.room_number {
            if state.room_repo.find_by_number(&room_number).await?.is_some() {
                return Err(AppError::Conflict(format!("Room {} already exists", room_number)));
            }
            room.room_number = room_number;
        }
    }
    if let Some(capacity) = payload.capacity {
        room::validate_capacity(capacity)?;
        // Shrinking below the live headcount would strand occupants.
        if capacity < room.current_occupancy {
            return Err(AppError::Validation(format!(
                "Capacity {} is below current occupancy {}",
                capacity, room.current_occupancy
            )));
        }
        room.capacity = capacity;
    }
    if let Some(rent) = payload.monthly_rent {
        room::validate_rent(rent)?;
        room.monthly_rent = rent;
    }
    if let Some(status) = payload.status {
        room.status = status;
    }
    if let Some(room_type) = payload.room_type {
        room.room_type = room_type;
    }
    if let Some(description) = payload.description {
        room.description = Some(description);
    }
    if let Some(amenities) = payload.amenities {
        room.amenities = Some(amenities);
    }
    room.updated_at = Utc::now();

    let updated = state.room_repo.update(&room).await?;
    Ok(Json(RoomResponse::from(&updated)))
}

pub async fn delete_room(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(room_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&actor, Action::ManageRooms)?;

    let room = state.room_repo.find_by_id(&room_id).await?
        .ok_or(AppError::NotFound("Room not found".into()))?;

    let active = state.occupancy_repo.count_active_by_room(&room.id).await?;
    if active > 0 {
        return Err(AppError::Conflict(format!(
            "Room {} has {} active occupancies; check them out first",
            room.room_number, active
        )));
    }

    state.room_repo.delete(&room.id).await?;

    info!("Deleted room {}", room.room_number);

    Ok(Json(serde_json::json!({ "status": "deleted" })))
}
