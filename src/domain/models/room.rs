use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::AppError;

pub const MIN_CAPACITY: i32 = 1;
pub const MAX_CAPACITY: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RoomStatus {
    Available,
    Occupied,
    Maintenance,
}

/// A room with a denormalized `current_occupancy` counter. The counter is
/// owned exclusively by the occupancy write path: the assign/checkout
/// transactions are the only code that ever adjusts it.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Room {
    pub id: String,
    pub room_number: String,
    pub capacity: i32,
    pub current_occupancy: i32,
    pub status: RoomStatus,
    pub room_type: String,
    pub monthly_rent: f64,
    pub description: Option<String>,
    pub amenities: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewRoomParams {
    pub room_number: String,
    pub capacity: i32,
    pub room_type: String,
    pub monthly_rent: f64,
    pub description: Option<String>,
    pub amenities: Option<String>,
}

impl Room {
    pub fn new(params: NewRoomParams) -> Result<Self, AppError> {
        validate_capacity(params.capacity)?;
        validate_rent(params.monthly_rent)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            room_number: params.room_number,
            capacity: params.capacity,
            current_occupancy: 0,
            status: RoomStatus::Available,
            room_type: params.room_type,
            monthly_rent: params.monthly_rent,
            description: params.description,
            amenities: params.amenities,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_available(&self) -> bool {
        self.current_occupancy < self.capacity && self.status == RoomStatus::Available
    }

    pub fn occupancy_percentage(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        (self.current_occupancy as f64 / self.capacity as f64) * 100.0
    }

    /// Comma-separated amenities column split for JSON output.
    pub fn amenity_list(&self) -> Vec<String> {
        self.amenities
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect()
    }
}

pub fn validate_capacity(capacity: i32) -> Result<(), AppError> {
    if !(MIN_CAPACITY..=MAX_CAPACITY).contains(&capacity) {
        return Err(AppError::Validation(format!(
            "Capacity must be between {} and {}",
            MIN_CAPACITY, MAX_CAPACITY
        )));
    }
    Ok(())
}

pub fn validate_rent(rent: f64) -> Result<(), AppError> {
    if rent < 0.0 || !rent.is_finite() {
        return Err(AppError::Validation("Monthly rent must not be negative".into()));
    }
    Ok(())
}
