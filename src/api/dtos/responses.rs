use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::models::payment::Payment;
use crate::domain::models::room::{Room, RoomStatus};
use crate::domain::ports::RoomCounts;

/// Room plus the fields derived from the counter, as the list and detail
/// endpoints expose them.
#[derive(Serialize)]
pub struct RoomResponse {
    pub id: String,
    pub room_number: String,
    pub capacity: i32,
    pub current_occupancy: i32,
    pub status: RoomStatus,
    pub room_type: String,
    pub monthly_rent: f64,
    pub description: Option<String>,
    pub amenities: Vec<String>,
    pub is_available: bool,
    pub occupancy_percentage: f64,
}

impl From<&Room> for RoomResponse {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.clone(),
            room_number: room.room_number.clone(),
            capacity: room.capacity,
            current_occupancy: room.current_occupancy,
            status: room.status,
            room_type: room.room_type.clone(),
            monthly_rent: room.monthly_rent,
            description: room.description.clone(),
            amenities: room.amenity_list(),
            is_available: room.is_available(),
            occupancy_percentage: room.occupancy_percentage(),
        }
    }
}

#[derive(Serialize)]
pub struct OccupantSummary {
    pub name: String,
    pub bed_number: String,
    pub check_in_date: NaiveDate,
    pub emergency_contact: String,
}

#[derive(Serialize)]
pub struct RoomDetailResponse {
    #[serde(flatten)]
    pub room: RoomResponse,
    pub occupants: Vec<OccupantSummary>,
}

#[derive(Serialize)]
pub struct PaymentResponse {
    #[serde(flatten)]
    pub payment: Payment,
    pub is_overdue: bool,
}

#[derive(Serialize)]
pub struct DashboardStats {
    #[serde(flatten)]
    pub rooms: RoomCounts,
    pub total_students: i64,
    pub active_occupancies: i64,
    pub pending_payments: i64,
    pub overdue_payments: i64,
    pub open_issues: i64,
    pub urgent_issues: i64,
}
