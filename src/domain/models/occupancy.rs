use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Time-bounded assignment of one student to one bed in one room.
///
/// Checkout is terminal for a row: `is_active` only ever transitions
/// true -> false. Re-assigning a student creates a fresh row.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Occupancy {
    pub id: String,
    pub student_id: String,
    pub room_id: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: Option<NaiveDate>,
    pub bed_number: String,
    pub is_active: bool,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewOccupancyParams {
    pub student_id: String,
    pub room_id: String,
    pub check_in_date: NaiveDate,
    pub bed_number: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub notes: Option<String>,
}

impl Occupancy {
    pub fn new(params: NewOccupancyParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            student_id: params.student_id,
            room_id: params.room_id,
            check_in_date: params.check_in_date,
            check_out_date: None,
            bed_number: params.bed_number,
            is_active: true,
            emergency_contact_name: params.emergency_contact_name,
            emergency_contact_phone: params.emergency_contact_phone,
            notes: params.notes,
            created_at: Utc::now(),
        }
    }
}
