use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::models::issue::{IssueCategory, IssuePriority, IssueStatus};
use crate::domain::models::payment::{PaymentStatus, PaymentType};
use crate::domain::models::room::RoomStatus;
use crate::domain::models::user::Role;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Deserialize)]
pub struct ResendVerificationRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateRoomRequest {
    pub room_number: String,
    pub capacity: i32,
    pub room_type: Option<String>,
    pub monthly_rent: f64,
    pub description: Option<String>,
    pub amenities: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateRoomRequest {
    pub room_number: Option<String>,
    pub capacity: Option<i32>,
    pub status: Option<RoomStatus>,
    pub room_type: Option<String>,
    pub monthly_rent: Option<f64>,
    pub description: Option<String>,
    pub amenities: Option<String>,
}

#[derive(Deserialize)]
pub struct AssignOccupancyRequest {
    pub student_id: String,
    pub room_id: String,
    pub bed_number: String,
    pub check_in_date: NaiveDate,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct CreatePaymentRequest {
    pub occupancy_id: String,
    pub amount: f64,
    pub payment_type: PaymentType,
    pub payment_method: Option<String>,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdatePaymentStatusRequest {
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateIssueRequest {
    /// Ignored for students; their active occupancy's room is used instead.
    pub room_id: Option<String>,
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    pub priority: Option<IssuePriority>,
}

#[derive(Deserialize)]
pub struct UpdateIssueRequest {
    pub status: IssueStatus,
    pub assigned_to: Option<String>,
    pub resolution_notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UserListQuery {
    pub role: Option<Role>,
}

#[derive(Deserialize)]
pub struct RoomListQuery {
    pub status: Option<RoomStatus>,
}

#[derive(Deserialize)]
pub struct OccupancyListQuery {
    pub active: Option<bool>,
}

#[derive(Deserialize)]
pub struct PaymentListQuery {
    pub status: Option<PaymentStatus>,
}

#[derive(Deserialize)]
pub struct IssueListQuery {
    pub status: Option<IssueStatus>,
    pub priority: Option<IssuePriority>,
}
