use crate::domain::models::{
    auth::RefreshTokenRecord,
    issue::{Issue, IssuePriority, IssueStatus},
    occupancy::Occupancy,
    payment::{Payment, PaymentStatus},
    room::{Room, RoomStatus},
    user::{Role, User},
    verification::EmailVerification,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
    async fn set_email_verified(&self, id: &str) -> Result<(), AppError>;
    async fn count_by_role(&self, role: Role) -> Result<i64, AppError>;
}

#[derive(Debug, Serialize, Default)]
pub struct RoomCounts {
    pub total_rooms: i64,
    pub occupied_rooms: i64,
    pub vacant_rooms: i64,
    pub maintenance_rooms: i64,
}

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create(&self, room: &Room) -> Result<Room, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Room>, AppError>;
    async fn find_by_number(&self, room_number: &str) -> Result<Option<Room>, AppError>;
    async fn list(&self, status: Option<RoomStatus>) -> Result<Vec<Room>, AppError>;
    async fn update(&self, room: &Room) -> Result<Room, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn counts(&self) -> Result<RoomCounts, AppError>;
}

#[async_trait]
pub trait OccupancyRepository: Send + Sync {
    /// Inserts the occupancy row and increments the owning room's counter in
    /// one transaction. The increment re-checks capacity server-side, so a
    /// concurrent assign racing past the availability pre-check still cannot
    /// overshoot; losing the race yields a Conflict.
    async fn assign(&self, occupancy: &Occupancy) -> Result<Occupancy, AppError>;

    /// Deactivates the occupancy and decrements the room counter (clamped at
    /// zero) in one transaction. A second checkout of the same row finds
    /// nothing active and reports NotFound without touching the counter.
    async fn checkout(&self, id: &str, check_out_date: NaiveDate) -> Result<Occupancy, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Occupancy>, AppError>;
    async fn find_active_by_student(&self, student_id: &str) -> Result<Option<Occupancy>, AppError>;
    async fn list(&self, active: Option<bool>) -> Result<Vec<Occupancy>, AppError>;
    async fn list_active_by_room(&self, room_id: &str) -> Result<Vec<Occupancy>, AppError>;
    async fn count_active(&self) -> Result<i64, AppError>;
    async fn count_active_by_room(&self, room_id: &str) -> Result<i64, AppError>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, payment: &Payment) -> Result<Payment, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Payment>, AppError>;
    async fn list(&self, status: Option<PaymentStatus>) -> Result<Vec<Payment>, AppError>;
    async fn list_by_student(
        &self,
        student_id: &str,
        status: Option<PaymentStatus>,
    ) -> Result<Vec<Payment>, AppError>;
    async fn update(&self, payment: &Payment) -> Result<Payment, AppError>;
    async fn count_by_status(&self, status: PaymentStatus) -> Result<i64, AppError>;
    async fn count_overdue(&self, today: NaiveDate) -> Result<i64, AppError>;
}

#[async_trait]
pub trait IssueRepository: Send + Sync {
    async fn create(&self, issue: &Issue) -> Result<Issue, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Issue>, AppError>;
    async fn list(
        &self,
        reporter: Option<&str>,
        status: Option<IssueStatus>,
        priority: Option<IssuePriority>,
    ) -> Result<Vec<Issue>, AppError>;
    async fn update(&self, issue: &Issue) -> Result<Issue, AppError>;
    async fn count_unresolved(&self) -> Result<i64, AppError>;
    async fn count_unresolved_urgent(&self) -> Result<i64, AppError>;
}

#[async_trait]
pub trait VerificationRepository: Send + Sync {
    async fn create(&self, verification: &EmailVerification) -> Result<EmailVerification, AppError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<EmailVerification>, AppError>;
    async fn mark_verified(&self, token: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_refresh_family(&self, family_id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError>;
}
