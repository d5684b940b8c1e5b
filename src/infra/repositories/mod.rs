pub mod sqlite_auth_repo;
pub mod sqlite_issue_repo;
pub mod sqlite_occupancy_repo;
pub mod sqlite_payment_repo;
pub mod sqlite_room_repo;
pub mod sqlite_user_repo;
pub mod sqlite_verification_repo;

pub mod postgres_auth_repo;
pub mod postgres_issue_repo;
pub mod postgres_occupancy_repo;
pub mod postgres_payment_repo;
pub mod postgres_room_repo;
pub mod postgres_user_repo;
pub mod postgres_verification_repo;
