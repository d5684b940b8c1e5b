use std::sync::Arc;

use crate::config::Config;
use crate::domain::ports::{
    AuthRepository, EmailService, IssueRepository, OccupancyRepository, PaymentRepository,
    RoomRepository, UserRepository, VerificationRepository,
};
use crate::domain::services::auth_service::AuthService;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub room_repo: Arc<dyn RoomRepository>,
    pub occupancy_repo: Arc<dyn OccupancyRepository>,
    pub payment_repo: Arc<dyn PaymentRepository>,
    pub issue_repo: Arc<dyn IssueRepository>,
    pub verification_repo: Arc<dyn VerificationRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub auth_service: Arc<AuthService>,
    pub email_service: Arc<dyn EmailService>,
    pub templates: Arc<Tera>,
}
