use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const TOKEN_TTL_HOURS: i64 = 24;

/// Single-use email verification token. A token is spendable while it is
/// neither consumed nor expired.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct EmailVerification {
    pub token: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub verified: bool,
}

impl EmailVerification {
    pub fn new(user_id: String) -> Self {
        let now = Utc::now();
        Self {
            token: Uuid::new_v4().to_string(),
            user_id,
            created_at: now,
            expires_at: now + Duration::hours(TOKEN_TTL_HOURS),
            verified: false,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.verified && !self.is_expired(now)
    }
}
