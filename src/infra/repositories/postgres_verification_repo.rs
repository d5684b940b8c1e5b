use crate::domain::{models::verification::EmailVerification, ports::VerificationRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresVerificationRepo {
    pool: PgPool,
}

impl PostgresVerificationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerificationRepository for PostgresVerificationRepo {
    async fn create(&self, verification: &EmailVerification) -> Result<EmailVerification, AppError> {
        sqlx::query_as::<_, EmailVerification>(
            "INSERT INTO email_verifications (token, user_id, created_at, expires_at, verified)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *"
        )
            .bind(&verification.token).bind(&verification.user_id)
            .bind(verification.created_at).bind(verification.expires_at).bind(verification.verified)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<EmailVerification>, AppError> {
        sqlx::query_as::<_, EmailVerification>("SELECT * FROM email_verifications WHERE token = $1").bind(token).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn mark_verified(&self, token: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE email_verifications SET verified = TRUE WHERE token = $1").bind(token).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Verification token not found".into()));
        }
        Ok(())
    }
}
