use crate::domain::{
    models::payment::{Payment, PaymentStatus},
    ports::PaymentRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};

pub struct PostgresPaymentRepo {
    pool: PgPool,
}

impl PostgresPaymentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepo {
    async fn create(&self, payment: &Payment) -> Result<Payment, AppError> {
        sqlx::query_as::<_, Payment>(
            "INSERT INTO payments (id, occupancy_id, amount, payment_type, payment_method, status, due_date, payment_date, transaction_id, notes, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING *"
        )
            .bind(&payment.id).bind(&payment.occupancy_id).bind(payment.amount)
            .bind(payment.payment_type).bind(&payment.payment_method).bind(payment.status)
            .bind(payment.due_date).bind(payment.payment_date).bind(&payment.transaction_id)
            .bind(&payment.notes).bind(payment.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Payment>, AppError> {
        sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, status: Option<PaymentStatus>) -> Result<Vec<Payment>, AppError> {
        match status {
            Some(s) => sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE status = $1 ORDER BY due_date DESC").bind(s).fetch_all(&self.pool).await.map_err(AppError::Database),
            None => sqlx::query_as::<_, Payment>("SELECT * FROM payments ORDER BY due_date DESC").fetch_all(&self.pool).await.map_err(AppError::Database),
        }
    }

    async fn list_by_student(&self, student_id: &str, status: Option<PaymentStatus>) -> Result<Vec<Payment>, AppError> {
        match status {
            Some(s) => sqlx::query_as::<_, Payment>(
                "SELECT p.* FROM payments p
                 JOIN occupancies o ON p.occupancy_id = o.id
                 WHERE o.student_id = $1 AND p.status = $2
                 ORDER BY p.due_date DESC"
            ).bind(student_id).bind(s).fetch_all(&self.pool).await.map_err(AppError::Database),
            None => sqlx::query_as::<_, Payment>(
                "SELECT p.* FROM payments p
                 JOIN occupancies o ON p.occupancy_id = o.id
                 WHERE o.student_id = $1
                 ORDER BY p.due_date DESC"
            ).bind(student_id).fetch_all(&self.pool).await.map_err(AppError::Database),
        }
    }

    async fn update(&self, payment: &Payment) -> Result<Payment, AppError> {
        sqlx::query_as::<_, Payment>(
            "UPDATE payments SET status = $1, payment_date = $2, transaction_id = $3, notes = $4
             WHERE id = $5
             RETURNING *"
        )
            .bind(payment.status).bind(payment.payment_date).bind(&payment.transaction_id)
            .bind(&payment.notes).bind(&payment.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn count_by_status(&self, status: PaymentStatus) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM payments WHERE status = $1").bind(status).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }

    async fn count_overdue(&self, today: NaiveDate) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM payments WHERE status = 'pending' AND due_date < $1").bind(today).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }
}
