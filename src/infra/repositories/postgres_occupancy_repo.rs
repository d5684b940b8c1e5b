use crate::domain::{models::occupancy::Occupancy, ports::OccupancyRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{PgPool, Row};

pub struct PostgresOccupancyRepo {
    pool: PgPool,
}

impl PostgresOccupancyRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OccupancyRepository for PostgresOccupancyRepo {
    async fn assign(&self, occupancy: &Occupancy) -> Result<Occupancy, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Conditional UPDATE takes the row lock and re-checks capacity in one
        // statement; a concurrent assign for the last bed loses cleanly.
        let reserved = sqlx::query(
            "UPDATE rooms SET current_occupancy = current_occupancy + 1, updated_at = $1
             WHERE id = $2 AND status = 'available' AND current_occupancy < capacity"
        )
            .bind(Utc::now()).bind(&occupancy.room_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        if reserved.rows_affected() == 0 {
            return Err(AppError::Conflict("Room is not available for occupancy".into()));
        }

        let created = sqlx::query_as::<_, Occupancy>(
            "INSERT INTO occupancies (id, student_id, room_id, check_in_date, check_out_date, bed_number, is_active, emergency_contact_name, emergency_contact_phone, notes, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING *"
        )
            .bind(&occupancy.id).bind(&occupancy.student_id).bind(&occupancy.room_id)
            .bind(occupancy.check_in_date).bind(occupancy.check_out_date).bind(&occupancy.bed_number)
            .bind(occupancy.is_active).bind(&occupancy.emergency_contact_name)
            .bind(&occupancy.emergency_contact_phone).bind(&occupancy.notes).bind(occupancy.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn checkout(&self, id: &str, check_out_date: NaiveDate) -> Result<Occupancy, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let checked_out = sqlx::query_as::<_, Occupancy>(
            "UPDATE occupancies SET is_active = FALSE, check_out_date = $1
             WHERE id = $2 AND is_active
             RETURNING *"
        )
            .bind(check_out_date).bind(id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Occupancy not found or already checked out".into()))?;

        sqlx::query(
            "UPDATE rooms SET current_occupancy = GREATEST(current_occupancy - 1, 0), updated_at = $1
             WHERE id = $2"
        )
            .bind(Utc::now()).bind(&checked_out.room_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(checked_out)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Occupancy>, AppError> {
        sqlx::query_as::<_, Occupancy>("SELECT * FROM occupancies WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_active_by_student(&self, student_id: &str) -> Result<Option<Occupancy>, AppError> {
        sqlx::query_as::<_, Occupancy>("SELECT * FROM occupancies WHERE student_id = $1 AND is_active").bind(student_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, active: Option<bool>) -> Result<Vec<Occupancy>, AppError> {
        match active {
            Some(flag) => sqlx::query_as::<_, Occupancy>("SELECT * FROM occupancies WHERE is_active = $1 ORDER BY check_in_date DESC").bind(flag).fetch_all(&self.pool).await.map_err(AppError::Database),
            None => sqlx::query_as::<_, Occupancy>("SELECT * FROM occupancies ORDER BY check_in_date DESC").fetch_all(&self.pool).await.map_err(AppError::Database),
        }
    }

    async fn list_active_by_room(&self, room_id: &str) -> Result<Vec<Occupancy>, AppError> {
        sqlx::query_as::<_, Occupancy>("SELECT * FROM occupancies WHERE room_id = $1 AND is_active ORDER BY bed_number ASC").bind(room_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn count_active(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM occupancies WHERE is_active").fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }

    async fn count_active_by_room(&self, room_id: &str) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM occupancies WHERE room_id = $1 AND is_active").bind(room_id).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }
}
