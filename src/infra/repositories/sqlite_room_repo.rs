use crate::domain::{
    models::room::{Room, RoomStatus},
    ports::{RoomCounts, RoomRepository},
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

pub struct SqliteRoomRepo {
    pool: SqlitePool,
}

impl SqliteRoomRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for SqliteRoomRepo {
    async fn create(&self, room: &Room) -> Result<Room, AppError> {
        sqlx::query_as::<_, Room>(
            "INSERT INTO rooms (id, room_number, capacity, current_occupancy, status, room_type, monthly_rent, description, amenities, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&room.id).bind(&room.room_number).bind(room.capacity).bind(room.current_occupancy)
            .bind(room.status).bind(&room.room_type).bind(room.monthly_rent)
            .bind(&room.description).bind(&room.amenities).bind(room.created_at).bind(room.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Room>, AppError> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_number(&self, room_number: &str) -> Result<Option<Room>, AppError> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE room_number = ?").bind(room_number).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, status: Option<RoomStatus>) -> Result<Vec<Room>, AppError> {
        match status {
            Some(s) => sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE status = ? ORDER BY room_number ASC").bind(s).fetch_all(&self.pool).await.map_err(AppError::Database),
            None => sqlx::query_as::<_, Room>("SELECT * FROM rooms ORDER BY room_number ASC").fetch_all(&self.pool).await.map_err(AppError::Database),
        }
    }

    async fn update(&self, room: &Room) -> Result<Room, AppError> {
        // current_occupancy is deliberately absent: only the occupancy
        // assign/checkout transactions may touch the counter.
        sqlx::query_as::<_, Room>(
            "UPDATE rooms SET room_number = ?, capacity = ?, status = ?, room_type = ?, monthly_rent = ?, description = ?, amenities = ?, updated_at = ?
             WHERE id = ?
             RETURNING *"
        )
            .bind(&room.room_number).bind(room.capacity).bind(room.status).bind(&room.room_type)
            .bind(room.monthly_rent).bind(&room.description).bind(&room.amenities).bind(room.updated_at)
            .bind(&room.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = ?").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Room not found".into()));
        }
        Ok(())
    }

    async fn counts(&self) -> Result<RoomCounts, AppError> {
        let row = sqlx::query(
            "SELECT COUNT(*) as total_rooms,
                    COALESCE(SUM(CASE WHEN current_occupancy > 0 THEN 1 ELSE 0 END), 0) as occupied_rooms,
                    COALESCE(SUM(CASE WHEN status = 'available' AND current_occupancy = 0 THEN 1 ELSE 0 END), 0) as vacant_rooms,
                    COALESCE(SUM(CASE WHEN status = 'maintenance' THEN 1 ELSE 0 END), 0) as maintenance_rooms
             FROM rooms"
        ).fetch_one(&self.pool).await.map_err(AppError::Database)?;

        Ok(RoomCounts {
            total_rooms: row.get::<i64, _>("total_rooms"),
            occupied_rooms: row.get::<i64, _>("occupied_rooms"),
            vacant_rooms: row.get::<i64, _>("vacant_rooms"),
            maintenance_rooms: row.get::<i64, _>("maintenance_rooms"),
        })
    }
}
