use crate::domain::{
    models::issue::{Issue, IssuePriority, IssueStatus},
    ports::IssueRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

pub struct SqliteIssueRepo {
    pool: SqlitePool,
}

impl SqliteIssueRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IssueRepository for SqliteIssueRepo {
    async fn create(&self, issue: &Issue) -> Result<Issue, AppError> {
        sqlx::query_as::<_, Issue>(
            "INSERT INTO issues (id, reported_by, room_id, title, description, category, priority, status, assigned_to, resolution_notes, reported_date, resolved_date)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&issue.id).bind(&issue.reported_by).bind(&issue.room_id).bind(&issue.title)
            .bind(&issue.description).bind(issue.category).bind(issue.priority).bind(issue.status)
            .bind(&issue.assigned_to).bind(&issue.resolution_notes)
            .bind(issue.reported_date).bind(issue.resolved_date)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Issue>, AppError> {
        sqlx::query_as::<_, Issue>("SELECT * FROM issues WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(
        &self,
        reporter: Option<&str>,
        status: Option<IssueStatus>,
        priority: Option<IssuePriority>,
    ) -> Result<Vec<Issue>, AppError> {
        let mut sql = String::from("SELECT * FROM issues WHERE 1 = 1");
        if reporter.is_some() {
            sql.push_str(" AND reported_by = ?");
        }
        if status.is_some() {
            sql.push_str(" AND status = ?");
        }
        if priority.is_some() {
            sql.push_str(" AND priority = ?");
        }
        sql.push_str(" ORDER BY reported_date DESC");

        let mut query = sqlx::query_as::<_, Issue>(&sql);
        if let Some(r) = reporter {
            query = query.bind(r.to_string());
        }
        if let Some(s) = status {
            query = query.bind(s);
        }
        if let Some(p) = priority {
            query = query.bind(p);
        }

        query.fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, issue: &Issue) -> Result<Issue, AppError> {
        sqlx::query_as::<_, Issue>(
            "UPDATE issues SET status = ?, assigned_to = ?, resolution_notes = ?, resolved_date = ?
             WHERE id = ?
             RETURNING *"
        )
            .bind(issue.status).bind(&issue.assigned_to).bind(&issue.resolution_notes)
            .bind(issue.resolved_date).bind(&issue.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn count_unresolved(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM issues WHERE status IN ('open', 'in_progress')").fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }

    async fn count_unresolved_urgent(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM issues WHERE priority = 'urgent' AND status IN ('open', 'in_progress')").fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }
}
