use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum IssueStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl IssueStatus {
    fn rank(self) -> u8 {
        match self {
            IssueStatus::Open => 0,
            IssueStatus::InProgress => 1,
            IssueStatus::Resolved => 2,
            IssueStatus::Closed => 3,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, IssueStatus::Resolved | IssueStatus::Closed)
    }

    /// Status advances monotonically toward resolved/closed. The single
    /// backward edge is in_progress -> open (reopen); a resolved or closed
    /// issue never reopens, a new issue is filed instead.
    pub fn can_transition_to(self, next: IssueStatus) -> bool {
        if self == IssueStatus::InProgress && next == IssueStatus::Open {
            return true;
        }
        next.rank() >= self.rank()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum IssuePriority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum IssueCategory {
    Maintenance,
    Cleaning,
    Electrical,
    Plumbing,
    Security,
    Noise,
    Other,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Issue {
    pub id: String,
    pub reported_by: String,
    pub room_id: String,
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    pub priority: IssuePriority,
    pub status: IssueStatus,
    pub assigned_to: Option<String>,
    pub resolution_notes: Option<String>,
    pub reported_date: DateTime<Utc>,
    pub resolved_date: Option<DateTime<Utc>>,
}

pub struct NewIssueParams {
    pub reported_by: String,
    pub room_id: String,
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    pub priority: IssuePriority,
}

impl Issue {
    pub fn new(params: NewIssueParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            reported_by: params.reported_by,
            room_id: params.room_id,
            title: params.title,
            description: params.description,
            category: params.category,
            priority: params.priority,
            status: IssueStatus::Open,
            assigned_to: None,
            resolution_notes: None,
            reported_date: Utc::now(),
            resolved_date: None,
        }
    }

    /// Moves the issue status, stamping `resolved_date` exactly once on
    /// first entry into a terminal status. Later edits while still
    /// terminal keep the original stamp.
    pub fn transition(&mut self, next: IssueStatus, now: DateTime<Utc>) -> Result<(), AppError> {
        if !self.status.can_transition_to(next) {
            return Err(AppError::Validation(format!(
                "Invalid issue status transition: {:?} -> {:?}",
                self.status, next
            )));
        }

        if next.is_terminal() && self.resolved_date.is_none() {
            self.resolved_date = Some(now);
        }

        self.status = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue() -> Issue {
        Issue::new(NewIssueParams {
            reported_by: "student-1".into(),
            room_id: "room-1".into(),
            title: "Leaking tap".into(),
            description: "Bathroom tap drips".into(),
            category: IssueCategory::Plumbing,
            priority: IssuePriority::Medium,
        })
    }

    #[test]
    fn forward_chain_and_reopen() {
        let mut i = issue();
        let now = Utc::now();
        i.transition(IssueStatus::InProgress, now).unwrap();
        i.transition(IssueStatus::Open, now).unwrap();
        i.transition(IssueStatus::Resolved, now).unwrap();
        i.transition(IssueStatus::Closed, now).unwrap();
        assert_eq!(i.status, IssueStatus::Closed);
    }

    #[test]
    fn terminal_states_never_reopen() {
        let mut i = issue();
        let now = Utc::now();
        i.transition(IssueStatus::Resolved, now).unwrap();
        assert!(i.transition(IssueStatus::Open, now).is_err());
        assert!(i.transition(IssueStatus::InProgress, now).is_err());

        i.transition(IssueStatus::Closed, now).unwrap();
        assert!(i.transition(IssueStatus::Open, now).is_err());
    }

    #[test]
    fn resolved_date_stamped_once() {
        let mut i = issue();
        let first = Utc::now();
        i.transition(IssueStatus::Resolved, first).unwrap();
        assert_eq!(i.resolved_date, Some(first));

        let later = first + chrono::Duration::hours(1);
        i.transition(IssueStatus::Closed, later).unwrap();
        assert_eq!(i.resolved_date, Some(first));
    }

    #[test]
    fn same_state_update_is_allowed() {
        let mut i = issue();
        let now = Utc::now();
        i.transition(IssueStatus::Open, now).unwrap();
        assert_eq!(i.resolved_date, None);
    }
}
