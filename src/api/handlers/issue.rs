use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::dtos::requests::{CreateIssueRequest, IssueListQuery, UpdateIssueRequest};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::issue::{Issue, IssuePriority, NewIssueParams};
use crate::domain::policy::{authorize, Action};
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use tracing::info;

pub async fn create_issue(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<CreateIssueRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&actor, Action::CreateIssue)?;

    if payload.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }

    let room_id = if actor.role.is_staff() {
        let room_id = payload.room_id
            .ok_or(AppError::Validation("room_id is required".into()))?;
        state.room_repo.find_by_id(&room_id).await?
            .ok_or(AppError::NotFound("Room not found".into()))?
            .id
    } else {
        // Students report against the room they actually live in; any
        // client-supplied room_id is ignored.
        state.occupancy_repo.find_active_by_student(&actor.id).await?
            .ok_or(AppError::Forbidden("You must be assigned to a room to report issues".into()))?
            .room_id
    };

    let issue = Issue::new(NewIssueParams {
        reported_by: actor.id.clone(),
        room_id,
        title: payload.title.trim().to_string(),
        description: payload.description,
        category: payload.category,
        priority: payload.priority.unwrap_or(IssuePriority::Medium),
    });
    let created = state.issue_repo.create(&issue).await?;

    info!("Issue {} reported for room {}", created.id, created.room_id);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_issues(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Query(query): Query<IssueListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let owner = if actor.role.is_staff() { None } else { Some(actor.id.as_str()) };
    authorize(&actor, Action::ListIssues { owner })?;

    let issues = state.issue_repo.list(owner, query.status, query.priority).await?;
    Ok(Json(issues))
}

pub async fn get_issue(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(issue_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let issue = state.issue_repo.find_by_id(&issue_id).await?
        .ok_or(AppError::NotFound("Issue not found".into()))?;

    authorize(&actor, Action::ReadIssue { owner: &issue.reported_by })?;

    Ok(Json(issue))
}

pub async fn update_issue(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(issue_id): Path<String>,
    Json(payload): Json<UpdateIssueRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&actor, Action::UpdateIssue)?;

    let mut issue = state.issue_repo.find_by_id(&issue_id).await?
        .ok_or(AppError::NotFound("Issue not found".into()))?;

    issue.transition(payload.status, Utc::now())?;

    if let Some(assignee_id) = payload.assigned_to {
        let assignee = state.user_repo.find_by_id(&assignee_id).await?
            .ok_or(AppError::NotFound("Assignee not found".into()))?;
        if !assignee.role.is_staff() {
            return Err(AppError::Validation("Issues can only be assigned to staff".into()));
        }
        issue.assigned_to = Some(assignee.id);
    }
    if let Some(notes) = payload.resolution_notes {
        issue.resolution_notes = Some(notes);
    }

    let updated = state.issue_repo.update(&issue).await?;

    info!("Issue {} moved to {:?}", updated.id, updated.status);

    Ok(Json(updated))
}
