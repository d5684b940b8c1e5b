use axum::{extract::{Query, State}, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::dtos::requests::{CreateUserRequest, UserListQuery};
use crate::api::extractors::auth::AuthUser;
use crate::api::handlers::auth::hash_password;
use crate::domain::models::user::{NewUserParams, User};
use crate::domain::policy::{authorize, Action};
use crate::error::AppError;
use crate::state::AppState;
use tracing::info;

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&actor, Action::ManageUsers)?;

    if state.user_repo.find_by_username(&payload.username).await?.is_some() {
        return Err(AppError::Conflict("Username already exists".into()));
    }
    if state.user_repo.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_password(&payload.password)?;

    // Staff-created accounts skip the verification loop.
    let user = User::new(NewUserParams {
        username: payload.username,
        email: payload.email,
        password_hash,
        role: payload.role,
        phone: payload.phone,
        address: payload.address,
        email_verified: true,
    });
    let created = state.user_repo.create(&user).await?;

    info!("Created {:?} account: {}", created.role, created.id);

    Ok((StatusCode::CREATED, Json(serde_json::json!({
        "id": created.id,
        "username": created.username,
        "email": created.email,
        "role": created.role,
        "created_at": created.created_at
    }))))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Query(query): Query<UserListQuery>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&actor, Action::ManageUsers)?;

    let users = match query.role {
        Some(role) => state.user_repo.list_by_role(role).await?,
        None => state.user_repo.list().await?,
    };
    let safe_users: Vec<_> = users.into_iter().map(|u| serde_json::json!({
        "id": u.id,
        "username": u.username,
        "email": u.email,
        "role": u.role,
        "email_verified": u.email_verified,
        "created_at": u.created_at
    })).collect();

    Ok(Json(safe_users))
}
