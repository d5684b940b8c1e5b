use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::dtos::requests::{LoginRequest, RegisterRequest, ResendVerificationRequest};
use crate::domain::models::auth::{AuthResponse, UserProfile};
use crate::domain::models::user::{NewUserParams, Role, User};
use crate::domain::models::verification::EmailVerification;
use crate::error::AppError;
use crate::state::AppState;
use argon2::{password_hash::{PasswordHasher, SaltString}, Argon2, PasswordHash, PasswordVerifier};
use chrono::Utc;
use rand::rngs::OsRng;
use time::Duration;
use tower_cookies::{cookie::SameSite, Cookie, Cookies};
use tracing::info;

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.username.trim().is_empty() || payload.email.trim().is_empty() {
        return Err(AppError::Validation("Username and email are required".into()));
    }
    if payload.password.len() < 8 {
        return Err(AppError::Validation("Password must be at least 8 characters".into()));
    }
    if state.user_repo.find_by_username(&payload.username).await?.is_some() {
        return Err(AppError::Conflict("Username already exists".into()));
    }
    if state.user_repo.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_password(&payload.password)?;

    // Self-registration always produces an unverified student account.
    let user = User::new(NewUserParams {
        username: payload.username,
        email: payload.email,
        password_hash,
        role: Role::Student,
        phone: payload.phone,
        address: payload.address,
        email_verified: false,
    });
    let created = state.user_repo.create(&user).await?;

    send_verification_email(&state, &created).await?;

    info!("Registered student account: {}", created.id);

    Ok((StatusCode::CREATED, Json(serde_json::json!({
        "id": created.id,
        "username": created.username,
        "message": "Registration successful. Check your email to verify your account."
    }))))
}

pub async fn verify_email(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let verification = state.verification_repo.find_by_token(&token).await?
        .ok_or(AppError::NotFound("Verification token not found".into()))?;

    if !verification.is_valid(Utc::now()) {
        return Err(AppError::Validation("Verification token is expired or already used".into()));
    }

    // User flag first: if the token write then fails, the token stays
    // spendable for a retry instead of being burnt on an unverified account.
    state.user_repo.set_email_verified(&verification.user_id).await?;
    state.verification_repo.mark_verified(&verification.token).await?;

    info!("Email verified for user: {}", verification.user_id);

    Ok(Json(serde_json::json!({ "verified": true })))
}

pub async fn resend_verification(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ResendVerificationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_email(&payload.email).await?
        .ok_or(AppError::NotFound("No account for that email".into()))?;

    if user.email_verified {
        return Err(AppError::Conflict("Email is already verified".into()));
    }

    send_verification_email(&state, &user).await?;

    Ok(Json(serde_json::json!({ "sent": true })))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_username(&payload.username).await?
        .ok_or(AppError::Unauthorized)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal)?;

    Argon2::default().verify_password(payload.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized)?;

    if !user.email_verified {
        return Err(AppError::Forbidden("Email address is not verified".into()));
    }

    let (access_jwt, refresh_token, csrf_token) = state.auth_service.login(&user).await?;

    set_cookies(&cookies, &access_jwt, &refresh_token);

    info!("User logged in: {}", user.id);

    Ok(Json(AuthResponse {
        csrf_token,
        user: UserProfile {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    let refresh_cookie = cookies.get("refresh_token").ok_or(AppError::Unauthorized)?;
    let raw_token = refresh_cookie.value();

    let token_hash = state.auth_service.hash_token(raw_token);
    let record = state.auth_repo.find_refresh_token(&token_hash).await?
        .ok_or(AppError::Unauthorized)?;

    let user = state.user_repo.find_by_id(&record.user_id).await?
        .ok_or(AppError::Unauthorized)?;

    let (new_access, new_refresh, new_csrf) = state.auth_service.refresh(raw_token, &user).await?;

    set_cookies(&cookies, &new_access, &new_refresh);

    info!("Token refreshed for user: {}", user.id);

    Ok(Json(AuthResponse {
        csrf_token: new_csrf,
        user: UserProfile {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    if let Some(cookie) = cookies.get("refresh_token") {
        let _ = state.auth_service.logout(cookie.value()).await;
    }

    cookies.remove(Cookie::build(("access_token", "")).path("/").into());
    cookies.remove(Cookie::build(("refresh_token", "")).path("/").into());

    info!("User logged out");

    Ok(StatusCode::OK)
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal)?
        .to_string())
}

async fn send_verification_email(state: &AppState, user: &User) -> Result<(), AppError> {
    let verification = state.verification_repo
        .create(&EmailVerification::new(user.id.clone()))
        .await?;

    let mut ctx = tera::Context::new();
    ctx.insert("username", &user.username);
    ctx.insert(
        "verification_url",
        &format!("{}/api/v1/auth/verify-email/{}", state.config.public_base_url, verification.token),
    );

    let body = state.templates.render("verification.html", &ctx)
        .map_err(|e| AppError::InternalWithMsg(format!("Template error: {}", e)))?;

    state.email_service.send(&user.email, "Verify your hostel account", &body).await
}

fn set_cookies(cookies: &Cookies, access: &str, refresh: &str) {
    let mut access_c = Cookie::new("access_token", access.to_string());
    access_c.set_http_only(true);
    access_c.set_secure(true);
    access_c.set_same_site(SameSite::Strict);
    access_c.set_path("/");
    access_c.set_max_age(Duration::minutes(15));
    cookies.add(access_c);

    let mut refresh_c = Cookie::new("refresh_token", refresh.to_string());
    refresh_c.set_http_only(true);
    refresh_c.set_secure(true);
    refresh_c.set_same_site(SameSite::Strict);
    refresh_c.set_path("/");
    refresh_c.set_max_age(Duration::days(7));
    cookies.add(refresh_c);
}
