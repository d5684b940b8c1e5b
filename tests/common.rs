use hostel_backend::{
    api::handlers::auth::hash_password,
    api::router::create_router,
    config::Config,
    domain::models::user::{NewUserParams, Role, User},
    domain::ports::EmailService,
    domain::services::auth_service::AuthService,
    error::AppError,
    infra::factory::load_templates,
    infra::repositories::{
        sqlite_auth_repo::SqliteAuthRepo, sqlite_issue_repo::SqliteIssueRepo,
        sqlite_occupancy_repo::SqliteOccupancyRepo, sqlite_payment_repo::SqlitePaymentRepo,
        sqlite_room_repo::SqliteRoomRepo, sqlite_user_repo::SqliteUserRepo,
        sqlite_verification_repo::SqliteVerificationRepo,
    },
    state::AppState,
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-secret-pw";

#[derive(Clone, Debug)]
pub struct SentMail {
    pub recipient: String,
    pub body: String,
}

/// Captures outgoing mail so tests can pull verification links out of it.
pub struct MockEmailService {
    pub sent: Arc<Mutex<Vec<SentMail>>>,
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(&self, recipient: &str, _subject: &str, html_body: &str) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(SentMail {
            recipient: recipient.to_string(),
            body: html_body.to_string(),
        });
        Ok(())
    }
}

pub struct AuthHeaders {
    pub access_token: String,
    pub csrf_token: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub sent_mail: Arc<Mutex<Vec<SentMail>>>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            public_base_url: "http://localhost:3000".to_string(),
            admin_username: ADMIN_USERNAME.to_string(),
            admin_password: ADMIN_PASSWORD.to_string(),
        };

        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));
        let sent_mail = Arc::new(Mutex::new(Vec::new()));

        let state = Arc::new(AppState {
            config: config.clone(),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            room_repo: Arc::new(SqliteRoomRepo::new(pool.clone())),
            occupancy_repo: Arc::new(SqliteOccupancyRepo::new(pool.clone())),
            payment_repo: Arc::new(SqlitePaymentRepo::new(pool.clone())),
            issue_repo: Arc::new(SqliteIssueRepo::new(pool.clone())),
            verification_repo: Arc::new(SqliteVerificationRepo::new(pool.clone())),
            auth_repo,
            auth_service,
            email_service: Arc::new(MockEmailService { sent: sent_mail.clone() }),
            templates: Arc::new(load_templates()),
        });

        // Same first-boot admin the factory seeds in production.
        let admin = User::new(NewUserParams {
            username: ADMIN_USERNAME.to_string(),
            email: "admin@hostel.local".to_string(),
            password_hash: hash_password(ADMIN_PASSWORD).unwrap(),
            role: Role::Admin,
            phone: None,
            address: None,
            email_verified: true,
        });
        state.user_repo.create(&admin).await.expect("Failed to seed admin");

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            sent_mail,
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> AuthHeaders {
        let payload = serde_json::json!({
            "username": username,
            "password": password
        });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let cookies: Vec<String> = response.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|h| h.to_str().unwrap().to_string())
            .collect();

        let access_token_cookie = cookies.iter()
            .find(|c| c.contains("access_token="))
            .expect("No access_token cookie returned");

        let start = access_token_cookie.find("access_token=").unwrap() + 13;
        let end = access_token_cookie[start..].find(';').unwrap_or(access_token_cookie.len() - start);
        let access_token = access_token_cookie[start..start + end].to_string();

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body_json: Value = serde_json::from_slice(&body_bytes).unwrap();
        let csrf_token = body_json["csrf_token"].as_str().expect("No csrf_token in body").to_string();

        AuthHeaders {
            access_token,
            csrf_token,
        }
    }

    pub async fn login_admin(&self) -> AuthHeaders {
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        auth: Option<&AuthHeaders>,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(auth) = auth {
            builder = builder
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .header("X-CSRF-Token", &auth.csrf_token);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Staff-created, pre-verified student account. Returns the user id.
    pub async fn create_student(&self, auth: &AuthHeaders, username: &str) -> String {
        let response = self.request("POST", "/api/v1/users", Some(auth), Some(serde_json::json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "student-pw-123",
            "role": "student"
        }))).await;

        assert!(response.status().is_success(), "create_student failed: {}", response.status());
        parse_body(response).await["id"].as_str().unwrap().to_string()
    }

    pub async fn create_room(&self, auth: &AuthHeaders, room_number: &str, capacity: i32) -> String {
        let response = self.request("POST", "/api/v1/rooms", Some(auth), Some(serde_json::json!({
            "room_number": room_number,
            "capacity": capacity,
            "monthly_rent": 500.0
        }))).await;

        assert!(response.status().is_success(), "create_room failed: {}", response.status());
        parse_body(response).await["id"].as_str().unwrap().to_string()
    }

    pub async fn assign(
        &self,
        auth: &AuthHeaders,
        student_id: &str,
        room_id: &str,
        bed: &str,
    ) -> axum::response::Response {
        self.request("POST", "/api/v1/occupancies", Some(auth), Some(serde_json::json!({
            "student_id": student_id,
            "room_id": room_id,
            "bed_number": bed,
            "check_in_date": "2024-09-01",
            "emergency_contact_name": "Parent",
            "emergency_contact_phone": "555-0100"
        }))).await
    }
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
