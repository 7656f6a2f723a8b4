use cabin_booking::{
    api::router::create_router,
    config::Config,
    domain::models::{booking::Booking, cabin::Cabin, user::{NewUserParams, User}},
    domain::ports::EmailService,
    domain::services::auth_service::hash_password,
    error::AppError,
    infra::factory::{assemble_state, Repositories},
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    Router,
};
use std::str::FromStr;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tower::ServiceExt;
use serde_json::Value;

pub const ADMIN_LIST: &str = "ops@example.com";
pub const PASSWORD: &str = "Sup3r-Secret!";

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Records every message instead of delivering it. `fail` makes sends error out.
#[derive(Default)]
pub struct RecordingEmailService {
    pub sent: Mutex<Vec<SentEmail>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl EmailService for RecordingEmailService {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::InternalWithMsg("mail gateway unavailable".into()));
        }
        self.sent.lock().unwrap().push(SentEmail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub email: Arc<RecordingEmailService>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            jwt_secret: "test-secret-please-ignore".to_string(),
            auth_issuer: "test-issuer".to_string(),
            admin_email_list: vec![ADMIN_LIST.to_string()],
            frontend_url: "http://frontend.test".to_string(),
            password_reset_ttl_secs: 3600,
            bootstrap_admin: None,
        };

        let email = Arc::new(RecordingEmailService::default());
        let state = Arc::new(assemble_state(&config, Repositories::sqlite(&pool), email.clone()));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            email,
        }
    }

    pub async fn create_user(&self, username: &str, is_therapist: bool, is_admin: bool) -> User {
        let mut user = User::new_therapist(NewUserParams {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            first_name: username.to_string(),
            last_name: "Tester".to_string(),
            phone_number: "555-0100".to_string(),
            password_hash: hash_password(PASSWORD).unwrap(),
        });
        user.is_therapist = is_therapist;
        user.is_admin = is_admin;
        self.state.user_repo.create(&user).await.unwrap()
    }

    pub async fn create_therapist(&self, username: &str) -> User {
        self.create_user(username, true, false).await
    }

    pub async fn create_admin(&self, username: &str) -> User {
        self.create_user(username, false, true).await
    }

    pub async fn create_cabin(&self, name: &str) -> Cabin {
        let cabin = Cabin::new(name.to_string(), format!("{} description", name), 2);
        self.state.cabin_repo.create(&cabin).await.unwrap()
    }

    pub async fn create_open_slot(&self, cabin_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Booking {
        let slot = Booking::new_available(cabin_id.to_string(), start, end, 5000);
        self.state.booking_repo.create(&slot).await.unwrap()
    }

    /// Logs in through the API and returns the access token.
    pub async fn login(&self, username: &str) -> String {
        let (status, body) = self.request(
            "POST",
            "/auth/login/",
            None,
            Some(serde_json::json!({ "username": username, "password": PASSWORD })),
        ).await;
        assert_eq!(status, StatusCode::OK, "login failed in test helper: {}", body);
        body["access"].as_str().expect("No access token in body").to_string()
    }

    pub async fn request(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Self::builder(method, uri, token);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.dispatch(request).await
    }

    /// Sends `body` verbatim, for payloads that are not valid JSON or lack a content type.
    pub async fn request_raw(&self, method: &str, uri: &str, token: Option<&str>, body: &str, content_type: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Self::builder(method, uri, token);
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        self.dispatch(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    fn builder(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match token {
            Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub fn sent_emails(&self) -> Vec<SentEmail> {
        self.email.sent.lock().unwrap().clone()
    }

    /// Notifications run on detached tasks; poll until `count` have arrived.
    pub async fn wait_for_emails(&self, count: usize) -> Vec<SentEmail> {
        for _ in 0..100 {
            let sent = self.sent_emails();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.sent_emails()
    }

    pub async fn booking_status(&self, booking_id: &str) -> (String, Option<String>) {
        let booking = self.state.booking_repo.find_by_id(booking_id).await.unwrap().unwrap();
        (booking.status, booking.therapist_id)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
