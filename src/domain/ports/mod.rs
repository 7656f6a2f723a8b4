use crate::domain::models::{
    auth::RefreshTokenRecord,
    booking::{Booking, BookingFilter},
    cabin::Cabin,
    user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::time::Duration;
use uuid::Uuid;

/// Booking row joined with the display names of its cabin and therapist.
#[derive(Debug, FromRow, Clone)]
pub struct BookingDetail {
    #[sqlx(flatten)]
    pub booking: Booking,
    pub cabin_name: String,
    pub therapist_username: Option<String>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
    async fn update_profile(&self, user: &User) -> Result<User, AppError>;
    async fn update_roles(&self, id: &str, is_therapist: bool, is_admin: bool) -> Result<User, AppError>;
    async fn set_password(&self, id: &str, password_hash: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    /// Deletes and returns the token in one statement, so a refresh token is spent at most once.
    async fn take_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_family(&self, family_id: Uuid) -> Result<(), AppError>;
    async fn prune_expired(&self, user_id: &str, now: DateTime<Utc>) -> Result<u64, AppError>;
}

#[async_trait]
pub trait CabinRepository: Send + Sync {
    async fn create(&self, cabin: &Cabin) -> Result<Cabin, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Cabin>, AppError>;
    async fn list(&self) -> Result<Vec<Cabin>, AppError>;
    async fn update(&self, cabin: &Cabin) -> Result<Cabin, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

/// Slot ledger. Every transition is a conditional update guarded by the
/// expected prior state; `None`/`false` means the guard did not match.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn find_open_slot(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn find_detail(&self, id: &str) -> Result<Option<BookingDetail>, AppError>;
    async fn list_details(&self, filter: &BookingFilter) -> Result<Vec<BookingDetail>, AppError>;
    async fn claim(&self, id: &str, therapist_id: &str) -> Result<Option<Booking>, AppError>;
    async fn cancel_by_therapist(&self, id: &str, therapist_id: &str) -> Result<Option<Booking>, AppError>;
    async fn cancel_by_admin(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn delete_open_slot(&self, id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), AppError>;
}

/// Key-value cache with per-entry expiry, used for password-reset tokens.
#[async_trait]
pub trait ResetTokenStore: Send + Sync {
    async fn put(&self, key: &str, user_id: &str, ttl: Duration) -> Result<(), AppError>;
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    async fn remove(&self, key: &str) -> Result<(), AppError>;
}
