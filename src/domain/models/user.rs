use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_therapist: bool,
    pub is_admin: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewUserParams {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub password_hash: String,
}

impl User {
    /// Self-registered account: a therapist with no platform flags.
    pub fn new_therapist(params: NewUserParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: params.username,
            email: params.email,
            first_name: params.first_name,
            last_name: params.last_name,
            phone_number: params.phone_number,
            password_hash: params.password_hash,
            is_therapist: true,
            is_admin: false,
            is_staff: false,
            is_superuser: false,
            created_at: Utc::now(),
        }
    }

    pub fn new_superuser(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            email,
            first_name: String::new(),
            last_name: String::new(),
            phone_number: String::new(),
            password_hash,
            is_therapist: false,
            is_admin: true,
            is_staff: true,
            is_superuser: true,
            created_at: Utc::now(),
        }
    }

    /// Name used to greet the user in notifications.
    pub fn display_name(&self) -> &str {
        if self.first_name.is_empty() { &self.username } else { &self.first_name }
    }
}
