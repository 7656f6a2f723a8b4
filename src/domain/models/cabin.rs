use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Cabin {
    pub id: String,
    pub name: String,
    pub description: String,
    pub capacity: i32,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
}

impl Cabin {
    pub fn new(name: String, description: String, capacity: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            capacity,
            created_at: Utc::now(),
        }
    }
}
