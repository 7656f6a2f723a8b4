use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{AppError, FieldErrors};

/// Lifecycle of a cabin slot. `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Available,
    Booked,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Available => "available",
            BookingStatus::Booked => "booked",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Edges of the slot state machine: available -> booked -> cancelled,
    /// plus the administrative shortcut available -> cancelled.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Available, BookingStatus::Booked)
                | (BookingStatus::Available, BookingStatus::Cancelled)
                | (BookingStatus::Booked, BookingStatus::Cancelled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        *self == BookingStatus::Cancelled
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(BookingStatus::Available),
            "booked" => Ok(BookingStatus::Booked),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(format!("unknown booking status '{}'", other)),
        }
    }
}

/// Ledger row: one time-bounded reservation of a cabin.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub cabin_id: String,
    pub therapist_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub price_cents: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// A fresh unassigned slot. Callers validate `start_time < end_time` first.
    pub fn new_available(cabin_id: String, start_time: DateTime<Utc>, end_time: DateTime<Utc>, price_cents: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            cabin_id,
            therapist_id: None,
            start_time,
            end_time,
            status: BookingStatus::Available.as_str().to_string(),
            price_cents: Some(price_cents),
            created_at: Utc::now(),
        }
    }

    /// Unknown stored values are treated as cancelled so they can never be claimed.
    pub fn status(&self) -> BookingStatus {
        self.status.parse().unwrap_or(BookingStatus::Cancelled)
    }

    pub fn price(&self) -> Option<Decimal> {
        self.price_cents.map(|cents| Decimal::new(cents, 2))
    }

    /// Claimable: available and nobody attached.
    pub fn is_open_slot(&self) -> bool {
        self.status() == BookingStatus::Available && self.therapist_id.is_none()
    }

    pub fn is_assigned_to(&self, user_id: &str) -> bool {
        self.therapist_id.as_deref() == Some(user_id)
    }
}

/// Integer cents for storage. Amounts that do not fit are a `price` field error.
pub fn price_to_cents(price: Decimal) -> Result<i64, AppError> {
    price
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.trunc().to_i64())
        .ok_or_else(|| AppError::FieldValidation(FieldErrors::single("price", "Ensure that there are no more than 10 digits in total.")))
}

/// Optional narrowing applied on top of a listing's base scope.
#[derive(Debug, Default, Clone)]
pub struct BookingFilter {
    pub open_slots_only: bool,
    pub cabin_id: Option<String>,
    pub therapist_id: Option<String>,
    pub status: Option<String>,
    pub start_from: Option<DateTime<Utc>>,
    pub start_before: Option<DateTime<Utc>>,
    pub end_before: Option<DateTime<Utc>>,
}
