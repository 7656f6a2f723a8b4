use crate::domain::models::user::User;
use crate::domain::ports::BookingDetail;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Serialize)]
pub struct UserDetailResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub is_therapist: bool,
    pub is_admin: bool,
}

impl From<&User> for UserDetailResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone_number: user.phone_number.clone(),
            is_therapist: user.is_therapist,
            is_admin: user.is_admin,
        }
    }
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user_id: String,
    pub username: String,
    pub is_therapist: bool,
    pub is_admin: bool,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access: String,
    pub refresh: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Booking as seen by clients. `price` serializes as a decimal string.
#[derive(Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub therapist: Option<String>,
    pub therapist_username: Option<String>,
    pub cabin: String,
    pub cabin_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub price: Option<Decimal>,
}

impl From<BookingDetail> for BookingResponse {
    fn from(detail: BookingDetail) -> Self {
        let price = detail.booking.price();
        let booking = detail.booking;
        Self {
            id: booking.id,
            therapist: booking.therapist_id,
            therapist_username: detail.therapist_username,
            cabin: booking.cabin_id,
            cabin_name: detail.cabin_name,
            start_time: booking.start_time,
            end_time: booking.end_time,
            status: booking.status,
            price,
        }
    }
}

pub fn booking_list(details: Vec<BookingDetail>) -> Vec<BookingResponse> {
    details.into_iter().map(BookingResponse::from).collect()
}
