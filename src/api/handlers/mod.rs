pub mod admin_booking;
pub mod admin_user;
pub mod auth;
pub mod cabin;
pub mod health;
pub mod password_reset;
pub mod profile;
pub mod slot;
pub mod therapist_booking;
