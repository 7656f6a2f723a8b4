pub mod auth;
pub mod booking;
pub mod cabin;
pub mod user;
