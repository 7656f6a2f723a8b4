pub mod access;
pub mod auth_service;
pub mod notifier;
pub mod password_reset;
pub mod slot_service;
pub mod validation;
