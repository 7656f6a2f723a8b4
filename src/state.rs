use std::sync::Arc;
use crate::domain::ports::{
    AuthRepository, BookingRepository, CabinRepository, EmailService, UserRepository,
};
use crate::domain::services::{
    auth_service::AuthService, notifier::Notifier, password_reset::PasswordResetService,
    slot_service::SlotService,
};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub cabin_repo: Arc<dyn CabinRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub email_service: Arc<dyn EmailService>,
    pub auth_service: Arc<AuthService>,
    pub slot_service: Arc<SlotService>,
    pub password_reset: Arc<PasswordResetService>,
    pub notifier: Arc<Notifier>,
}
