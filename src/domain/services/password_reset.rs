use std::sync::Arc;
use std::time::Duration;

use rand::{distributions::Alphanumeric, Rng};
use serde_json::json;
use tracing::{error, info};

use crate::domain::ports::{ResetTokenStore, UserRepository};
use crate::domain::services::{auth_service::hash_password, notifier::{Notifier, PASSWORD_RESET}, validation};
use crate::error::{AppError, FieldErrors};

const KEY_PREFIX: &str = "password_reset_";
const TOKEN_LENGTH: usize = 32;

pub fn cache_key(token: &str) -> String {
    format!("{}{}", KEY_PREFIX, token)
}

pub struct PasswordResetService {
    users: Arc<dyn UserRepository>,
    store: Arc<dyn ResetTokenStore>,
    notifier: Arc<Notifier>,
    frontend_url: String,
    ttl: Duration,
}

impl PasswordResetService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        store: Arc<dyn ResetTokenStore>,
        notifier: Arc<Notifier>,
        frontend_url: String,
        ttl: Duration,
    ) -> Self {
        Self { users, store, notifier, frontend_url, ttl }
    }

    /// Issues a single-use token for the account holding `email` and mails it.
    /// Unlike transition notices, a failed send is surfaced to the caller.
    pub async fn request(&self, email: Option<&str>) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();
        validation::require(&mut errors, "email", email);
        let email = email.unwrap_or_default().trim();
        if !email.is_empty() {
            validation::check_email(&mut errors, "email", email);
        }
        errors.into_result()?;

        let user = self.users.find_by_email(email).await?
            .ok_or_else(|| AppError::FieldValidation(FieldErrors::single(
                "email",
                "User with this email does not exist.",
            )))?;

        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect();

        self.store.put(&cache_key(&token), &user.id, self.ttl).await?;

        let reset_url = format!("{}/password-reset-confirm?token={}", self.frontend_url.trim_end_matches('/'), token);
        let context = json!({ "username": user.username, "token": token, "reset_url": reset_url });

        self.notifier
            .send_now(&user.email, "Password Reset Request", PASSWORD_RESET, &context)
            .await
            .map_err(|e| {
                error!("Error sending password reset email to {}: {}", user.email, e);
                AppError::InternalWithMsg("There was an issue sending the password reset email.".into())
            })?;

        info!("Password reset token issued for user {}", user.id);
        Ok(())
    }

    /// Consumes a token and sets the new password. Input validation runs before
    /// the token is looked at, so a rejected attempt leaves the token usable.
    pub async fn confirm(
        &self,
        token: Option<&str>,
        new_password: Option<&str>,
        confirm_new_password: Option<&str>,
    ) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();
        validation::require(&mut errors, "token", token);
        validation::require(&mut errors, "new_password", new_password);
        validation::require(&mut errors, "confirm_new_password", confirm_new_password);
        errors.into_result()?;

        let token = token.unwrap_or_default();
        let new_password = new_password.unwrap_or_default();

        let mut errors = FieldErrors::new();
        validation::check_password_strength(&mut errors, "new_password", new_password);
        if Some(new_password) != confirm_new_password {
            errors.add("new_password", "Password fields didn't match.");
        }
        errors.into_result()?;

        let key = cache_key(token);
        let user_id = self.store.get(&key).await?
            .ok_or_else(|| AppError::Validation("Invalid or expired token.".into()))?;

        let user = self.users.find_by_id(&user_id).await?
            .ok_or_else(|| AppError::Validation("User not found.".into()))?;

        let password_hash = hash_password(new_password)?;
        self.users.set_password(&user.id, &password_hash).await?;
        self.store.remove(&key).await?;

        info!("Password reset completed for user {}", user.id);
        Ok(())
    }
}
