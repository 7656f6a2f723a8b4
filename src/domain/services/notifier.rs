//! Best-effort mail notifications for slot transitions and account events.
//!
//! Transition notifications are rendered eagerly and delivered on a detached
//! task, so delivery latency or failure never reaches the caller. The only
//! synchronous path is [`Notifier::send_now`], used by password-reset requests
//! where the caller must learn that the mail could not be sent.

use std::sync::Arc;

use serde_json::{json, Value};
use tera::{Context, Tera};
use tracing::{error, info, info_span, warn, Instrument};

use crate::domain::models::{booking::Booking, cabin::Cabin, user::User};
use crate::domain::ports::EmailService;
use crate::error::AppError;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub const BOOKING_CONFIRMATION: &str = "booking_confirmation.txt";
pub const ADMIN_NEW_BOOKING: &str = "admin_new_booking.txt";
pub const BOOKING_CANCELLATION: &str = "booking_cancellation.txt";
pub const ADMIN_CANCELLATION: &str = "admin_cancellation.txt";
pub const CANCELLED_BY_ADMIN: &str = "cancelled_by_admin.txt";
pub const WELCOME: &str = "welcome.txt";
pub const PASSWORD_RESET: &str = "password_reset.txt";

pub fn build_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        (BOOKING_CONFIRMATION, include_str!("../../templates/booking_confirmation.txt")),
        (ADMIN_NEW_BOOKING, include_str!("../../templates/admin_new_booking.txt")),
        (BOOKING_CANCELLATION, include_str!("../../templates/booking_cancellation.txt")),
        (ADMIN_CANCELLATION, include_str!("../../templates/admin_cancellation.txt")),
        (CANCELLED_BY_ADMIN, include_str!("../../templates/cancelled_by_admin.txt")),
        (WELCOME, include_str!("../../templates/welcome.txt")),
        (PASSWORD_RESET, include_str!("../../templates/password_reset.txt")),
    ])?;
    Ok(tera)
}

/// Drops anything that is not shaped like an address.
pub fn deliverable(recipients: &[String]) -> Vec<String> {
    recipients.iter().filter(|r| r.contains('@')).cloned().collect()
}

pub struct Notifier {
    email: Arc<dyn EmailService>,
    templates: Arc<Tera>,
    admin_recipients: Vec<String>,
}

impl Notifier {
    pub fn new(email: Arc<dyn EmailService>, templates: Arc<Tera>, admin_recipients: Vec<String>) -> Self {
        Self { email, templates, admin_recipients }
    }

    pub fn render(&self, template_name: &str, context_data: &Value) -> Result<String, AppError> {
        let context = Context::from_value(context_data.clone()).map_err(|_| AppError::Internal)?;
        self.templates.render(template_name, &context)
            .map_err(|e| AppError::InternalWithMsg(format!("Template render error ({}): {}", template_name, e)))
    }

    /// Fire-and-forget delivery. Never fails; problems are logged.
    pub fn dispatch(&self, kind: &'static str, recipients: Vec<String>, subject: String, template_name: &str, context_data: Value) {
        if recipients.is_empty() {
            warn!("Notification '{}' has no recipients: {}", kind, subject);
            return;
        }

        let valid = deliverable(&recipients);
        if valid.is_empty() {
            error!("No valid email addresses for notification '{}': {:?}", kind, recipients);
            return;
        }

        let body = match self.render(template_name, &context_data) {
            Ok(body) => body,
            Err(e) => {
                error!("Dropping notification '{}': {}", kind, e);
                return;
            }
        };

        let email = self.email.clone();
        let span = info_span!("notification", kind = kind, recipients = valid.len());

        tokio::spawn(
            async move {
                for recipient in &valid {
                    match email.send(recipient, &subject, &body).await {
                        Ok(()) => info!("Email sent to {} with subject: {}", recipient, subject),
                        Err(e) => error!("Error sending email to {} with subject '{}': {}", recipient, subject, e),
                    }
                }
            }
            .instrument(span),
        );
    }

    /// Synchronous delivery whose failure is reported to the caller.
    pub async fn send_now(&self, recipient: &str, subject: &str, template_name: &str, context_data: &Value) -> Result<(), AppError> {
        if deliverable(&[recipient.to_string()]).is_empty() {
            return Err(AppError::InternalWithMsg(format!("Undeliverable recipient: {}", recipient)));
        }
        let body = self.render(template_name, context_data)?;
        self.email.send(recipient, subject, &body).await?;
        info!("Email sent to {} with subject: {}", recipient, subject);
        Ok(())
    }

    pub fn booking_confirmed(&self, therapist: &User, cabin: &Cabin, booking: &Booking) {
        let context = slot_context(therapist, cabin, booking);
        self.dispatch(
            "booking_confirmation",
            vec![therapist.email.clone()],
            format!("Your Booking Confirmation - {} on {}", cabin.name, booking.start_time.format("%Y-%m-%d")),
            BOOKING_CONFIRMATION,
            context.clone(),
        );
        if !self.admin_recipients.is_empty() {
            self.dispatch(
                "admin_new_booking",
                self.admin_recipients.clone(),
                format!("New Booking Alert: {} by {}", cabin.name, therapist.username),
                ADMIN_NEW_BOOKING,
                context,
            );
        }
    }

    pub fn booking_cancelled_by_therapist(&self, therapist: &User, cabin: &Cabin, booking: &Booking) {
        let context = slot_context(therapist, cabin, booking);
        self.dispatch(
            "booking_cancellation",
            vec![therapist.email.clone()],
            format!("Your Booking Cancellation - {} on {}", cabin.name, booking.start_time.format("%Y-%m-%d")),
            BOOKING_CANCELLATION,
            context.clone(),
        );
        if !self.admin_recipients.is_empty() {
            self.dispatch(
                "admin_cancellation",
                self.admin_recipients.clone(),
                format!("Booking Cancellation Alert: {} by {}", cabin.name, therapist.username),
                ADMIN_CANCELLATION,
                context,
            );
        }
    }

    pub fn booking_cancelled_by_admin(&self, therapist: &User, cabin: &Cabin, booking: &Booking) {
        self.dispatch(
            "cancelled_by_admin",
            vec![therapist.email.clone()],
            format!("Booking Update: Your booking for {} has been cancelled", cabin.name),
            CANCELLED_BY_ADMIN,
            slot_context(therapist, cabin, booking),
        );
    }

    pub fn welcome(&self, user: &User) {
        self.dispatch(
            "welcome",
            vec![user.email.clone()],
            "Welcome to Therapy Booking Platform!".to_string(),
            WELCOME,
            json!({ "name": user.display_name() }),
        );
    }
}

fn slot_context(therapist: &User, cabin: &Cabin, booking: &Booking) -> Value {
    json!({
        "therapist_name": therapist.display_name(),
        "therapist_username": therapist.username,
        "therapist_id": therapist.id,
        "cabin_name": cabin.name,
        "cabin_id": cabin.id,
        "start_time": booking.start_time.format(TIME_FORMAT).to_string(),
        "end_time": booking.end_time.format(TIME_FORMAT).to_string(),
        "price": booking.price().map(|p| p.to_string()).unwrap_or_else(|| "-".to_string()),
        "booking_id": booking.id,
    })
}
