//! Slot lifecycle transitions: create, claim, cancel and delete.
//!
//! Each operation checks the caller's role first, then the booking's current
//! state, and finally commits through a conditional update in the repository.
//! A state denial found at lookup is `Forbidden`; a guard that no longer
//! matches at commit time (a concurrent transition won) is `Conflict`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::domain::models::{
    booking::{price_to_cents, Booking, BookingFilter, BookingStatus},
    cabin::Cabin,
    user::User,
};
use crate::domain::ports::{BookingDetail, BookingRepository, CabinRepository, UserRepository};
use crate::domain::services::{access, notifier::Notifier, validation::{self, REQUIRED}};
use crate::error::{AppError, FieldErrors};

pub struct NewSlot {
    pub cabin_id: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub price: Option<Decimal>,
}

/// Which role-scoped read path is listing open slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAudience {
    Admin,
    Therapist,
}

pub struct SlotService {
    bookings: Arc<dyn BookingRepository>,
    cabins: Arc<dyn CabinRepository>,
    users: Arc<dyn UserRepository>,
    notifier: Arc<Notifier>,
}

impl SlotService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        cabins: Arc<dyn CabinRepository>,
        users: Arc<dyn UserRepository>,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self { bookings, cabins, users, notifier }
    }

    pub async fn create_slot(&self, actor: &User, input: NewSlot) -> Result<BookingDetail, AppError> {
        access::require_admin(actor)?;

        let mut errors = FieldErrors::new();
        if input.cabin_id.as_deref().unwrap_or_default().is_empty() {
            errors.add("cabin", REQUIRED);
        }
        if input.start_time.is_none() {
            errors.add("start_time", REQUIRED);
        }
        if input.end_time.is_none() {
            errors.add("end_time", REQUIRED);
        }
        match input.price {
            None => errors.add("price", "This field may not be null."),
            Some(price) => validation::check_price(&mut errors, "price", price),
        }
        errors.into_result()?;

        let (Some(cabin_id), Some(start_time), Some(end_time), Some(price)) =
            (input.cabin_id, input.start_time, input.end_time, input.price)
        else {
            return Err(AppError::Internal);
        };

        if start_time >= end_time {
            return Err(AppError::FieldValidation(FieldErrors::single(
                "non_field_errors",
                "End time must be after start time.",
            )));
        }

        let cabin = self.cabins.find_by_id(&cabin_id).await?.ok_or_else(|| {
            AppError::FieldValidation(FieldErrors::single(
                "cabin",
                format!("Invalid pk \"{}\" - object does not exist.", cabin_id),
            ))
        })?;

        let slot = Booking::new_available(cabin.id, start_time, end_time, price_to_cents(price)?);
        let created = self.bookings.create(&slot).await?;
        info!("Available slot {} created for cabin {}", created.id, created.cabin_id);

        self.detail(&created.id).await
    }

    /// Unassigned, available slots ordered by start time.
    pub async fn list_open_slots(&self, actor: &User, audience: SlotAudience, mut filter: BookingFilter) -> Result<Vec<BookingDetail>, AppError> {
        match audience {
            SlotAudience::Admin => access::require_admin(actor)?,
            SlotAudience::Therapist => access::require_therapist(actor)?,
        }
        filter.open_slots_only = true;
        self.bookings.list_details(&filter).await
    }

    pub async fn list_own_bookings(&self, actor: &User, mut filter: BookingFilter) -> Result<Vec<BookingDetail>, AppError> {
        access::require_therapist(actor)?;
        filter.therapist_id = Some(actor.id.clone());
        self.bookings.list_details(&filter).await
    }

    pub async fn list_all_bookings(&self, actor: &User, filter: BookingFilter) -> Result<Vec<BookingDetail>, AppError> {
        access::require_admin(actor)?;
        self.bookings.list_details(&filter).await
    }

    /// available -> booked
    pub async fn book(&self, actor: &User, booking_id: &str) -> Result<BookingDetail, AppError> {
        access::require_therapist(actor)?;

        let booking = self.find(booking_id).await?;
        if !booking.is_open_slot() {
            return Err(AppError::Forbidden("This slot is not available for booking.".into()));
        }

        let booked = self.bookings.claim(&booking.id, &actor.id).await?
            .ok_or_else(|| {
                warn!("Slot {} was claimed concurrently", booking.id);
                AppError::Conflict("Slot is no longer available.".into())
            })?;
        info!("Slot {} booked by therapist {}", booked.id, actor.id);

        if let Some(cabin) = self.cabin_of(&booked).await {
            self.notifier.booking_confirmed(actor, &cabin, &booked);
        }

        self.detail(&booked.id).await
    }

    /// booked -> cancelled, by the assigned therapist only.
    pub async fn cancel_as_therapist(&self, actor: &User, booking_id: &str) -> Result<BookingDetail, AppError> {
        access::require_therapist(actor)?;

        let booking = self.find(booking_id).await?;
        access::require_owner_or_admin(actor, &booking)?;
        if !booking.is_assigned_to(&actor.id) {
            return Err(AppError::Forbidden("You do not own this booking.".into()));
        }
        if booking.status() != BookingStatus::Booked {
            return Err(AppError::Forbidden(
                "This booking cannot be cancelled (it's not in 'booked' status).".into(),
            ));
        }

        let cancelled = self.bookings.cancel_by_therapist(&booking.id, &actor.id).await?
            .ok_or_else(|| AppError::Conflict("Booking is no longer in a cancellable state.".into()))?;
        info!("Booking {} cancelled by therapist {}", cancelled.id, actor.id);

        if let Some(cabin) = self.cabin_of(&cancelled).await {
            self.notifier.booking_cancelled_by_therapist(actor, &cabin, &cancelled);
        }

        self.detail(&cancelled.id).await
    }

    /// {available, booked} -> cancelled. The therapist reference is kept.
    pub async fn cancel_as_admin(&self, actor: &User, booking_id: &str) -> Result<BookingDetail, AppError> {
        access::require_admin(actor)?;

        let booking = self.find(booking_id).await?;
        let status = booking.status();
        if !status.can_transition_to(BookingStatus::Cancelled) {
            return Err(AppError::Forbidden(format!("This booking is already in '{}' status.", status)));
        }

        let cancelled = self.bookings.cancel_by_admin(&booking.id).await?
            .ok_or_else(|| AppError::Conflict("Booking is no longer in a cancellable state.".into()))?;
        info!("Booking {} cancelled by admin {}", cancelled.id, actor.id);

        if let Some(therapist_id) = cancelled.therapist_id.as_deref() {
            match self.users.find_by_id(therapist_id).await {
                Ok(Some(therapist)) => {
                    if let Some(cabin) = self.cabin_of(&cancelled).await {
                        self.notifier.booking_cancelled_by_admin(&therapist, &cabin, &cancelled);
                    }
                }
                Ok(None) => warn!("Therapist {} of booking {} no longer exists", therapist_id, cancelled.id),
                Err(e) => warn!("Could not load therapist for cancellation notice: {}", e),
            }
        }

        self.detail(&cancelled.id).await
    }

    /// Hard-deletes a slot nobody has claimed. Other rows are out of scope.
    pub async fn delete_open_slot(&self, actor: &User, booking_id: &str) -> Result<(), AppError> {
        access::require_admin(actor)?;

        let slot = self.bookings.find_open_slot(booking_id).await?
            .ok_or_else(|| AppError::NotFound("No available slot matches the given id.".into()))?;

        let not_deletable = || AppError::Validation(
            "This slot is not available or has been assigned, and cannot be deleted via this endpoint.".into(),
        );
        if !slot.is_open_slot() {
            return Err(not_deletable());
        }
        if !self.bookings.delete_open_slot(&slot.id).await? {
            return Err(not_deletable());
        }

        info!("Available slot {} deleted by admin {}", slot.id, actor.id);
        Ok(())
    }

    async fn find(&self, booking_id: &str) -> Result<Booking, AppError> {
        self.bookings.find_by_id(booking_id).await?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))
    }

    async fn detail(&self, booking_id: &str) -> Result<BookingDetail, AppError> {
        self.bookings.find_detail(booking_id).await?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))
    }

    /// Cabin lookup for notifications; a failure here must not fail the transition.
    async fn cabin_of(&self, booking: &Booking) -> Option<Cabin> {
        match self.cabins.find_by_id(&booking.cabin_id).await {
            Ok(cabin) => cabin,
            Err(e) => {
                warn!("Skipping notification for booking {}: {}", booking.id, e);
                None
            }
        }
    }
}
