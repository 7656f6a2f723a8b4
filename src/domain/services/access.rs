//! Role and ownership predicates evaluated against the authenticated caller.
//!
//! Authentication itself is established by the `AuthUser` extractor, so every
//! predicate here receives a live `User` row.

use crate::domain::models::{booking::Booking, user::User};
use crate::error::AppError;

const PERMISSION_DENIED: &str = "You do not have permission to perform this action.";

pub fn is_admin_or_superuser(user: &User) -> bool {
    user.is_admin || user.is_superuser
}

pub fn is_therapist(user: &User) -> bool {
    user.is_therapist
}

/// The caller is the therapist attached to the booking, or an admin.
pub fn is_owner_or_admin(user: &User, booking: &Booking) -> bool {
    booking.is_assigned_to(&user.id) || is_admin_or_superuser(user)
}

pub fn require_admin(user: &User) -> Result<(), AppError> {
    if is_admin_or_superuser(user) {
        Ok(())
    } else {
        Err(AppError::Forbidden(PERMISSION_DENIED.into()))
    }
}

pub fn require_therapist(user: &User) -> Result<(), AppError> {
    if is_therapist(user) {
        Ok(())
    } else {
        Err(AppError::Forbidden(PERMISSION_DENIED.into()))
    }
}

pub fn require_owner_or_admin(user: &User, booking: &Booking) -> Result<(), AppError> {
    if is_owner_or_admin(user, booking) {
        Ok(())
    } else {
        Err(AppError::Forbidden(PERMISSION_DENIED.into()))
    }
}
