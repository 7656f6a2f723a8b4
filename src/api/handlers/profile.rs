use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, json::ApiJson};
use crate::api::dtos::requests::UpdateProfileRequest;
use crate::api::dtos::responses::UserDetailResponse;
use crate::domain::services::{access, validation};
use crate::error::{AppError, FieldErrors};
use std::sync::Arc;
use tracing::info;

pub async fn get_profile(
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    access::require_therapist(&user)?;
    Ok(Json(UserDetailResponse::from(&user)))
}

/// Partial update; absent fields keep their value.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiJson(payload): ApiJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    access::require_therapist(&user)?;

    let mut updated = user.clone();
    let mut errors = FieldErrors::new();

    if let Some(email) = payload.email.as_deref().map(str::trim) {
        validation::check_email(&mut errors, "email", email);
        if !errors.contains("email") && email != user.email {
            if let Some(holder) = state.user_repo.find_by_email(email).await?
                && holder.id != user.id
            {
                errors.add("email", "This email address is already in use by another account.");
            }
        }
        updated.email = email.to_string();
    }
    if let Some(first_name) = payload.first_name {
        updated.first_name = first_name.trim().to_string();
    }
    if let Some(last_name) = payload.last_name {
        updated.last_name = last_name.trim().to_string();
    }
    if let Some(phone_number) = payload.phone_number {
        updated.phone_number = phone_number.trim().to_string();
    }

    errors.into_result()?;

    let saved = state.user_repo.update_profile(&updated).await?;
    info!("Profile updated for user {}", saved.id);

    Ok(Json(UserDetailResponse::from(&saved)))
}
