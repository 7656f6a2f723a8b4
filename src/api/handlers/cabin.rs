use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, json::ApiJson};
use crate::api::dtos::requests::{CreateCabinRequest, UpdateCabinRequest};
use crate::domain::models::cabin::Cabin;
use crate::domain::services::{access, validation::REQUIRED};
use crate::error::{AppError, FieldErrors};
use std::sync::Arc;
use tracing::info;

const MIN_CAPACITY_MSG: &str = "Ensure this value is greater than or equal to 1.";

pub async fn list_cabins(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    access::require_admin(&user)?;
    let cabins = state.cabin_repo.list().await?;
    Ok(Json(cabins))
}

pub async fn create_cabin(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiJson(payload): ApiJson<CreateCabinRequest>,
) -> Result<impl IntoResponse, AppError> {
    access::require_admin(&user)?;

    let mut errors = FieldErrors::new();
    let name = payload.name.as_deref().unwrap_or_default().trim().to_string();
    if name.is_empty() {
        errors.add("name", REQUIRED);
    }
    let capacity = payload.capacity.unwrap_or(1);
    if capacity < 1 {
        errors.add("capacity", MIN_CAPACITY_MSG);
    }
    errors.into_result()?;

    let cabin = Cabin::new(name, payload.description.unwrap_or_default(), capacity);
    let created = state.cabin_repo.create(&cabin).await?;
    info!("Cabin created: {} ({})", created.name, created.id);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_cabin(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(cabin_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    access::require_admin(&user)?;
    let cabin = state.cabin_repo.find_by_id(&cabin_id).await?
        .ok_or(AppError::NotFound("Cabin not found".into()))?;
    Ok(Json(cabin))
}

pub async fn update_cabin(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(cabin_id): Path<String>,
    ApiJson(payload): ApiJson<UpdateCabinRequest>,
) -> Result<impl IntoResponse, AppError> {
    access::require_admin(&user)?;

    let mut cabin = state.cabin_repo.find_by_id(&cabin_id).await?
        .ok_or(AppError::NotFound("Cabin not found".into()))?;

    let mut errors = FieldErrors::new();
    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            errors.add("name", "This field may not be blank.");
        }
        cabin.name = name;
    }
    if let Some(description) = payload.description {
        cabin.description = description;
    }
    if let Some(capacity) = payload.capacity {
        if capacity < 1 {
            errors.add("capacity", MIN_CAPACITY_MSG);
        }
        cabin.capacity = capacity;
    }
    errors.into_result()?;

    let updated = state.cabin_repo.update(&cabin).await?;
    info!("Cabin updated: {}", updated.id);
    Ok(Json(updated))
}

/// Deleting a cabin removes its slots and bookings with it.
pub async fn delete_cabin(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(cabin_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    access::require_admin(&user)?;
    state.cabin_repo.delete(&cabin_id).await?;
    info!("Cabin deleted: {}", cabin_id);
    Ok(StatusCode::NO_CONTENT)
}
