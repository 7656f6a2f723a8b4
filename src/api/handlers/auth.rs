use axum::{extract::State, response::IntoResponse, Json, http::StatusCode};
use crate::api::extractors::json::ApiJson;
use crate::state::AppState;
use crate::error::{AppError, FieldErrors};
use crate::api::dtos::requests::{LoginRequest, RefreshRequest, RegisterTherapistRequest};
use crate::api::dtos::responses::{LoginResponse, TokenResponse, UserDetailResponse};
use crate::domain::models::user::{NewUserParams, User};
use crate::domain::services::auth_service::{hash_password, verify_password};
use crate::domain::services::validation;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn register_therapist(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<RegisterTherapistRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut errors = FieldErrors::new();
    validation::require(&mut errors, "username", payload.username.as_deref());
    validation::require(&mut errors, "email", payload.email.as_deref());
    validation::require(&mut errors, "password", payload.password.as_deref());
    validation::require(&mut errors, "password2", payload.password2.as_deref());
    validation::require(&mut errors, "first_name", payload.first_name.as_deref());
    validation::require(&mut errors, "last_name", payload.last_name.as_deref());
    validation::require(&mut errors, "phone_number", payload.phone_number.as_deref());

    let username = payload.username.as_deref().unwrap_or_default().trim();
    let email = payload.email.as_deref().unwrap_or_default().trim();
    let password = payload.password.as_deref().unwrap_or_default();

    if !password.is_empty() {
        if payload.password2.as_deref().is_some_and(|p| !p.is_empty() && p != password) {
            errors.add("password", "Password fields didn't match.");
        }
        validation::check_password_strength(&mut errors, "password", password);
    }

    if !email.is_empty() {
        validation::check_email(&mut errors, "email", email);
        if !errors.contains("email") && state.user_repo.find_by_email(email).await?.is_some() {
            errors.add("email", "A user with that email already exists.");
        }
    }

    if !username.is_empty() && state.user_repo.find_by_username(username).await?.is_some() {
        errors.add("username", "A user with that username already exists.");
    }

    errors.into_result()?;

    let user = User::new_therapist(NewUserParams {
        username: username.to_string(),
        email: email.to_string(),
        first_name: payload.first_name.unwrap_or_default().trim().to_string(),
        last_name: payload.last_name.unwrap_or_default().trim().to_string(),
        phone_number: payload.phone_number.unwrap_or_default().trim().to_string(),
        password_hash: hash_password(password)?,
    });

    let created = state.user_repo.create(&user).await?;
    info!("Therapist registered: {} ({})", created.username, created.id);

    state.notifier.welcome(&created);

    Ok((StatusCode::CREATED, Json(UserDetailResponse::from(&created))))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_username(&payload.username).await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!("Failed login attempt for user {}", user.id);
        return Err(AppError::Unauthorized);
    }

    let pair = state.auth_service.login(&user).await?;

    info!("User logged in: {}", user.id);

    Ok(Json(LoginResponse {
        access: pair.access,
        refresh: pair.refresh,
        user_id: user.id,
        username: user.username,
        is_therapist: user.is_therapist,
        is_admin: user.is_admin,
    }))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<RefreshRequest>,
) -> Result<impl IntoResponse, AppError> {
    let owner_id = state.auth_service.refresh_token_owner(&payload.refresh).await?;

    let user = state.user_repo.find_by_id(&owner_id).await?
        .ok_or(AppError::Unauthorized)?;

    let pair = state.auth_service.refresh(&payload.refresh, &user).await?;

    info!("Token refreshed for user: {}", user.id);

    Ok(Json(TokenResponse {
        access: pair.access,
        refresh: pair.refresh,
    }))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<RefreshRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.auth_service.logout(&payload.refresh).await?;

    info!("User logged out");

    Ok(StatusCode::OK)
}
