use axum::{extract::State, response::IntoResponse, Json};
use crate::api::extractors::json::ApiJson;
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::{PasswordResetConfirmRequest, PasswordResetRequest};
use crate::api::dtos::responses::MessageResponse;
use std::sync::Arc;

pub async fn request_reset(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<PasswordResetRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.password_reset.request(payload.email.as_deref()).await?;
    Ok(Json(MessageResponse::new("Password reset instructions have been sent to your email.")))
}

pub async fn confirm_reset(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<PasswordResetConfirmRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.password_reset.confirm(
        payload.token.as_deref(),
        payload.new_password.as_deref(),
        payload.confirm_new_password.as_deref(),
    ).await?;
    Ok(Json(MessageResponse::new("Password has been reset successfully.")))
}
