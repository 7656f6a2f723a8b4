use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, json::ApiJson};
use crate::api::dtos::requests::UpdateRolesRequest;
use crate::api::dtos::responses::UserDetailResponse;
use crate::domain::services::access;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    access::require_admin(&user)?;
    let users = state.user_repo.list().await?;
    Ok(Json(users.iter().map(UserDetailResponse::from).collect::<Vec<_>>()))
}

/// Role flags are independent; omitted flags keep their current value.
pub async fn update_roles(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(user_id): Path<String>,
    ApiJson(payload): ApiJson<UpdateRolesRequest>,
) -> Result<impl IntoResponse, AppError> {
    access::require_admin(&user)?;

    let target = state.user_repo.find_by_id(&user_id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    let is_therapist = payload.is_therapist.unwrap_or(target.is_therapist);
    let is_admin = payload.is_admin.unwrap_or(target.is_admin);

    let updated = state.user_repo.update_roles(&target.id, is_therapist, is_admin).await?;
    info!(
        "Roles of user {} set by {}: is_therapist={}, is_admin={}",
        updated.id, user.id, updated.is_therapist, updated.is_admin
    );

    Ok(Json(UserDetailResponse::from(&updated)))
}
