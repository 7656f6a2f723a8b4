use axum::{extract::{State, Path, Query}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, json::ApiJson};
use crate::api::dtos::requests::{AdminSlotQuery, CreateSlotRequest};
use crate::api::dtos::responses::{booking_list, BookingResponse};
use crate::domain::services::slot_service::{NewSlot, SlotAudience};
use crate::error::AppError;
use std::sync::Arc;

pub async fn create_slot(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiJson(payload): ApiJson<CreateSlotRequest>,
) -> Result<impl IntoResponse, AppError> {
    let created = state.slot_service.create_slot(&user, NewSlot {
        cabin_id: payload.cabin,
        start_time: payload.start_time,
        end_time: payload.end_time,
        price: payload.price,
    }).await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(created))))
}

pub async fn list_available_slots(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<AdminSlotQuery>,
) -> Result<impl IntoResponse, AppError> {
    let slots = state.slot_service
        .list_open_slots(&user, SlotAudience::Admin, query.into_filter())
        .await?;
    Ok(Json(booking_list(slots)))
}

pub async fn delete_slot(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(slot_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.slot_service.delete_open_slot(&user, &slot_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
