use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{MyBookingsQuery, TherapistSlotQuery};
use crate::api::dtos::responses::{booking_list, BookingResponse};
use crate::domain::services::slot_service::SlotAudience;
use crate::error::AppError;
use chrono::Utc;
use std::sync::Arc;

pub async fn list_available_slots(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<TherapistSlotQuery>,
) -> Result<impl IntoResponse, AppError> {
    let slots = state.slot_service
        .list_open_slots(&user, SlotAudience::Therapist, query.into_filter())
        .await?;
    Ok(Json(booking_list(slots)))
}

pub async fn book_slot(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(slot_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booked = state.slot_service.book(&user, &slot_id).await?;
    Ok(Json(BookingResponse::from(booked)))
}

pub async fn my_bookings(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<MyBookingsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.slot_service
        .list_own_bookings(&user, query.into_filter(Utc::now()))
        .await?;
    Ok(Json(booking_list(bookings)))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let cancelled = state.slot_service.cancel_as_therapist(&user, &booking_id).await?;
    Ok(Json(BookingResponse::from(cancelled)))
}
