use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::AllBookingsQuery;
use crate::api::dtos::responses::{booking_list, BookingResponse};
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_all_bookings(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<AllBookingsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.slot_service.list_all_bookings(&user, query.into_filter()).await?;
    Ok(Json(booking_list(bookings)))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let cancelled = state.slot_service.cancel_as_admin(&user, &booking_id).await?;
    Ok(Json(BookingResponse::from(cancelled)))
}
