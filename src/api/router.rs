use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{
    admin_booking, admin_user, auth, cabin, health, password_reset, profile, slot, therapist_booking,
};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/auth/register/therapist/", post(auth::register_therapist))
        .route("/auth/login/", post(auth::login))
        .route("/auth/token/refresh/", post(auth::refresh))
        .route("/auth/logout/", post(auth::logout))
        .route("/auth/password-reset/request/", post(password_reset::request_reset))
        .route("/auth/password-reset/confirm/", post(password_reset::confirm_reset))

        // Therapist
        .route("/therapist/profile/", get(profile::get_profile).put(profile::update_profile).patch(profile::update_profile))
        .route("/therapist/slots/available/", get(therapist_booking::list_available_slots))
        .route("/therapist/slots/{id}/book/", post(therapist_booking::book_slot).put(therapist_booking::book_slot))
        .route("/therapist/bookings/mine/", get(therapist_booking::my_bookings))
        .route("/therapist/bookings/{id}/cancel/", post(therapist_booking::cancel_booking).put(therapist_booking::cancel_booking))

        // Admin - Cabins
        .route("/admin/cabins/", get(cabin::list_cabins).post(cabin::create_cabin))
        .route("/admin/cabins/{id}/", get(cabin::get_cabin).put(cabin::update_cabin).patch(cabin::update_cabin).delete(cabin::delete_cabin))

        // Admin - Slots
        .route("/admin/slots/create/", post(slot::create_slot))
        .route("/admin/slots/available/", get(slot::list_available_slots))
        .route("/admin/slots/{id}/delete/", delete(slot::delete_slot))

        // Admin - Bookings
        .route("/admin/bookings/all/", get(admin_booking::list_all_bookings))
        .route("/admin/bookings/{id}/cancel/", post(admin_booking::cancel_booking).put(admin_booking::cancel_booking))

        // Admin - Users
        .route("/admin/users/", get(admin_user::list_users))
        .route("/admin/users/{id}/roles/", put(admin_user::update_roles))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
