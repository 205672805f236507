//! HTTP surface of the admin dashboard.
//!
//! - `GET  /health`
//! - `GET|POST /api/cabins`, `PUT|DELETE /api/cabins/:id`
//! - `GET|POST /api/guests`
//! - `GET|POST /api/bookings`, `GET|DELETE /api/bookings/:id`
//! - `POST /api/bookings/:id/{check-in,check-out,cancel}`
//! - `GET|PATCH /api/settings`
//! - `GET /api/dashboard/{stats,status-breakdown,durations,sales,today,nationalities}`
//!
//! Everything under `/api` requires `Authorization: Bearer <ADMIN_TOKEN>`.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(state.config.cors_origin.as_deref());

    Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api/cabins",
            get(handlers::cabins::list_cabins).post(handlers::cabins::create_cabin),
        )
        .route(
            "/api/cabins/:id",
            put(handlers::cabins::update_cabin).delete(handlers::cabins::delete_cabin),
        )
        .route(
            "/api/guests",
            get(handlers::guests::list_guests).post(handlers::guests::create_guest),
        )
        .route(
            "/api/bookings",
            get(handlers::bookings::list_bookings).post(handlers::bookings::create_booking),
        )
        .route(
            "/api/bookings/:id",
            get(handlers::bookings::get_booking).delete(handlers::bookings::delete_booking),
        )
        .route(
            "/api/bookings/:id/check-in",
            post(handlers::bookings::check_in),
        )
        .route(
            "/api/bookings/:id/check-out",
            post(handlers::bookings::check_out),
        )
        .route(
            "/api/bookings/:id/cancel",
            post(handlers::bookings::cancel_booking),
        )
        .route(
            "/api/settings",
            get(handlers::settings::get_settings).patch(handlers::settings::update_settings),
        )
        .route("/api/dashboard/stats", get(handlers::dashboard::get_stats))
        .route(
            "/api/dashboard/status-breakdown",
            get(handlers::dashboard::get_status_breakdown),
        )
        .route(
            "/api/dashboard/durations",
            get(handlers::dashboard::get_durations),
        )
        .route("/api/dashboard/sales", get(handlers::dashboard::get_sales))
        .route("/api/dashboard/today", get(handlers::dashboard::get_today))
        .route(
            "/api/dashboard/nationalities",
            get(handlers::dashboard::get_nationalities),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin.map(HeaderValue::from_str) {
        None => layer.allow_origin(Any),
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(_)) => {
            tracing::warn!("CORS_ORIGIN is not a valid header value, allowing any origin");
            layer.allow_origin(Any)
        }
    }
}
