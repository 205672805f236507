use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::check_auth;
use crate::models::{Guest, GuestInput};
use crate::state::AppState;

// GET /api/guests
pub async fn list_guests(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Guest>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let db = state.conn()?;
    Ok(Json(queries::list_guests(&db)?))
}

// POST /api/guests
pub async fn create_guest(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<GuestInput>,
) -> Result<(StatusCode, Json<Guest>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    body.validate()?;

    let guest = {
        let db = state.conn()?;
        queries::create_guest(&db, &body)?
    };
    tracing::info!(guest_id = guest.id, "guest created");

    Ok((StatusCode::CREATED, Json(guest)))
}
