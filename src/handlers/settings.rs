use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::check_auth;
use crate::models::{Settings, SettingsPatch};
use crate::state::AppState;

// GET /api/settings
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Settings>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let db = state.conn()?;
    Ok(Json(queries::get_settings(&db)?))
}

// PATCH /api/settings
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<SettingsPatch>,
) -> Result<Json<Settings>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let db = state.conn()?;
    let updated = queries::get_settings(&db)?.merged(&body)?;
    queries::save_settings(&db, &updated)?;
    tracing::info!(?updated, "settings updated");

    Ok(Json(updated))
}
