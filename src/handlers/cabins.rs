use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::check_auth;
use crate::models::{Cabin, CabinInput};
use crate::services::inventory::{arrange_cabins, CabinSort, DiscountFilter};
use crate::state::AppState;

// GET /api/cabins
#[derive(Deserialize)]
pub struct CabinsQuery {
    pub discount: Option<String>,
    pub sort_by: Option<String>,
}

pub async fn list_cabins(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<CabinsQuery>,
) -> Result<Json<Vec<Cabin>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let filter = match query.discount.as_deref() {
        None | Some("") => DiscountFilter::default(),
        Some(s) => DiscountFilter::parse(s)
            .ok_or_else(|| AppError::Validation(format!("unknown discount filter: {s}")))?,
    };
    let sort = match query.sort_by.as_deref() {
        None | Some("") => CabinSort::default(),
        Some(s) => CabinSort::parse(s)
            .ok_or_else(|| AppError::Validation(format!("unknown sort: {s}")))?,
    };

    let cabins = {
        let db = state.conn()?;
        queries::list_cabins(&db)?
    };

    Ok(Json(arrange_cabins(cabins, filter, sort)))
}

// POST /api/cabins
pub async fn create_cabin(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CabinInput>,
) -> Result<(StatusCode, Json<Cabin>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    body.validate()?;

    let cabin = {
        let db = state.conn()?;
        queries::create_cabin(&db, &body)?
    };
    tracing::info!(cabin_id = cabin.id, name = %cabin.name, "cabin created");

    Ok((StatusCode::CREATED, Json(cabin)))
}

// PUT /api/cabins/:id
pub async fn update_cabin(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<CabinInput>,
) -> Result<Json<Cabin>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    body.validate()?;

    let cabin = {
        let db = state.conn()?;
        queries::update_cabin(&db, id, &body)?
    }
    .ok_or_else(|| AppError::NotFound(format!("cabin {id}")))?;
    tracing::info!(cabin_id = id, "cabin updated");

    Ok(Json(cabin))
}

// DELETE /api/cabins/:id
pub async fn delete_cabin(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let db = state.conn()?;
    let bookings = queries::count_bookings_for_cabin(&db, id)?;
    if bookings > 0 {
        return Err(AppError::Conflict(format!(
            "cabin {id} still has {bookings} booking(s)"
        )));
    }
    if !queries::delete_cabin(&db, id)? {
        return Err(AppError::NotFound(format!("cabin {id}")));
    }
    tracing::info!(cabin_id = id, "cabin deleted");

    Ok(Json(serde_json::json!({"ok": true})))
}
