use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::check_auth;
use crate::models::{
    BookingDetail, BookingListQuery, BookingSort, BookingStatus, BookingSummary, NewBooking,
    StatusMeta,
};
use crate::services::{lifecycle, scheduling};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

/// Gates and badge data attached to every booking the API returns, so clients
/// never re-derive them from the raw status.
#[derive(Serialize)]
pub struct StatusView {
    status_meta: StatusMeta,
    can_check_in: bool,
    can_check_out: bool,
}

impl From<BookingStatus> for StatusView {
    fn from(status: BookingStatus) -> Self {
        Self {
            status_meta: status.meta(),
            can_check_in: status.allows_check_in(),
            can_check_out: status.allows_check_out(),
        }
    }
}

#[derive(Serialize)]
pub struct BookingRowResponse {
    #[serde(flatten)]
    booking: BookingSummary,
    #[serde(flatten)]
    view: StatusView,
}

#[derive(Serialize)]
pub struct BookingDetailResponse {
    #[serde(flatten)]
    detail: BookingDetail,
    #[serde(flatten)]
    view: StatusView,
}

impl From<BookingDetail> for BookingDetailResponse {
    fn from(detail: BookingDetail) -> Self {
        let view = detail.booking.status.into();
        Self { detail, view }
    }
}

fn load_detail(state: &AppState, id: i64) -> Result<BookingDetailResponse, AppError> {
    let db = state.conn()?;
    let detail = queries::get_booking_detail(&db, id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;
    Ok(detail.into())
}

// GET /api/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl BookingsQuery {
    fn into_list_query(self) -> Result<BookingListQuery, AppError> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) if s.eq_ignore_ascii_case("all") => None,
            Some(s) => Some(
                BookingStatus::parse(s)
                    .ok_or_else(|| AppError::Validation(format!("unknown status filter: {s}")))?,
            ),
        };
        let sort = match self.sort_by.as_deref() {
            None | Some("") => BookingSort::default(),
            Some(s) => BookingSort::parse(s)
                .ok_or_else(|| AppError::Validation(format!("unknown sort: {s}")))?,
        };
        Ok(BookingListQuery {
            status,
            search: self.search,
            sort,
            page: self.page.unwrap_or(1).max(1),
            page_size: self
                .page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        })
    }
}

#[derive(Serialize)]
pub struct BookingsResponse {
    data: Vec<BookingRowResponse>,
    count: i64,
    page: i64,
    page_size: i64,
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<BookingsResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let query = query.into_list_query()?;
    let page = {
        let db = state.conn()?;
        queries::list_bookings(&db, &query)?
    };

    let data = page
        .data
        .into_iter()
        .map(|booking| BookingRowResponse {
            view: booking.status.into(),
            booking,
        })
        .collect();

    Ok(Json(BookingsResponse {
        data,
        count: page.count,
        page: query.page,
        page_size: query.page_size,
    }))
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<BookingDetailResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    Ok(Json(load_detail(&state, id)?))
}

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<NewBooking>,
) -> Result<(StatusCode, Json<BookingDetailResponse>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let id = {
        let db = state.conn()?;
        scheduling::create_booking(&db, &body)?.id
    };

    Ok((StatusCode::CREATED, Json(load_detail(&state, id)?)))
}

// POST /api/bookings/:id/check-in
pub async fn check_in(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<BookingDetailResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    {
        let db = state.conn()?;
        lifecycle::check_in(&db, id)?;
    }

    Ok(Json(load_detail(&state, id)?))
}

// POST /api/bookings/:id/check-out
pub async fn check_out(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<BookingDetailResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    {
        let db = state.conn()?;
        lifecycle::check_out(&db, id)?;
    }

    Ok(Json(load_detail(&state, id)?))
}

// POST /api/bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<BookingDetailResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    {
        let db = state.conn()?;
        lifecycle::cancel(&db, id)?;
    }

    Ok(Json(load_detail(&state, id)?))
}

// DELETE /api/bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let db = state.conn()?;
    lifecycle::delete(&db, id)?;

    Ok(Json(serde_json::json!({"ok": true})))
}
