use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::check_auth;
use crate::models::Booking;
use crate::services::dashboard::{
    self, MonthlySales, Period, Stats, StatusCount, TodaySummary, WeekdayDuration,
};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

impl PeriodQuery {
    fn period(&self) -> Result<Period, AppError> {
        match self.period.as_deref() {
            None | Some("") => Ok(Period::default()),
            Some(s) => Period::parse(s)
                .ok_or_else(|| AppError::Validation(format!("unknown period: {s}"))),
        }
    }
}

fn load_bookings(state: &AppState) -> Result<Vec<Booking>, AppError> {
    let db = state.conn()?;
    Ok(queries::all_bookings(&db)?)
}

// GET /api/dashboard/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<Stats>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let period = query.period()?;

    let bookings = load_bookings(&state)?;
    let today = Utc::now().date_naive();
    Ok(Json(dashboard::stats(&bookings, period, today)))
}

// GET /api/dashboard/status-breakdown
pub async fn get_status_breakdown(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<StatusCount>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let bookings = load_bookings(&state)?;
    Ok(Json(dashboard::status_breakdown(&bookings)))
}

// GET /api/dashboard/durations
pub async fn get_durations(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<Vec<WeekdayDuration>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let period = query.period()?;

    let bookings = load_bookings(&state)?;
    let today = Utc::now().date_naive();
    Ok(Json(dashboard::durations_by_weekday(&bookings, period, today)))
}

// GET /api/dashboard/sales
#[derive(Deserialize)]
pub struct SalesQuery {
    pub year: Option<i32>,
}

#[derive(Serialize)]
pub struct SalesResponse {
    year: i32,
    months: Vec<MonthlySales>,
}

pub async fn get_sales(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<SalesQuery>,
) -> Result<Json<SalesResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let bookings = load_bookings(&state)?;
    Ok(Json(SalesResponse {
        year,
        months: dashboard::monthly_sales(&bookings, year),
    }))
}

// GET /api/dashboard/today
pub async fn get_today(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<TodaySummary>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let bookings = load_bookings(&state)?;
    Ok(Json(dashboard::today_summary(&bookings, Utc::now().naive_utc())))
}

// GET /api/dashboard/nationalities
#[derive(Serialize)]
pub struct NationalityCount {
    nationality: String,
    guests: i64,
}

pub async fn get_nationalities(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<NationalityCount>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let counts = {
        let db = state.conn()?;
        queries::count_guests_by_nationality(&db)?
    };

    Ok(Json(
        counts
            .into_iter()
            .map(|(nationality, guests)| NationalityCount { nationality, guests })
            .collect(),
    ))
}
