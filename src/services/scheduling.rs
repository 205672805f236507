use chrono::{NaiveDate, Utc};
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, Cabin, NewBooking, Settings, StayPrice};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum SchedulingError {
    #[error("check-out date must be after check-in date")]
    InvalidDates,

    #[error("stay of {nights} nights is shorter than the minimum of {min}")]
    TooShort { nights: i64, min: i64 },

    #[error("stay of {nights} nights is longer than the maximum of {max}")]
    TooLong { nights: i64, max: i64 },

    #[error("a booking needs at least one guest")]
    NoGuests,

    #[error("{guests} guests exceeds the limit of {max} per booking")]
    TooManyGuests { guests: i64, max: i64 },

    #[error("{guests} guests exceeds the cabin capacity of {capacity}")]
    OverCapacity { guests: i64, capacity: i64 },

    #[error("cabin is already booked for those dates (booking {booking_id})")]
    Conflict { booking_id: i64 },
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::Conflict { .. } => AppError::Conflict(err.to_string()),
            other => AppError::Validation(other.to_string()),
        }
    }
}

/// Checks a requested stay against the hotel rules and the cabin's existing
/// bookings. Returns the number of nights.
pub fn validate_stay(
    conn: &Connection,
    settings: &Settings,
    cabin: &Cabin,
    start: NaiveDate,
    end: NaiveDate,
    num_guests: i64,
) -> Result<i64, AppError> {
    if end <= start {
        return Err(SchedulingError::InvalidDates.into());
    }
    let nights = (end - start).num_days();
    if nights < settings.min_booking_length {
        return Err(SchedulingError::TooShort {
            nights,
            min: settings.min_booking_length,
        }
        .into());
    }
    if nights > settings.max_booking_length {
        return Err(SchedulingError::TooLong {
            nights,
            max: settings.max_booking_length,
        }
        .into());
    }
    if num_guests < 1 {
        return Err(SchedulingError::NoGuests.into());
    }
    if num_guests > settings.max_guests_per_booking {
        return Err(SchedulingError::TooManyGuests {
            guests: num_guests,
            max: settings.max_guests_per_booking,
        }
        .into());
    }
    if num_guests > cabin.max_capacity {
        return Err(SchedulingError::OverCapacity {
            guests: num_guests,
            capacity: cabin.max_capacity,
        }
        .into());
    }

    if let Some(booking_id) = queries::find_overlapping_booking(conn, cabin.id, start, end)? {
        return Err(SchedulingError::Conflict { booking_id }.into());
    }

    Ok(nights)
}

/// Validates and stores a new booking.
pub fn create_booking(conn: &Connection, request: &NewBooking) -> Result<Booking, AppError> {
    let status = match request.status.as_deref() {
        None => BookingStatus::Unconfirmed,
        Some(raw) => BookingStatus::parse(raw)
            .filter(|s| s.is_initial())
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "new bookings must be unconfirmed or pending, got {raw:?}"
                ))
            })?,
    };

    let cabin = queries::get_cabin(conn, request.cabin_id)?
        .ok_or_else(|| AppError::NotFound(format!("cabin {}", request.cabin_id)))?;
    if queries::get_guest(conn, request.guest_id)?.is_none() {
        return Err(AppError::NotFound(format!("guest {}", request.guest_id)));
    }
    let settings = queries::get_settings(conn)?;

    let nights = validate_stay(
        conn,
        &settings,
        &cabin,
        request.start_date,
        request.end_date,
        request.num_guests,
    )?;
    let price = StayPrice::compute(
        &cabin,
        nights,
        request.num_guests,
        request.has_breakfast,
        settings.breakfast_price,
    );

    let mut booking = Booking {
        id: 0,
        cabin_id: cabin.id,
        guest_id: request.guest_id,
        start_date: request.start_date,
        end_date: request.end_date,
        num_nights: price.num_nights,
        num_guests: request.num_guests,
        cabin_price: price.cabin_price,
        extra_price: price.extra_price,
        total_price: price.total_price,
        has_breakfast: request.has_breakfast,
        status,
        paid: false,
        observation: request
            .observation
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        created_at: Utc::now().naive_utc(),
    };
    booking.id = queries::create_booking(conn, &booking)?;

    tracing::info!(
        booking_id = booking.id,
        cabin_id = booking.cabin_id,
        nights = booking.num_nights,
        status = %booking.status,
        "booking created"
    );

    Ok(booking)
}
