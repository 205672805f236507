use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::status::{self, Action};
use crate::models::{Booking, TransitionError};

fn load(conn: &Connection, id: i64) -> Result<Booking, AppError> {
    queries::get_booking(conn, id)?.ok_or_else(|| AppError::NotFound(format!("booking {id}")))
}

fn transition(
    conn: &Connection,
    id: i64,
    action: Action,
    apply: fn(&Booking) -> Result<Booking, TransitionError>,
) -> Result<Booking, AppError> {
    let booking = load(conn, id)?;

    let updated = apply(&booking).map_err(|e| {
        tracing::warn!(booking_id = id, error = %e, "status transition refused");
        e
    })?;

    queries::update_booking_status(conn, id, updated.status, updated.paid)?;
    tracing::info!(
        booking_id = id,
        action = %action,
        from = %booking.status,
        to = %updated.status,
        "booking status changed"
    );
    Ok(updated)
}

pub fn check_in(conn: &Connection, id: i64) -> Result<Booking, AppError> {
    transition(conn, id, Action::CheckIn, status::apply_check_in)
}

pub fn check_out(conn: &Connection, id: i64) -> Result<Booking, AppError> {
    transition(conn, id, Action::CheckOut, status::apply_check_out)
}

pub fn cancel(conn: &Connection, id: i64) -> Result<Booking, AppError> {
    let booking = load(conn, id)?;
    let updated = status::apply_cancel(&booking);
    queries::update_booking_status(conn, id, updated.status, updated.paid)?;
    tracing::info!(booking_id = id, from = %booking.status, "booking cancelled");
    Ok(updated)
}

pub fn delete(conn: &Connection, id: i64) -> Result<(), AppError> {
    if !queries::delete_booking(conn, id)? {
        return Err(AppError::NotFound(format!("booking {id}")));
    }
    tracing::info!(booking_id = id, "booking deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{BookingStatus, CabinInput, GuestInput};
    use chrono::{NaiveDate, Utc};

    fn setup_with_booking(status: BookingStatus) -> (Connection, i64) {
        let conn = db::init_db(":memory:").unwrap();
        let cabin = queries::create_cabin(
            &conn,
            &CabinInput {
                name: "004".to_string(),
                max_capacity: 4,
                regular_price: 300.0,
                discount: 0.0,
                description: "Forest cabin".to_string(),
                image: None,
            },
        )
        .unwrap();
        let guest = queries::create_guest(
            &conn,
            &GuestInput {
                full_name: "Lena Berg".to_string(),
                email: "lena@example.se".to_string(),
                national_id: Some("SE-1234".to_string()),
                nationality: Some("Sweden".to_string()),
                country_flag: None,
            },
        )
        .unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let id = queries::create_booking(
            &conn,
            &Booking {
                id: 0,
                cabin_id: cabin.id,
                guest_id: guest.id,
                start_date: start,
                end_date: start + chrono::Duration::days(4),
                num_nights: 4,
                num_guests: 2,
                cabin_price: 1200.0,
                extra_price: 0.0,
                total_price: 1200.0,
                has_breakfast: false,
                status,
                paid: false,
                observation: None,
                created_at: Utc::now().naive_utc(),
            },
        )
        .unwrap();
        (conn, id)
    }

    #[test]
    fn test_check_in_persists_status_and_payment() {
        let (conn, id) = setup_with_booking(BookingStatus::Unconfirmed);
        let booking = check_in(&conn, id).unwrap();
        assert_eq!(booking.status, BookingStatus::CheckedIn);
        assert!(booking.paid);

        let stored = queries::get_booking(&conn, id).unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::CheckedIn);
        assert!(stored.paid);
    }

    #[test]
    fn test_refused_transition_does_not_touch_storage() {
        let (conn, id) = setup_with_booking(BookingStatus::Cancelled);
        let err = check_in(&conn, id).unwrap_err();
        assert!(matches!(err, AppError::Transition(_)));
        let err = check_out(&conn, id).unwrap_err();
        assert!(matches!(err, AppError::Transition(_)));

        let stored = queries::get_booking(&conn, id).unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Cancelled);
        assert!(!stored.paid);
    }

    #[test]
    fn test_full_stay_persisted() {
        let (conn, id) = setup_with_booking(BookingStatus::Pending);
        check_in(&conn, id).unwrap();
        let out = check_out(&conn, id).unwrap();
        assert_eq!(out.status, BookingStatus::CheckedOut);
        assert!(matches!(check_in(&conn, id), Err(AppError::Transition(_))));
    }

    #[test]
    fn test_cancel_then_delete() {
        let (conn, id) = setup_with_booking(BookingStatus::Confirmed);
        let cancelled = cancel(&conn, id).unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        delete(&conn, id).unwrap();
        assert!(queries::get_booking(&conn, id).unwrap().is_none());
        assert!(matches!(delete(&conn, id), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_missing_booking() {
        let conn = db::init_db(":memory:").unwrap();
        assert!(matches!(check_in(&conn, 42), Err(AppError::NotFound(_))));
        assert!(matches!(check_out(&conn, 42), Err(AppError::NotFound(_))));
        assert!(matches!(cancel(&conn, 42), Err(AppError::NotFound(_))));
    }
}
