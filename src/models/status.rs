//! Booking status lifecycle.
//!
//! Statuses arrive as free-form strings from storage and HTTP callers. They are
//! case-folded and parsed into [`BookingStatus`] before any gate is evaluated.
//! Every view that needs to know whether a booking can be checked in or out, or
//! how a status should be rendered, goes through this module.
//!
//! ```text
//! unconfirmed ─┐
//! pending ─────┼── check-in ──> checkedin ── check-out ──> checkedout
//! confirmed ───┘
//! (any) ── cancel ──> cancelled
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::Booking;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Unconfirmed,
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl BookingStatus {
    /// Every status, in the order the dashboard legend lists them.
    pub const ALL: [BookingStatus; 6] = [
        BookingStatus::Unconfirmed,
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::CheckedIn,
        BookingStatus::CheckedOut,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Unconfirmed => "unconfirmed",
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::CheckedIn => "checkedin",
            BookingStatus::CheckedOut => "checkedout",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Case-insensitive parse. Returns `None` for anything outside the six
    /// known values.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unconfirmed" => Some(BookingStatus::Unconfirmed),
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "checkedin" => Some(BookingStatus::CheckedIn),
            "checkedout" => Some(BookingStatus::CheckedOut),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    pub fn allows_check_in(self) -> bool {
        !matches!(
            self,
            BookingStatus::CheckedIn | BookingStatus::CheckedOut | BookingStatus::Cancelled
        )
    }

    pub fn allows_check_out(self) -> bool {
        !matches!(self, BookingStatus::CheckedOut | BookingStatus::Cancelled)
    }

    /// Whether a booking may be created directly in this status.
    pub fn is_initial(self) -> bool {
        matches!(self, BookingStatus::Unconfirmed | BookingStatus::Pending)
    }

    pub fn meta(self) -> StatusMeta {
        let (label, color) = match self {
            BookingStatus::Unconfirmed => ("Unconfirmed", ColorCategory::Blue),
            BookingStatus::Pending => ("Pending", ColorCategory::Amber),
            BookingStatus::Confirmed => ("Confirmed", ColorCategory::Green),
            BookingStatus::CheckedIn => ("Checked in", ColorCategory::Slate),
            BookingStatus::CheckedOut => ("Checked out", ColorCategory::Sage),
            BookingStatus::Cancelled => ("Cancelled", ColorCategory::Red),
        };
        StatusMeta::new(label, color)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorCategory {
    Blue,
    Amber,
    Green,
    Slate,
    Sage,
    Red,
    Grey,
}

impl ColorCategory {
    pub fn hex(&self) -> &'static str {
        match self {
            ColorCategory::Blue => "#3b82f6",
            ColorCategory::Amber => "#f59e0b",
            ColorCategory::Green => "#16a34a",
            ColorCategory::Slate => "#2d2727",
            ColorCategory::Sage => "#52a547",
            ColorCategory::Red => "#ef4444",
            ColorCategory::Grey => "#6b7280",
        }
    }
}

/// Badge/legend rendering data for a status.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StatusMeta {
    pub label: &'static str,
    pub color: ColorCategory,
    pub hex: &'static str,
}

impl StatusMeta {
    fn new(label: &'static str, color: ColorCategory) -> Self {
        Self {
            label,
            color,
            hex: color.hex(),
        }
    }

    pub fn unknown() -> Self {
        Self::new("Unknown", ColorCategory::Grey)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CheckIn,
    CheckOut,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::CheckIn => f.write_str("check in"),
            Action::CheckOut => f.write_str("check out"),
        }
    }
}

/// A check-in or check-out was refused. Nothing was modified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot {action} a booking that is {status}")]
pub struct TransitionError {
    pub action: Action,
    pub status: BookingStatus,
}

// The string gates below serve raw statuses from outside the crate. Stored
// rows never reach them: storage parses a row's status on read and rejects an
// unknown one as a read error, so the typed path only sees the six statuses
// and calls `allows_check_in`/`allows_check_out`/`meta` directly. Both paths
// share those methods and cannot disagree.

/// Unknown statuses do not block.
pub fn can_check_in(status: &str) -> bool {
    BookingStatus::parse(status).map_or(true, BookingStatus::allows_check_in)
}

/// Unknown statuses do not block.
pub fn can_check_out(status: &str) -> bool {
    BookingStatus::parse(status).map_or(true, BookingStatus::allows_check_out)
}

pub fn display_meta(status: &str) -> StatusMeta {
    BookingStatus::parse(status).map_or_else(StatusMeta::unknown, BookingStatus::meta)
}

/// Returns the checked-in booking. Check-in always settles payment.
pub fn apply_check_in(booking: &Booking) -> Result<Booking, TransitionError> {
    if !booking.status.allows_check_in() {
        return Err(TransitionError {
            action: Action::CheckIn,
            status: booking.status,
        });
    }
    Ok(Booking {
        status: BookingStatus::CheckedIn,
        paid: true,
        ..booking.clone()
    })
}

/// Returns the checked-out booking. Check-out always settles payment.
pub fn apply_check_out(booking: &Booking) -> Result<Booking, TransitionError> {
    if !booking.status.allows_check_out() {
        return Err(TransitionError {
            action: Action::CheckOut,
            status: booking.status,
        });
    }
    Ok(Booking {
        status: BookingStatus::CheckedOut,
        paid: true,
        ..booking.clone()
    })
}

/// Cancellation is accepted from every status and leaves `paid` alone.
pub fn apply_cancel(booking: &Booking) -> Booking {
    Booking {
        status: BookingStatus::Cancelled,
        ..booking.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn booking(id: i64, status: BookingStatus, paid: bool) -> Booking {
        let start = NaiveDate::from_ymd_opt(2025, 6, 16).unwrap();
        Booking {
            id,
            cabin_id: 1,
            guest_id: 1,
            start_date: start,
            end_date: start + chrono::Duration::days(3),
            num_nights: 3,
            num_guests: 2,
            cabin_price: 750.0,
            extra_price: 90.0,
            total_price: 840.0,
            has_breakfast: true,
            status,
            paid,
            observation: None,
            created_at: start.and_hms_opt(9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_check_in_gate_over_all_statuses() {
        for status in BookingStatus::ALL {
            let expected = !matches!(
                status,
                BookingStatus::CheckedIn | BookingStatus::CheckedOut | BookingStatus::Cancelled
            );
            assert_eq!(can_check_in(status.as_str()), expected, "{status}");
        }
    }

    #[test]
    fn test_check_out_gate_over_all_statuses() {
        for status in BookingStatus::ALL {
            let expected = !matches!(status, BookingStatus::CheckedOut | BookingStatus::Cancelled);
            assert_eq!(can_check_out(status.as_str()), expected, "{status}");
        }
    }

    #[test]
    fn test_gates_ignore_case() {
        assert!(!can_check_in("CheckedIn"));
        assert!(!can_check_in("checkedin"));
        assert!(!can_check_in("CANCELLED"));
        assert!(!can_check_out("CheckedOut"));
        assert!(can_check_out("CheckedIn"));
        assert!(can_check_in("Confirmed"));
    }

    #[test]
    fn test_unknown_status_fails_open() {
        for raw in ["", "archived", "no-show", "checked in"] {
            assert!(can_check_in(raw), "{raw:?}");
            assert!(can_check_out(raw), "{raw:?}");
            assert_eq!(display_meta(raw).color, ColorCategory::Grey);
        }
    }

    #[test]
    fn test_pending_and_unconfirmed_gate_alike() {
        assert_eq!(can_check_in("pending"), can_check_in("unconfirmed"));
        assert_eq!(can_check_out("pending"), can_check_out("unconfirmed"));
        assert!(BookingStatus::Pending.is_initial());
        assert!(BookingStatus::Unconfirmed.is_initial());
        assert!(!BookingStatus::Confirmed.is_initial());
    }

    #[test]
    fn test_display_meta_is_total_and_distinct() {
        let metas: Vec<StatusMeta> = BookingStatus::ALL
            .iter()
            .map(|s| display_meta(s.as_str()))
            .collect();
        for meta in &metas {
            assert_ne!(meta.color, ColorCategory::Grey);
            assert_eq!(meta.hex, meta.color.hex());
        }
        for (i, a) in metas.iter().enumerate() {
            for b in &metas[i + 1..] {
                assert_ne!(a.color, b.color);
            }
        }
        assert_eq!(display_meta("CHECKEDOUT").label, "Checked out");
    }

    #[test]
    fn test_check_in_from_confirmed() {
        let b = booking(7, BookingStatus::Confirmed, false);
        let checked_in = apply_check_in(&b).unwrap();
        assert_eq!(checked_in.status, BookingStatus::CheckedIn);
        assert!(checked_in.paid);
        assert_eq!(checked_in.id, 7);
        assert_eq!(checked_in.total_price, b.total_price);

        let err = apply_check_in(&checked_in).unwrap_err();
        assert_eq!(err.action, Action::CheckIn);
        assert_eq!(err.status, BookingStatus::CheckedIn);
    }

    #[test]
    fn test_check_out_from_checked_in() {
        let b = booking(3, BookingStatus::CheckedIn, true);
        let out = apply_check_out(&b).unwrap();
        assert_eq!(out.status, BookingStatus::CheckedOut);
        assert!(out.paid);
    }

    #[test]
    fn test_refused_check_in_leaves_booking_untouched() {
        let b = booking(4, BookingStatus::CheckedOut, true);
        let before = b.clone();
        for _ in 0..3 {
            let err = apply_check_in(&b).unwrap_err();
            assert_eq!(
                err,
                TransitionError {
                    action: Action::CheckIn,
                    status: BookingStatus::CheckedOut
                }
            );
        }
        assert_eq!(b, before);
    }

    #[test]
    fn test_cancelled_blocks_both_actions() {
        let b = booking(5, BookingStatus::Cancelled, false);
        assert!(apply_check_in(&b).is_err());
        assert!(apply_check_out(&b).is_err());
        assert!(!b.paid);
    }

    #[test]
    fn test_cancel_from_any_status_keeps_paid() {
        for status in BookingStatus::ALL {
            let b = booking(9, status, true);
            let cancelled = apply_cancel(&b);
            assert_eq!(cancelled.status, BookingStatus::Cancelled);
            assert!(cancelled.paid);
        }
    }

    #[test]
    fn test_full_stay_lifecycle() {
        let b = booking(1, BookingStatus::Unconfirmed, false);

        let b = apply_check_in(&b).unwrap();
        assert_eq!((b.id, b.status, b.paid), (1, BookingStatus::CheckedIn, true));

        let b = apply_check_out(&b).unwrap();
        assert_eq!((b.id, b.status, b.paid), (1, BookingStatus::CheckedOut, true));

        assert!(apply_check_in(&b).is_err());
    }

    #[test]
    fn test_transition_error_message() {
        let err = TransitionError {
            action: Action::CheckOut,
            status: BookingStatus::Cancelled,
        };
        assert_eq!(err.to_string(), "cannot check out a booking that is cancelled");
    }

    #[test]
    fn test_string_gates_agree_with_typed_gates() {
        for status in BookingStatus::ALL {
            for raw in [status.as_str().to_string(), status.as_str().to_uppercase()] {
                assert_eq!(can_check_in(&raw), status.allows_check_in(), "{raw}");
                assert_eq!(can_check_out(&raw), status.allows_check_out(), "{raw}");
                assert_eq!(display_meta(&raw), status.meta(), "{raw}");
            }
        }
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&BookingStatus::CheckedIn).unwrap();
        assert_eq!(json, "\"checkedin\"");
        let back: BookingStatus = serde_json::from_str("\"checkedout\"").unwrap();
        assert_eq!(back, BookingStatus::CheckedOut);
    }
}
