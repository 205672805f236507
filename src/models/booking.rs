use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::{BookingStatus, Cabin, Guest};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: i64,
    pub cabin_id: i64,
    pub guest_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub num_nights: i64,
    pub num_guests: i64,
    pub cabin_price: f64,
    pub extra_price: f64,
    pub total_price: f64,
    pub has_breakfast: bool,
    pub status: BookingStatus,
    pub paid: bool,
    pub observation: Option<String>,
    pub created_at: NaiveDateTime,
}

/// A reservation request. Prices and night count are computed server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBooking {
    pub cabin_id: i64,
    pub guest_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub num_guests: i64,
    #[serde(default)]
    pub has_breakfast: bool,
    pub observation: Option<String>,
    /// Initial status, `unconfirmed` when absent.
    pub status: Option<String>,
}

/// One row of the bookings table view.
#[derive(Debug, Clone, Serialize)]
pub struct BookingSummary {
    pub id: i64,
    pub cabin_id: i64,
    pub cabin_name: String,
    pub guest_name: String,
    pub guest_email: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub num_nights: i64,
    pub num_guests: i64,
    pub total_price: f64,
    pub status: BookingStatus,
    pub paid: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingDetail {
    #[serde(flatten)]
    pub booking: Booking,
    pub cabin: Cabin,
    pub guest: Guest,
}

/// A page of bookings plus the total number matching the filter.
#[derive(Debug, Clone)]
pub struct BookingPage {
    pub data: Vec<BookingSummary>,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingSort {
    DateAsc,
    #[default]
    DateDesc,
    AmountAsc,
    AmountDesc,
}

impl BookingSort {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "date-asc" => Some(BookingSort::DateAsc),
            "date-desc" => Some(BookingSort::DateDesc),
            "amount-asc" => Some(BookingSort::AmountAsc),
            "amount-desc" => Some(BookingSort::AmountDesc),
            _ => None,
        }
    }

    pub fn order_by(&self) -> &'static str {
        match self {
            BookingSort::DateAsc => "b.start_date ASC, b.id ASC",
            BookingSort::DateDesc => "b.start_date DESC, b.id DESC",
            BookingSort::AmountAsc => "b.total_price ASC, b.id ASC",
            BookingSort::AmountDesc => "b.total_price DESC, b.id DESC",
        }
    }
}

/// Filters for the bookings list, taken from the request rather than any
/// shared view state.
#[derive(Debug, Clone, Default)]
pub struct BookingListQuery {
    pub status: Option<BookingStatus>,
    pub search: Option<String>,
    pub sort: BookingSort,
    pub page: i64,
    pub page_size: i64,
}

impl BookingListQuery {
    /// Rows to skip. Saturates instead of overflowing for absurd page numbers.
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.page_size)
    }
}

/// Prices for a stay, computed from the cabin rate and hotel settings.
/// `Cabin::discount` is a percentage off the regular nightly price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StayPrice {
    pub num_nights: i64,
    pub cabin_price: f64,
    pub extra_price: f64,
    pub total_price: f64,
}

impl StayPrice {
    pub fn compute(
        cabin: &Cabin,
        num_nights: i64,
        num_guests: i64,
        has_breakfast: bool,
        breakfast_price: f64,
    ) -> Self {
        let nights = num_nights as f64;
        let nightly = cabin.regular_price * (100.0 - cabin.discount) / 100.0;
        let cabin_price = nightly * nights;
        let extra_price = if has_breakfast {
            breakfast_price * nights * num_guests as f64
        } else {
            0.0
        };
        Self {
            num_nights,
            cabin_price,
            extra_price,
            total_price: cabin_price + extra_price,
        }
    }
}
