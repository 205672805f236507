//! Dashboard aggregates. Everything here is a pure function over a slice of
//! bookings so the HTTP layer decides when to load data and how often the
//! browser polls.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::Serialize;

use crate::models::{Booking, BookingStatus, StatusMeta};

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    All,
    Today,
    Week,
    Month,
    Year,
}

impl Period {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Period::All),
            "today" => Some(Period::Today),
            "week" => Some(Period::Week),
            "month" => Some(Period::Month),
            "year" => Some(Period::Year),
            _ => None,
        }
    }

    /// Inclusive date range containing `today`. Weeks start on Sunday.
    pub fn range(&self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            Period::All => None,
            Period::Today => Some((today, today)),
            Period::Week => {
                let start = today - Duration::days(today.weekday().num_days_from_sunday() as i64);
                Some((start, start + Duration::days(6)))
            }
            Period::Month => {
                let start = today.with_day(1)?;
                let next = if today.month() == 12 {
                    NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)?
                } else {
                    NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)?
                };
                Some((start, next - Duration::days(1)))
            }
            Period::Year => Some((
                NaiveDate::from_ymd_opt(today.year(), 1, 1)?,
                NaiveDate::from_ymd_opt(today.year(), 12, 31)?,
            )),
        }
    }

    fn contains(&self, today: NaiveDate, date: NaiveDate) -> bool {
        match self.range(today) {
            Some((start, end)) => date >= start && date <= end,
            None => true,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Stats {
    pub total_bookings: i64,
    pub total_guests: i64,
    pub total_revenue: f64,
    pub active_bookings: i64,
}

/// Headline numbers for bookings starting within `period`.
pub fn stats(bookings: &[Booking], period: Period, today: NaiveDate) -> Stats {
    let in_period: Vec<&Booking> = bookings
        .iter()
        .filter(|b| period.contains(today, b.start_date))
        .collect();

    Stats {
        total_bookings: in_period.len() as i64,
        total_guests: in_period.iter().map(|b| b.num_guests).sum(),
        total_revenue: in_period.iter().map(|b| b.total_price).sum(),
        active_bookings: in_period
            .iter()
            .filter(|b| b.status == BookingStatus::CheckedIn)
            .count() as i64,
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusCount {
    pub status: BookingStatus,
    pub count: i64,
    pub meta: StatusMeta,
}

/// One entry per known status, zero counts included.
pub fn status_breakdown(bookings: &[Booking]) -> Vec<StatusCount> {
    BookingStatus::ALL
        .iter()
        .map(|&status| StatusCount {
            status,
            count: bookings.iter().filter(|b| b.status == status).count() as i64,
            meta: status.meta(),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeekdayDuration {
    pub day: String,
    pub avg_nights: f64,
}

/// Average stay length grouped by the weekday of arrival, Monday first.
pub fn durations_by_weekday(
    bookings: &[Booking],
    period: Period,
    today: NaiveDate,
) -> Vec<WeekdayDuration> {
    WEEKDAYS
        .iter()
        .map(|&day| {
            let nights: Vec<i64> = bookings
                .iter()
                .filter(|b| period.contains(today, b.start_date) && b.start_date.weekday() == day)
                .map(|b| b.num_nights)
                .collect();
            let avg = if nights.is_empty() {
                0.0
            } else {
                nights.iter().sum::<i64>() as f64 / nights.len() as f64
            };
            WeekdayDuration {
                day: day.to_string(),
                avg_nights: (avg * 100.0).round() / 100.0,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlySales {
    pub month: &'static str,
    pub sales: f64,
    pub bookings: i64,
}

/// Revenue and booking count per month of arrival, January first.
pub fn monthly_sales(bookings: &[Booking], year: i32) -> Vec<MonthlySales> {
    let mut months: Vec<MonthlySales> = MONTHS
        .iter()
        .map(|&month| MonthlySales {
            month,
            sales: 0.0,
            bookings: 0,
        })
        .collect();

    for booking in bookings.iter().filter(|b| b.start_date.year() == year) {
        let entry = &mut months[booking.start_date.month0() as usize];
        entry.sales += booking.total_price;
        entry.bookings += 1;
    }
    months
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TodaySummary {
    pub bookings: i64,
    pub guests: i64,
    pub revenue: f64,
}

/// Bookings made since midnight of `now`'s day.
pub fn today_summary(bookings: &[Booking], now: NaiveDateTime) -> TodaySummary {
    let midnight = now.date().and_time(chrono::NaiveTime::MIN);
    let today: Vec<&Booking> = bookings
        .iter()
        .filter(|b| b.created_at >= midnight)
        .collect();

    TodaySummary {
        bookings: today.len() as i64,
        guests: today.iter().map(|b| b.num_guests).sum(),
        revenue: today.iter().map(|b| b.total_price).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn booking(start: &str, nights: i64, guests: i64, total: f64, status: BookingStatus) -> Booking {
        let start_date = date(start);
        Booking {
            id: 0,
            cabin_id: 1,
            guest_id: 1,
            start_date,
            end_date: start_date + Duration::days(nights),
            num_nights: nights,
            num_guests: guests,
            cabin_price: total,
            extra_price: 0.0,
            total_price: total,
            has_breakfast: false,
            status,
            paid: false,
            observation: None,
            created_at: start_date.and_hms_opt(8, 0, 0).unwrap() - Duration::days(10),
        }
    }

    #[test]
    fn test_week_starts_on_sunday() {
        // 2025-06-18 is a Wednesday
        let (start, end) = Period::Week.range(date("2025-06-18")).unwrap();
        assert_eq!(start, date("2025-06-15"));
        assert_eq!(end, date("2025-06-21"));
        // A Sunday is the first day of its own week
        let (start, _) = Period::Week.range(date("2025-06-15")).unwrap();
        assert_eq!(start, date("2025-06-15"));
    }

    #[test]
    fn test_month_range_handles_december() {
        let (start, end) = Period::Month.range(date("2025-12-09")).unwrap();
        assert_eq!(start, date("2025-12-01"));
        assert_eq!(end, date("2025-12-31"));
        let (_, end) = Period::Month.range(date("2024-02-10")).unwrap();
        assert_eq!(end, date("2024-02-29"));
    }

    #[test]
    fn test_stats_by_period() {
        let today = date("2025-06-18");
        let bookings = vec![
            booking("2025-06-18", 2, 2, 400.0, BookingStatus::CheckedIn),
            booking("2025-06-02", 3, 1, 300.0, BookingStatus::Confirmed),
            booking("2025-01-10", 1, 4, 100.0, BookingStatus::CheckedIn),
            booking("2024-12-30", 5, 2, 900.0, BookingStatus::CheckedOut),
        ];

        let all = stats(&bookings, Period::All, today);
        assert_eq!(all.total_bookings, 4);
        assert_eq!(all.total_guests, 9);
        assert_eq!(all.total_revenue, 1700.0);
        assert_eq!(all.active_bookings, 2);

        let month = stats(&bookings, Period::Month, today);
        assert_eq!(month.total_bookings, 2);
        assert_eq!(month.active_bookings, 1);

        let today_stats = stats(&bookings, Period::Today, today);
        assert_eq!(today_stats.total_bookings, 1);
        assert_eq!(today_stats.total_revenue, 400.0);

        let year = stats(&bookings, Period::Year, today);
        assert_eq!(year.total_bookings, 3);
    }

    #[test]
    fn test_status_breakdown_includes_zero_counts() {
        let bookings = vec![
            booking("2025-06-18", 2, 2, 400.0, BookingStatus::CheckedIn),
            booking("2025-06-19", 2, 2, 400.0, BookingStatus::CheckedIn),
            booking("2025-06-20", 2, 2, 400.0, BookingStatus::Pending),
        ];
        let breakdown = status_breakdown(&bookings);
        assert_eq!(breakdown.len(), 6);
        let count = |s: BookingStatus| breakdown.iter().find(|c| c.status == s).unwrap().count;
        assert_eq!(count(BookingStatus::CheckedIn), 2);
        assert_eq!(count(BookingStatus::Pending), 1);
        assert_eq!(count(BookingStatus::Cancelled), 0);
        assert_eq!(breakdown[0].status, BookingStatus::Unconfirmed);

        let empty = status_breakdown(&[]);
        assert_eq!(empty.len(), 6);
        assert!(empty.iter().all(|c| c.count == 0));
    }

    #[test]
    fn test_durations_average_per_weekday() {
        let today = date("2025-06-18");
        let bookings = vec![
            // Mondays
            booking("2025-06-16", 2, 1, 0.0, BookingStatus::Confirmed),
            booking("2025-06-09", 3, 1, 0.0, BookingStatus::Confirmed),
            booking("2025-06-02", 3, 1, 0.0, BookingStatus::Confirmed),
            // Saturday
            booking("2025-06-14", 7, 1, 0.0, BookingStatus::Confirmed),
        ];
        let durations = durations_by_weekday(&bookings, Period::All, today);
        assert_eq!(durations.len(), 7);
        assert_eq!(durations[0].day, "Mon");
        assert_eq!(durations[0].avg_nights, 2.67);
        assert_eq!(durations[5].day, "Sat");
        assert_eq!(durations[5].avg_nights, 7.0);
        assert_eq!(durations[6].day, "Sun");
        assert_eq!(durations[6].avg_nights, 0.0);

        let week = durations_by_weekday(&bookings, Period::Week, today);
        assert_eq!(week[0].avg_nights, 2.0);
        assert_eq!(week[5].avg_nights, 0.0);
    }

    #[test]
    fn test_monthly_sales_for_year() {
        let bookings = vec![
            booking("2025-01-05", 2, 1, 200.0, BookingStatus::CheckedOut),
            booking("2025-01-20", 2, 1, 300.0, BookingStatus::CheckedOut),
            booking("2025-12-24", 2, 1, 800.0, BookingStatus::Confirmed),
            booking("2024-01-05", 2, 1, 999.0, BookingStatus::CheckedOut),
        ];
        let sales = monthly_sales(&bookings, 2025);
        assert_eq!(sales.len(), 12);
        assert_eq!(sales[0].month, "Jan");
        assert_eq!(sales[0].sales, 500.0);
        assert_eq!(sales[0].bookings, 2);
        assert_eq!(sales[11].sales, 800.0);
        assert_eq!(sales[5].bookings, 0);
    }

    #[test]
    fn test_today_summary_uses_creation_time() {
        let now = date("2025-06-18").and_hms_opt(15, 30, 0).unwrap();
        let mut fresh = booking("2025-07-01", 2, 3, 450.0, BookingStatus::Unconfirmed);
        fresh.created_at = date("2025-06-18").and_hms_opt(0, 5, 0).unwrap();
        let mut yesterday = booking("2025-07-01", 2, 2, 300.0, BookingStatus::Unconfirmed);
        yesterday.created_at = date("2025-06-17").and_hms_opt(23, 59, 0).unwrap();

        let summary = today_summary(&[fresh, yesterday], now);
        assert_eq!(
            summary,
            TodaySummary {
                bookings: 1,
                guests: 3,
                revenue: 450.0
            }
        );
    }
}
