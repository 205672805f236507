use anyhow::{anyhow, Context};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{
    Booking, BookingDetail, BookingListQuery, BookingPage, BookingStatus, BookingSummary, Cabin,
    CabinInput, Guest, GuestInput, Settings,
};

const DATE_FMT: &str = "%Y-%m-%d";
const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

fn now_str() -> String {
    Utc::now().naive_utc().format(DATETIME_FMT).to_string()
}

fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT).with_context(|| format!("invalid date in database: {s}"))
}

fn parse_datetime(s: &str) -> anyhow::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT)
        .with_context(|| format!("invalid timestamp in database: {s}"))
}

fn parse_status(s: &str) -> anyhow::Result<BookingStatus> {
    BookingStatus::parse(s).ok_or_else(|| anyhow!("unknown booking status in database: {s}"))
}

// ── Cabins ──

const CABIN_COLUMNS: &str =
    "id, name, max_capacity, regular_price, discount, description, image, created_at";

fn parse_cabin_row(row: &rusqlite::Row) -> anyhow::Result<Cabin> {
    let created_at_str: String = row.get(7)?;
    Ok(Cabin {
        id: row.get(0)?,
        name: row.get(1)?,
        max_capacity: row.get(2)?,
        regular_price: row.get(3)?,
        discount: row.get(4)?,
        description: row.get(5)?,
        image: row.get(6)?,
        created_at: parse_datetime(&created_at_str)?,
    })
}

pub fn list_cabins(conn: &Connection) -> anyhow::Result<Vec<Cabin>> {
    let mut stmt = conn.prepare(&format!("SELECT {CABIN_COLUMNS} FROM cabins ORDER BY id ASC"))?;
    let rows = stmt.query_map([], |row| Ok(parse_cabin_row(row)))?;

    let mut cabins = vec![];
    for row in rows {
        cabins.push(row??);
    }
    Ok(cabins)
}

pub fn get_cabin(conn: &Connection, id: i64) -> anyhow::Result<Option<Cabin>> {
    let cabin = conn
        .query_row(
            &format!("SELECT {CABIN_COLUMNS} FROM cabins WHERE id = ?1"),
            params![id],
            |row| Ok(parse_cabin_row(row)),
        )
        .optional()?;
    cabin.transpose()
}

pub fn create_cabin(conn: &Connection, cabin: &CabinInput) -> anyhow::Result<Cabin> {
    conn.execute(
        "INSERT INTO cabins (name, max_capacity, regular_price, discount, description, image, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            cabin.name.trim(),
            cabin.max_capacity,
            cabin.regular_price,
            cabin.discount,
            cabin.description.trim(),
            cabin.image,
            now_str(),
        ],
    )?;
    let id = conn.last_insert_rowid();
    get_cabin(conn, id)?.ok_or_else(|| anyhow!("cabin {id} missing after insert"))
}

pub fn update_cabin(
    conn: &Connection,
    id: i64,
    cabin: &CabinInput,
) -> anyhow::Result<Option<Cabin>> {
    let count = conn.execute(
        "UPDATE cabins SET name = ?1, max_capacity = ?2, regular_price = ?3, discount = ?4,
         description = ?5, image = COALESCE(?6, image)
         WHERE id = ?7",
        params![
            cabin.name.trim(),
            cabin.max_capacity,
            cabin.regular_price,
            cabin.discount,
            cabin.description.trim(),
            cabin.image,
            id,
        ],
    )?;
    if count == 0 {
        return Ok(None);
    }
    get_cabin(conn, id)
}

pub fn delete_cabin(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM cabins WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

pub fn count_bookings_for_cabin(conn: &Connection, cabin_id: i64) -> anyhow::Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings WHERE cabin_id = ?1",
        params![cabin_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

// ── Guests ──

const GUEST_COLUMNS: &str = "id, full_name, email, national_id, nationality, country_flag";

fn guest_from_row(row: &rusqlite::Row) -> rusqlite::Result<Guest> {
    Ok(Guest {
        id: row.get(0)?,
        full_name: row.get(1)?,
        email: row.get(2)?,
        national_id: row.get(3)?,
        nationality: row.get(4)?,
        country_flag: row.get(5)?,
    })
}

pub fn list_guests(conn: &Connection) -> anyhow::Result<Vec<Guest>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {GUEST_COLUMNS} FROM guests ORDER BY full_name COLLATE NOCASE ASC"
    ))?;
    let rows = stmt.query_map([], guest_from_row)?;

    let mut guests = vec![];
    for row in rows {
        guests.push(row?);
    }
    Ok(guests)
}

pub fn get_guest(conn: &Connection, id: i64) -> anyhow::Result<Option<Guest>> {
    let guest = conn
        .query_row(
            &format!("SELECT {GUEST_COLUMNS} FROM guests WHERE id = ?1"),
            params![id],
            guest_from_row,
        )
        .optional()?;
    Ok(guest)
}

pub fn create_guest(conn: &Connection, guest: &GuestInput) -> anyhow::Result<Guest> {
    conn.execute(
        "INSERT INTO guests (full_name, email, national_id, nationality, country_flag)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            guest.full_name.trim(),
            guest.email.trim(),
            guest.national_id,
            guest.nationality,
            guest.country_flag,
        ],
    )?;
    let id = conn.last_insert_rowid();
    get_guest(conn, id)?.ok_or_else(|| anyhow!("guest {id} missing after insert"))
}

/// Guest nationalities, most common first. Guests without one are skipped.
pub fn count_guests_by_nationality(conn: &Connection) -> anyhow::Result<Vec<(String, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT nationality, COUNT(*) FROM guests
         WHERE nationality IS NOT NULL AND TRIM(nationality) != ''
         GROUP BY nationality
         ORDER BY COUNT(*) DESC, nationality ASC",
    )?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

    let mut counts = vec![];
    for row in rows {
        counts.push(row?);
    }
    Ok(counts)
}

// ── Bookings ──

const BOOKING_COLUMNS: &str = "id, cabin_id, guest_id, start_date, end_date, num_nights, num_guests, \
     cabin_price, extra_price, total_price, has_breakfast, status, paid, observation, created_at";

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let start_date_str: String = row.get(3)?;
    let end_date_str: String = row.get(4)?;
    let status_str: String = row.get(11)?;
    let created_at_str: String = row.get(14)?;

    Ok(Booking {
        id: row.get(0)?,
        cabin_id: row.get(1)?,
        guest_id: row.get(2)?,
        start_date: parse_date(&start_date_str)?,
        end_date: parse_date(&end_date_str)?,
        num_nights: row.get(5)?,
        num_guests: row.get(6)?,
        cabin_price: row.get(7)?,
        extra_price: row.get(8)?,
        total_price: row.get(9)?,
        has_breakfast: row.get(10)?,
        status: parse_status(&status_str)?,
        paid: row.get(12)?,
        observation: row.get(13)?,
        created_at: parse_datetime(&created_at_str)?,
    })
}

/// Inserts a booking and returns its new id. `booking.id` is ignored.
pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO bookings (cabin_id, guest_id, start_date, end_date, num_nights, num_guests,
            cabin_price, extra_price, total_price, has_breakfast, status, paid, observation, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            booking.cabin_id,
            booking.guest_id,
            booking.start_date.format(DATE_FMT).to_string(),
            booking.end_date.format(DATE_FMT).to_string(),
            booking.num_nights,
            booking.num_guests,
            booking.cabin_price,
            booking.extra_price,
            booking.total_price,
            booking.has_breakfast,
            booking.status.as_str(),
            booking.paid,
            booking.observation,
            booking.created_at.format(DATETIME_FMT).to_string(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_booking(conn: &Connection, id: i64) -> anyhow::Result<Option<Booking>> {
    let booking = conn
        .query_row(
            &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
            params![id],
            |row| Ok(parse_booking_row(row)),
        )
        .optional()?;
    booking.transpose()
}

/// Booking with its cabin and guest, as shown on the detail and check-in pages.
pub fn get_booking_detail(conn: &Connection, id: i64) -> anyhow::Result<Option<BookingDetail>> {
    let Some(booking) = get_booking(conn, id)? else {
        return Ok(None);
    };
    let cabin = get_cabin(conn, booking.cabin_id)?
        .with_context(|| format!("booking {id} references missing cabin {}", booking.cabin_id))?;
    let guest = get_guest(conn, booking.guest_id)?
        .with_context(|| format!("booking {id} references missing guest {}", booking.guest_id))?;
    Ok(Some(BookingDetail {
        booking,
        cabin,
        guest,
    }))
}

pub fn all_bookings(conn: &Connection) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY start_date ASC, id ASC"
    ))?;
    let rows = stmt.query_map([], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

/// First non-cancelled booking of the cabin whose nights overlap `[start, end)`.
pub fn find_overlapping_booking(
    conn: &Connection,
    cabin_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> anyhow::Result<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT id FROM bookings
             WHERE cabin_id = ?1 AND LOWER(status) != 'cancelled'
               AND start_date < ?3 AND end_date > ?2
             ORDER BY start_date ASC LIMIT 1",
            params![
                cabin_id,
                start.format(DATE_FMT).to_string(),
                end.format(DATE_FMT).to_string(),
            ],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

/// Persists the outcome of a status transition.
pub fn update_booking_status(
    conn: &Connection,
    id: i64,
    status: BookingStatus,
    paid: bool,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, paid = ?2 WHERE id = ?3",
        params![status.as_str(), paid, id],
    )?;
    Ok(count > 0)
}

pub fn delete_booking(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

pub fn list_bookings(conn: &Connection, query: &BookingListQuery) -> anyhow::Result<BookingPage> {
    let status = query.status.map(|s| s.as_str());
    let pattern = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| like_pattern(&s.to_lowercase()));

    let filter = "FROM bookings b
         JOIN cabins c ON c.id = b.cabin_id
         JOIN guests g ON g.id = b.guest_id
         WHERE (?1 IS NULL OR LOWER(b.status) = ?1)
           AND (?2 IS NULL OR fold_case(g.full_name) LIKE ?2 ESCAPE '\\')";

    let count: i64 = conn
        .query_row(
            &format!("SELECT COUNT(*) {filter}"),
            params![status, pattern],
            |row| row.get(0),
        )
        .context("failed to count bookings")?;

    let sql = format!(
        "SELECT b.id, b.cabin_id, c.name, g.full_name, g.email, b.start_date, b.end_date,
                b.num_nights, b.num_guests, b.total_price, b.status, b.paid
         {filter}
         ORDER BY {}
         LIMIT ?3 OFFSET ?4",
        query.sort.order_by()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        params![status, pattern, query.page_size, query.offset()],
        |row| Ok(parse_summary_row(row)),
    )?;

    let mut data = vec![];
    for row in rows {
        data.push(row??);
    }
    Ok(BookingPage { data, count })
}

fn parse_summary_row(row: &rusqlite::Row) -> anyhow::Result<BookingSummary> {
    let start_date_str: String = row.get(5)?;
    let end_date_str: String = row.get(6)?;
    let status_str: String = row.get(10)?;

    Ok(BookingSummary {
        id: row.get(0)?,
        cabin_id: row.get(1)?,
        cabin_name: row.get(2)?,
        guest_name: row.get(3)?,
        guest_email: row.get(4)?,
        start_date: parse_date(&start_date_str)?,
        end_date: parse_date(&end_date_str)?,
        num_nights: row.get(7)?,
        num_guests: row.get(8)?,
        total_price: row.get(9)?,
        status: parse_status(&status_str)?,
        paid: row.get(11)?,
    })
}

// ── Settings ──

pub fn get_settings(conn: &Connection) -> anyhow::Result<Settings> {
    let settings = conn
        .query_row(
            "SELECT min_booking_length, max_booking_length, max_guests_per_booking, breakfast_price
             FROM settings WHERE id = 1",
            [],
            |row| {
                Ok(Settings {
                    min_booking_length: row.get(0)?,
                    max_booking_length: row.get(1)?,
                    max_guests_per_booking: row.get(2)?,
                    breakfast_price: row.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(settings.unwrap_or_default())
}

pub fn save_settings(conn: &Connection, settings: &Settings) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO settings (id, min_booking_length, max_booking_length, max_guests_per_booking, breakfast_price)
         VALUES (1, ?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
           min_booking_length = excluded.min_booking_length,
           max_booking_length = excluded.max_booking_length,
           max_guests_per_booking = excluded.max_guests_per_booking,
           breakfast_price = excluded.breakfast_price",
        params![
            settings.min_booking_length,
            settings.max_booking_length,
            settings.max_guests_per_booking,
            settings.breakfast_price,
        ],
    )?;
    Ok(())
}
