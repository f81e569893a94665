use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};

use crate::models::{
    AvailabilityWindow, Booking, BookingStatus, CreatedBy, Customer, Provider, Service, Weekday,
};

const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

fn format_dt(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FMT).to_string()
}

fn parse_dt(s: &str) -> anyhow::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT)
        .map_err(|e| anyhow::anyhow!("invalid stored timestamp {s}: {e}"))
}

// ── Providers ──

pub fn create_provider(conn: &Connection, provider: &Provider) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO providers (id, name, business_name, address, phone, email, api_token)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            provider.id,
            provider.name,
            provider.business_name,
            provider.address,
            provider.phone,
            provider.email,
            provider.api_token,
        ],
    )?;
    Ok(())
}

fn parse_provider_row(row: &rusqlite::Row) -> rusqlite::Result<Provider> {
    Ok(Provider {
        id: row.get(0)?,
        name: row.get(1)?,
        business_name: row.get(2)?,
        address: row.get(3)?,
        phone: row.get(4)?,
        email: row.get(5)?,
        api_token: row.get(6)?,
    })
}

pub fn get_provider_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Provider>> {
    let result = conn.query_row(
        "SELECT id, name, business_name, address, phone, email, api_token
         FROM providers WHERE id = ?1",
        params![id],
        parse_provider_row,
    );

    match result {
        Ok(provider) => Ok(Some(provider)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_provider_by_token(conn: &Connection, token: &str) -> anyhow::Result<Option<Provider>> {
    let result = conn.query_row(
        "SELECT id, name, business_name, address, phone, email, api_token
         FROM providers WHERE api_token = ?1",
        params![token],
        parse_provider_row,
    );

    match result {
        Ok(provider) => Ok(Some(provider)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ── Availability windows ──

fn parse_window_row(row: &rusqlite::Row) -> anyhow::Result<AvailabilityWindow> {
    let weekday_str: String = row.get(2)?;
    Ok(AvailabilityWindow {
        id: row.get(0)?,
        provider_id: row.get(1)?,
        weekday: Weekday::parse(&weekday_str)?,
        start_time: row.get(3)?,
        end_time: row.get(4)?,
    })
}

pub fn list_windows(conn: &Connection, provider_id: &str) -> anyhow::Result<Vec<AvailabilityWindow>> {
    let mut stmt = conn.prepare(
        "SELECT id, provider_id, weekday, start_time, end_time
         FROM availability_windows WHERE provider_id = ?1",
    )?;

    let rows = stmt.query_map(params![provider_id], |row| Ok(parse_window_row(row)))?;

    let mut windows = vec![];
    for row in rows {
        windows.push(row??);
    }
    // Calendar order (Monday first), not the alphabetical order TEXT gives us.
    windows.sort_by(|a, b| (a.weekday, &a.start_time).cmp(&(b.weekday, &b.start_time)));
    Ok(windows)
}

pub fn get_windows_for_weekday(
    conn: &Connection,
    provider_id: &str,
    weekday: Weekday,
) -> anyhow::Result<Vec<AvailabilityWindow>> {
    let mut stmt = conn.prepare(
        "SELECT id, provider_id, weekday, start_time, end_time
         FROM availability_windows WHERE provider_id = ?1 AND weekday = ?2
         ORDER BY start_time ASC",
    )?;

    let rows = stmt.query_map(params![provider_id, weekday.as_str()], |row| {
        Ok(parse_window_row(row))
    })?;

    let mut windows = vec![];
    for row in rows {
        windows.push(row??);
    }
    Ok(windows)
}

pub fn get_window_by_id(
    conn: &Connection,
    window_id: &str,
) -> anyhow::Result<Option<AvailabilityWindow>> {
    let result = conn.query_row(
        "SELECT id, provider_id, weekday, start_time, end_time
         FROM availability_windows WHERE id = ?1",
        params![window_id],
        |row| Ok(parse_window_row(row)),
    );

    match result {
        Ok(window) => Ok(Some(window?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn insert_window(conn: &Connection, window: &AvailabilityWindow) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO availability_windows (id, provider_id, weekday, start_time, end_time)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            window.id,
            window.provider_id,
            window.weekday.as_str(),
            window.start_time,
            window.end_time,
        ],
    )?;
    Ok(())
}

pub fn update_window(conn: &Connection, window: &AvailabilityWindow) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE availability_windows SET weekday = ?1, start_time = ?2, end_time = ?3
         WHERE id = ?4 AND provider_id = ?5",
        params![
            window.weekday.as_str(),
            window.start_time,
            window.end_time,
            window.id,
            window.provider_id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_window(conn: &Connection, provider_id: &str, window_id: &str) -> anyhow::Result<bool> {
    let count = conn.execute(
        "DELETE FROM availability_windows WHERE id = ?1 AND provider_id = ?2",
        params![window_id, provider_id],
    )?;
    Ok(count > 0)
}

// ── Services ──

fn parse_service_row(row: &rusqlite::Row) -> anyhow::Result<Service> {
    let created_at_str: String = row.get(7)?;
    let updated_at_str: String = row.get(8)?;
    Ok(Service {
        id: row.get(0)?,
        provider_id: row.get(1)?,
        name: row.get(2)?,
        price: row.get(3)?,
        duration_minutes: row.get(4)?,
        is_active: row.get::<_, i32>(5)? != 0,
        description: row.get(6)?,
        created_at: parse_dt(&created_at_str)?,
        updated_at: parse_dt(&updated_at_str)?,
    })
}

const SERVICE_COLS: &str =
    "id, provider_id, name, price, duration_minutes, is_active, description, created_at, updated_at";

pub fn insert_service(conn: &Connection, service: &Service) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO services (id, provider_id, name, price, duration_minutes, is_active, description, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            service.id,
            service.provider_id,
            service.name,
            service.price,
            service.duration_minutes,
            service.is_active as i32,
            service.description,
            format_dt(&service.created_at),
            format_dt(&service.updated_at),
        ],
    )?;
    Ok(())
}

pub fn update_service(conn: &Connection, service: &Service) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE services SET name = ?1, price = ?2, duration_minutes = ?3, is_active = ?4,
                description = ?5, updated_at = ?6
         WHERE id = ?7 AND provider_id = ?8",
        params![
            service.name,
            service.price,
            service.duration_minutes,
            service.is_active as i32,
            service.description,
            format_dt(&service.updated_at),
            service.id,
            service.provider_id,
        ],
    )?;
    Ok(count > 0)
}

/// Services referenced by bookings are never deleted, only switched off.
pub fn deactivate_service(
    conn: &Connection,
    provider_id: &str,
    service_id: &str,
    now: &NaiveDateTime,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE services SET is_active = 0, updated_at = ?1 WHERE id = ?2 AND provider_id = ?3",
        params![format_dt(now), service_id, provider_id],
    )?;
    Ok(count > 0)
}

pub fn get_service_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Service>> {
    let result = conn.query_row(
        &format!("SELECT {SERVICE_COLS} FROM services WHERE id = ?1"),
        params![id],
        |row| Ok(parse_service_row(row)),
    );

    match result {
        Ok(service) => Ok(Some(service?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_services(conn: &Connection, provider_id: &str) -> anyhow::Result<Vec<Service>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SERVICE_COLS} FROM services WHERE provider_id = ?1 ORDER BY created_at DESC"
    ))?;

    let rows = stmt.query_map(params![provider_id], |row| Ok(parse_service_row(row)))?;

    let mut services = vec![];
    for row in rows {
        services.push(row??);
    }
    Ok(services)
}

// ── Customers ──

fn parse_customer_row(row: &rusqlite::Row) -> anyhow::Result<Customer> {
    let created_at_str: String = row.get(4)?;
    let updated_at_str: String = row.get(5)?;
    Ok(Customer {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        created_at: parse_dt(&created_at_str)?,
        updated_at: parse_dt(&updated_at_str)?,
    })
}

pub fn get_customer_by_email(conn: &Connection, email: &str) -> anyhow::Result<Option<Customer>> {
    let result = conn.query_row(
        "SELECT id, name, email, phone, created_at, updated_at FROM customers WHERE email = ?1",
        params![email],
        |row| Ok(parse_customer_row(row)),
    );

    match result {
        Ok(customer) => Ok(Some(customer?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Find-or-create keyed on email; an existing row has its name/phone
/// overwritten with the latest submission.
pub fn find_or_create_customer(
    conn: &Connection,
    name: &str,
    email: &str,
    phone: &str,
    now: &NaiveDateTime,
) -> anyhow::Result<Customer> {
    if let Some(existing) = get_customer_by_email(conn, email)? {
        conn.execute(
            "UPDATE customers SET name = ?1, phone = ?2, updated_at = ?3 WHERE id = ?4",
            params![name, phone, format_dt(now), existing.id],
        )?;
        return Ok(Customer {
            name: name.to_string(),
            phone: phone.to_string(),
            updated_at: *now,
            ..existing
        });
    }

    let customer = Customer {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        created_at: *now,
        updated_at: *now,
    };
    conn.execute(
        "INSERT INTO customers (id, name, email, phone, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            customer.id,
            customer.name,
            customer.email,
            customer.phone,
            format_dt(&customer.created_at),
            format_dt(&customer.updated_at),
        ],
    )?;
    Ok(customer)
}

/// Customers who have booked with this provider before, matched on a
/// name/email/phone fragment. Capped at 10 rows for the autocomplete box.
pub fn search_customers(
    conn: &Connection,
    provider_id: &str,
    q: &str,
) -> anyhow::Result<Vec<(Customer, i64)>> {
    let pattern = format!("%{q}%");
    let mut stmt = conn.prepare(
        "SELECT c.id, c.name, c.email, c.phone, c.created_at, c.updated_at, COUNT(b.id)
         FROM customers c JOIN bookings b ON b.customer_id = c.id
         WHERE b.provider_id = ?1
           AND (c.name LIKE ?2 OR c.email LIKE ?2 OR c.phone LIKE ?2)
         GROUP BY c.id
         ORDER BY c.name ASC
         LIMIT 10",
    )?;

    let rows = stmt.query_map(params![provider_id, pattern], |row| {
        let booking_count: i64 = row.get(6)?;
        Ok((parse_customer_row(row), booking_count))
    })?;

    let mut customers = vec![];
    for row in rows {
        let (customer, booking_count) = row?;
        customers.push((customer?, booking_count));
    }
    Ok(customers)
}

// ── Bookings ──

const BOOKING_COLS: &str = "id, provider_id, service_id, customer_id, date_time, status, created_by, \
     address_snapshot, service_name_snapshot, service_price_snapshot, service_description_snapshot, \
     customer_name_snapshot, customer_email_snapshot, created_at, updated_at";

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let date_time_str: String = row.get(4)?;
    let status_str: String = row.get(5)?;
    let created_by_str: String = row.get(6)?;
    let created_at_str: String = row.get(13)?;
    let updated_at_str: String = row.get(14)?;

    Ok(Booking {
        id: row.get(0)?,
        provider_id: row.get(1)?,
        service_id: row.get(2)?,
        customer_id: row.get(3)?,
        date_time: parse_dt(&date_time_str)?,
        status: BookingStatus::parse(&status_str)?,
        created_by: CreatedBy::parse(&created_by_str),
        address_snapshot: row.get(7)?,
        service_name_snapshot: row.get(8)?,
        service_price_snapshot: row.get(9)?,
        service_description_snapshot: row.get(10)?,
        customer_name_snapshot: row.get(11)?,
        customer_email_snapshot: row.get(12)?,
        created_at: parse_dt(&created_at_str)?,
        updated_at: parse_dt(&updated_at_str)?,
    })
}

pub fn insert_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, provider_id, service_id, customer_id, date_time, status, created_by,
            address_snapshot, service_name_snapshot, service_price_snapshot, service_description_snapshot,
            customer_name_snapshot, customer_email_snapshot, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            booking.id,
            booking.provider_id,
            booking.service_id,
            booking.customer_id,
            format_dt(&booking.date_time),
            booking.status.as_str(),
            booking.created_by.as_str(),
            booking.address_snapshot,
            booking.service_name_snapshot,
            booking.service_price_snapshot,
            booking.service_description_snapshot,
            booking.customer_name_snapshot,
            booking.customer_email_snapshot,
            format_dt(&booking.created_at),
            format_dt(&booking.updated_at),
        ],
    )?;
    Ok(())
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLS} FROM bookings WHERE id = ?1"),
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Occupied intervals for one provider and calendar day. Which statuses
/// block time is decided by `BookingStatus::blocks_slot`; the duration
/// comes from the booked service row.
pub fn get_busy_intervals_for_day(
    conn: &Connection,
    provider_id: &str,
    date: NaiveDate,
) -> anyhow::Result<Vec<(NaiveDateTime, i32)>> {
    let day_start = date.and_hms_opt(0, 0, 0).map(|dt| format_dt(&dt)).unwrap_or_default();
    let day_end = date.and_hms_opt(23, 59, 59).map(|dt| format_dt(&dt)).unwrap_or_default();

    // as_str yields fixed identifiers, so splicing them is safe.
    let blocking: Vec<String> = BookingStatus::ALL
        .iter()
        .filter(|s| s.blocks_slot())
        .map(|s| format!("'{}'", s.as_str()))
        .collect();

    let mut stmt = conn.prepare(&format!(
        "SELECT b.date_time, s.duration_minutes
         FROM bookings b JOIN services s ON s.id = b.service_id
         WHERE b.provider_id = ?1 AND b.date_time >= ?2 AND b.date_time <= ?3
           AND b.status IN ({})",
        blocking.join(", ")
    ))?;

    let rows = stmt.query_map(params![provider_id, day_start, day_end], |row| {
        let dt_str: String = row.get(0)?;
        let duration: i32 = row.get(1)?;
        Ok((dt_str, duration))
    })?;

    let mut intervals = vec![];
    for row in rows {
        let (dt_str, duration) = row?;
        intervals.push((parse_dt(&dt_str)?, duration));
    }
    Ok(intervals)
}

pub struct BookingFilters<'a> {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<&'a str>,
}

pub fn list_bookings(
    conn: &Connection,
    provider_id: &str,
    filters: &BookingFilters,
) -> anyhow::Result<Vec<Booking>> {
    let mut sql = format!("SELECT {BOOKING_COLS} FROM bookings WHERE provider_id = ?1");
    let mut params_vec: Vec<Box<dyn rusqlite::types::ToSql>> =
        vec![Box::new(provider_id.to_string())];

    if let Some(start) = filters.start_date {
        params_vec.push(Box::new(format_dt(&start.and_hms_opt(0, 0, 0).unwrap_or_default())));
        sql.push_str(&format!(" AND date_time >= ?{}", params_vec.len()));
    }
    if let Some(end) = filters.end_date {
        params_vec.push(Box::new(format_dt(&end.and_hms_opt(23, 59, 59).unwrap_or_default())));
        sql.push_str(&format!(" AND date_time <= ?{}", params_vec.len()));
    }
    if let Some(status) = filters.status {
        params_vec.push(Box::new(status.to_string()));
        sql.push_str(&format!(" AND status = ?{}", params_vec.len()));
    }
    sql.push_str(" ORDER BY date_time DESC");

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: BookingStatus,
    now: &NaiveDateTime,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), format_dt(now), id],
    )?;
    Ok(count > 0)
}

// ── Dashboard rollups ──

pub struct DashboardStats {
    pub today_appointments: i64,
    pub upcoming_appointments: i64,
    pub monthly_revenue: f64,
    pub active_services: i64,
}

pub fn get_dashboard_stats(
    conn: &Connection,
    provider_id: &str,
    now: &NaiveDateTime,
) -> anyhow::Result<DashboardStats> {
    let today = now.date();
    let today_start = format_dt(&today.and_hms_opt(0, 0, 0).unwrap_or(*now));
    let today_end = format_dt(&today.and_hms_opt(23, 59, 59).unwrap_or(*now));

    let today_appointments: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings WHERE provider_id = ?1 AND date_time >= ?2 AND date_time <= ?3",
        params![provider_id, today_start, today_end],
        |row| row.get(0),
    )?;

    let week_end = format_dt(
        &(today + chrono::Duration::days(7))
            .and_hms_opt(23, 59, 59)
            .unwrap_or(*now),
    );
    let upcoming_appointments: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings WHERE provider_id = ?1 AND date_time >= ?2 AND date_time <= ?3",
        params![provider_id, format_dt(now), week_end],
        |row| row.get(0),
    )?;

    let month_start = format_dt(
        &today
            .with_day(1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or(*now),
    );
    let monthly_revenue: f64 = conn.query_row(
        "SELECT COALESCE(SUM(service_price_snapshot), 0) FROM bookings
         WHERE provider_id = ?1 AND status = 'COMPLETED' AND date_time >= ?2 AND date_time <= ?3",
        params![provider_id, month_start, today_end],
        |row| row.get(0),
    )?;

    let active_services: i64 = conn.query_row(
        "SELECT COUNT(*) FROM services WHERE provider_id = ?1 AND is_active = 1",
        params![provider_id],
        |row| row.get(0),
    )?;

    Ok(DashboardStats {
        today_appointments,
        upcoming_appointments,
        monthly_revenue,
        active_services,
    })
}

/// (date_time, status, price snapshot) tuples for the revenue chart range.
pub fn get_bookings_for_chart(
    conn: &Connection,
    provider_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> anyhow::Result<Vec<(NaiveDateTime, BookingStatus, f64)>> {
    let range_start = format_dt(&start.and_hms_opt(0, 0, 0).unwrap_or_default());
    let range_end = format_dt(&end.and_hms_opt(23, 59, 59).unwrap_or_default());

    let mut stmt = conn.prepare(
        "SELECT date_time, status, service_price_snapshot FROM bookings
         WHERE provider_id = ?1 AND date_time >= ?2 AND date_time <= ?3",
    )?;

    let rows = stmt.query_map(params![provider_id, range_start, range_end], |row| {
        let dt: String = row.get(0)?;
        let status: String = row.get(1)?;
        let price: f64 = row.get(2)?;
        Ok((dt, status, price))
    })?;

    let mut bookings = vec![];
    for row in rows {
        let (dt, status, price) = row?;
        bookings.push((parse_dt(&dt)?, BookingStatus::parse(&status)?, price));
    }
    Ok(bookings)
}
