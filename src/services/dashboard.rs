//! Read-only rollups over committed bookings. Nothing here is on the
//! booking-correctness path.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::db::queries::{self, DashboardStats};
use crate::errors::AppError;
use crate::models::BookingStatus;

pub fn get_stats(
    conn: &Connection,
    provider_id: &str,
    now: NaiveDateTime,
) -> Result<DashboardStats, AppError> {
    Ok(queries::get_dashboard_stats(conn, provider_id, &now)?)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub date: String,
    pub revenue: f64,
    pub completed: i64,
    pub cancelled: i64,
    pub no_show: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueChart {
    pub data: Vec<ChartPoint>,
    pub total_revenue: f64,
    pub total_appointments: i64,
}

/// Per-day revenue and outcome counts for the trailing `days` days, ending
/// today. Every day in the range appears, zero-filled when empty; revenue
/// counts COMPLETED bookings only.
pub fn get_revenue_chart(
    conn: &Connection,
    provider_id: &str,
    days: i64,
    now: NaiveDateTime,
) -> Result<RevenueChart, AppError> {
    if !(1..=365).contains(&days) {
        return Err(AppError::Validation("days must be between 1 and 365".to_string()));
    }

    let end = now.date();
    let start = end - chrono::Duration::days(days - 1);

    let mut points: BTreeMap<NaiveDate, ChartPoint> = (0..days)
        .map(|offset| {
            let date = start + chrono::Duration::days(offset);
            (
                date,
                ChartPoint {
                    date: date.format("%Y-%m-%d").to_string(),
                    revenue: 0.0,
                    completed: 0,
                    cancelled: 0,
                    no_show: 0,
                },
            )
        })
        .collect();

    for (date_time, status, price) in
        queries::get_bookings_for_chart(conn, provider_id, start, end)?
    {
        let Some(point) = points.get_mut(&date_time.date()) else {
            continue;
        };
        match status {
            BookingStatus::Completed => {
                point.completed += 1;
                point.revenue += price;
            }
            BookingStatus::Cancelled => point.cancelled += 1,
            BookingStatus::NoShow => point.no_show += 1,
            BookingStatus::Scheduled => {}
        }
    }

    let data: Vec<ChartPoint> = points.into_values().collect();
    let total_revenue = data.iter().map(|p| p.revenue).sum();
    let total_appointments = data
        .iter()
        .map(|p| p.completed + p.cancelled + p.no_show)
        .sum();

    Ok(RevenueChart {
        data,
        total_revenue,
        total_appointments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{Booking, CreatedBy, Provider, Service};

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn seed_booking(conn: &Connection, id: &str, date_time: &str, status: BookingStatus, price: f64) {
        let now = dt("2025-06-01 08:00");
        queries::insert_booking(
            conn,
            &Booking {
                id: id.to_string(),
                provider_id: "p1".to_string(),
                service_id: "s1".to_string(),
                customer_id: "c1".to_string(),
                date_time: dt(date_time),
                status,
                created_by: CreatedBy::Customer,
                address_snapshot: "1 Main St".to_string(),
                service_name_snapshot: "Haircut".to_string(),
                service_price_snapshot: price,
                service_description_snapshot: None,
                customer_name_snapshot: "Carla".to_string(),
                customer_email_snapshot: "carla@example.com".to_string(),
                created_at: now,
                updated_at: now,
            },
        )
        .unwrap();
    }

    fn setup() -> Connection {
        let conn = db::init_db(":memory:").unwrap();
        queries::create_provider(
            &conn,
            &Provider {
                id: "p1".to_string(),
                name: "Ana".to_string(),
                business_name: "Ana Hair".to_string(),
                address: "1 Main St".to_string(),
                phone: "+5511998765432".to_string(),
                email: "ana@example.com".to_string(),
                api_token: "tok-p1".to_string(),
            },
        )
        .unwrap();
        queries::insert_service(
            &conn,
            &Service {
                id: "s1".to_string(),
                provider_id: "p1".to_string(),
                name: "Haircut".to_string(),
                price: 45.0,
                duration_minutes: 30,
                is_active: true,
                description: None,
                created_at: dt("2025-01-01 09:00"),
                updated_at: dt("2025-01-01 09:00"),
            },
        )
        .unwrap();
        conn.execute(
            "INSERT INTO customers (id, name, email, phone, created_at, updated_at)
             VALUES ('c1', 'Carla', 'carla@example.com', '+5511912345678',
                     '2025-06-01 08:00:00', '2025-06-01 08:00:00')",
            [],
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_stats_counts() {
        let conn = setup();
        let now = dt("2025-06-16 12:00");
        seed_booking(&conn, "b1", "2025-06-16 14:00", BookingStatus::Scheduled, 45.0);
        seed_booking(&conn, "b2", "2025-06-18 10:00", BookingStatus::Scheduled, 45.0);
        seed_booking(&conn, "b3", "2025-06-10 10:00", BookingStatus::Completed, 60.0);
        seed_booking(&conn, "b4", "2025-05-10 10:00", BookingStatus::Completed, 99.0);

        let stats = get_stats(&conn, "p1", now).unwrap();
        assert_eq!(stats.today_appointments, 1);
        assert_eq!(stats.upcoming_appointments, 2);
        // Only June's completed booking counts toward monthly revenue.
        assert_eq!(stats.monthly_revenue, 60.0);
        assert_eq!(stats.active_services, 1);
    }

    #[test]
    fn test_revenue_chart_zero_fills_and_totals() {
        let conn = setup();
        let now = dt("2025-06-16 12:00");
        seed_booking(&conn, "b1", "2025-06-15 10:00", BookingStatus::Completed, 45.0);
        seed_booking(&conn, "b2", "2025-06-15 14:00", BookingStatus::Completed, 60.0);
        seed_booking(&conn, "b3", "2025-06-14 10:00", BookingStatus::Cancelled, 45.0);
        seed_booking(&conn, "b4", "2025-06-16 09:00", BookingStatus::NoShow, 45.0);
        seed_booking(&conn, "b5", "2025-06-16 11:00", BookingStatus::Scheduled, 45.0);

        let chart = get_revenue_chart(&conn, "p1", 7, now).unwrap();
        assert_eq!(chart.data.len(), 7);
        assert_eq!(chart.data.first().unwrap().date, "2025-06-10");
        assert_eq!(chart.data.last().unwrap().date, "2025-06-16");

        let june15 = chart.data.iter().find(|p| p.date == "2025-06-15").unwrap();
        assert_eq!(june15.completed, 2);
        assert_eq!(june15.revenue, 105.0);

        let june14 = chart.data.iter().find(|p| p.date == "2025-06-14").unwrap();
        assert_eq!(june14.cancelled, 1);
        assert_eq!(june14.revenue, 0.0);

        assert_eq!(chart.total_revenue, 105.0);
        // Scheduled bookings are not an outcome yet.
        assert_eq!(chart.total_appointments, 4);
    }

    #[test]
    fn test_revenue_chart_rejects_bad_range() {
        let conn = setup();
        assert!(get_revenue_chart(&conn, "p1", 0, dt("2025-06-16 12:00")).is_err());
        assert!(get_revenue_chart(&conn, "p1", 400, dt("2025-06-16 12:00")).is_err());
    }
}
