pub mod email;

use async_trait::async_trait;

use crate::models::Booking;

/// Fire-and-forget delivery of booking notices. Failures are logged by the
/// caller and never affect the booking itself.
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

pub fn customer_confirmation(booking: &Booking) -> (String, String) {
    (
        format!("Booking confirmed: {}", booking.service_name_snapshot),
        format!(
            "Hi {}, your {} appointment is confirmed for {} at {}.",
            booking.customer_name_snapshot,
            booking.service_name_snapshot,
            booking.date_time.format("%Y-%m-%d %H:%M"),
            booking.address_snapshot,
        ),
    )
}

pub fn provider_notice(booking: &Booking) -> (String, String) {
    (
        format!("New booking: {}", booking.service_name_snapshot),
        format!(
            "{} ({}) booked {} for {}.",
            booking.customer_name_snapshot,
            booking.customer_email_snapshot,
            booking.service_name_snapshot,
            booking.date_time.format("%Y-%m-%d %H:%M"),
        ),
    )
}
