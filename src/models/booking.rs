use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A committed appointment. The *_snapshot fields are copied from the
/// service/provider/customer rows at creation time; historical bookings must
/// never re-join live data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub provider_id: String,
    pub service_id: String,
    pub customer_id: String,
    pub date_time: NaiveDateTime,
    pub status: BookingStatus,
    pub created_by: CreatedBy,
    pub address_snapshot: String,
    pub service_name_snapshot: String,
    pub service_price_snapshot: f64,
    pub service_description_snapshot: Option<String>,
    pub customer_name_snapshot: String,
    pub customer_email_snapshot: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Scheduled,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
        BookingStatus::NoShow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Scheduled => "SCHEDULED",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::NoShow => "NO_SHOW",
        }
    }

    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "SCHEDULED" => Ok(BookingStatus::Scheduled),
            "COMPLETED" => Ok(BookingStatus::Completed),
            "CANCELLED" => Ok(BookingStatus::Cancelled),
            "NO_SHOW" => Ok(BookingStatus::NoShow),
            _ => Err(anyhow::anyhow!("invalid booking status: {s}")),
        }
    }

    /// Cancelled and no-show bookings release their time window.
    pub fn blocks_slot(&self) -> bool {
        matches!(self, BookingStatus::Scheduled | BookingStatus::Completed)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CreatedBy {
    Customer,
    Provider,
}

impl CreatedBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreatedBy::Customer => "customer",
            CreatedBy::Provider => "provider",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "provider" => CreatedBy::Provider,
            _ => CreatedBy::Customer,
        }
    }
}
