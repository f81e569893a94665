use serde::{Deserialize, Serialize};

use super::Weekday;

/// One recurring weekly availability window. Times are wall-clock "HH:MM"
/// strings in the provider's locale; zero-padded 24h format compares
/// correctly as text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub id: String,
    pub provider_id: String,
    pub weekday: Weekday,
    pub start_time: String,
    pub end_time: String,
}

impl AvailabilityWindow {
    /// Half-open overlap test: touching endpoints do not overlap.
    pub fn overlaps(&self, other: &AvailabilityWindow) -> bool {
        self.weekday == other.weekday
            && self.start_time < other.end_time
            && other.start_time < self.end_time
    }
}

pub fn validate_time(s: &str) -> anyhow::Result<()> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 || parts[0].len() != 2 || parts[1].len() != 2 {
        return Err(anyhow::anyhow!("invalid time format: {s} (expected HH:MM)"));
    }
    let hour: u32 = parts[0]
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid hour in: {s}"))?;
    let minute: u32 = parts[1]
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid minute in: {s}"))?;
    if hour > 23 || minute > 59 {
        return Err(anyhow::anyhow!("time out of range: {s}"));
    }
    Ok(())
}

pub fn validate_window(start: &str, end: &str) -> anyhow::Result<()> {
    validate_time(start)?;
    validate_time(end)?;
    if start >= end {
        return Err(anyhow::anyhow!("start time must be before end time"));
    }
    Ok(())
}
