use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub provider_id: String,
    pub name: String,
    pub price: f64,
    pub duration_minutes: i32,
    pub is_active: bool,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

pub fn validate_service_fields(
    name: &str,
    price: f64,
    duration_minutes: i32,
    description: Option<&str>,
) -> anyhow::Result<()> {
    let name = name.trim();
    if name.len() < 2 || name.len() > 100 {
        return Err(anyhow::anyhow!("name must be 2-100 characters"));
    }
    if price <= 0.0 || price >= 100_000.0 {
        return Err(anyhow::anyhow!("price must be positive and below 100000"));
    }
    if !(15..=480).contains(&duration_minutes) || duration_minutes % 15 != 0 {
        return Err(anyhow::anyhow!(
            "duration must be a multiple of 15 minutes between 15 and 480"
        ));
    }
    if let Some(desc) = description {
        if desc.len() > 500 {
            return Err(anyhow::anyhow!("description must be at most 500 characters"));
        }
    }
    Ok(())
}
