use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Customers are identified by email. Re-submitting with a known email
/// overwrites name/phone with the latest values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

pub fn validate_customer_fields(name: &str, email: &str, phone: &str) -> anyhow::Result<()> {
    let name = name.trim();
    if name.len() < 2 || name.len() > 100 {
        return Err(anyhow::anyhow!("name must be 2-100 characters"));
    }
    if !email.contains('@') || email.len() > 255 {
        return Err(anyhow::anyhow!("invalid email address"));
    }
    let phone = phone.trim();
    if phone.len() < 10
        || phone.len() > 15
        || !phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '(' | ')' | '-' | '+'))
    {
        return Err(anyhow::anyhow!("invalid phone number"));
    }
    Ok(())
}
