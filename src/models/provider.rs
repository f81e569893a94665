use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    pub name: String,
    pub business_name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub api_token: String,
}
