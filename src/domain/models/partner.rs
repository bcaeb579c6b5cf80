use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub establishment_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Partner {
    pub fn new(email: String, password_hash: String, first_name: String, last_name: String, establishment_id: String) -> Self {
        Self {
            id: format!("partner_{}", Uuid::new_v4()),
            email,
            password_hash,
            first_name,
            last_name,
            establishment_id,
            avatar_url: None,
            created_at: Utc::now(),
        }
    }
}
