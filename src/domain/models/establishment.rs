use crate::domain::models::{clock::hhmm, weekday::Weekday};
use crate::error::AppError;
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub postal_code: String,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningSlot {
    #[serde(with = "hhmm")]
    pub open: NaiveTime,
    #[serde(with = "hhmm")]
    pub close: NaiveTime,
}

/// One day of the opening-hours table. No slots means closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningDay {
    pub day: Weekday,
    pub slots: Vec<OpeningSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Establishment {
    pub id: String,
    pub name: String,
    pub description: String,
    pub phone: String,
    pub email: String,
    pub address: Address,
    pub opening_hours: Vec<OpeningDay>,
    pub photos: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Establishment {
    /// Bare profile created alongside a new partner account.
    pub fn new(name: String, email: String, opening_hours: Vec<OpeningDay>) -> Self {
        let now = Utc::now();
        Self {
            id: format!("est_{}", Uuid::new_v4()),
            name,
            description: String::new(),
            phone: String::new(),
            email,
            address: Address {
                line1: String::new(),
                line2: None,
                postal_code: String::new(),
                city: String::new(),
                country: "France".to_string(),
            },
            opening_hours,
            photos: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, FromRow, Clone)]
pub struct EstablishmentRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub phone: String,
    pub email: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub postal_code: String,
    pub city: String,
    pub country: String,
    pub opening_hours_json: String,
    pub photos_json: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Establishment> for EstablishmentRecord {
    type Error = AppError;

    fn try_from(e: &Establishment) -> Result<Self, Self::Error> {
        let opening_hours_json = serde_json::to_string(&e.opening_hours)
            .map_err(|err| AppError::InternalWithMsg(format!("Cannot encode opening hours: {}", err)))?;
        let photos_json = serde_json::to_string(&e.photos)
            .map_err(|err| AppError::InternalWithMsg(format!("Cannot encode photos: {}", err)))?;

        Ok(Self {
            id: e.id.clone(),
            name: e.name.clone(),
            description: e.description.clone(),
            phone: e.phone.clone(),
            email: e.email.clone(),
            address_line1: e.address.line1.clone(),
            address_line2: e.address.line2.clone(),
            postal_code: e.address.postal_code.clone(),
            city: e.address.city.clone(),
            country: e.address.country.clone(),
            opening_hours_json,
            photos_json,
            created_at: e.created_at,
            updated_at: e.updated_at,
        })
    }
}

impl TryFrom<EstablishmentRecord> for Establishment {
    type Error = AppError;

    fn try_from(r: EstablishmentRecord) -> Result<Self, Self::Error> {
        let opening_hours = serde_json::from_str(&r.opening_hours_json)
            .map_err(|_| AppError::InternalWithMsg(format!("Establishment {} has corrupt opening hours", r.id)))?;
        let photos = serde_json::from_str(&r.photos_json)
            .map_err(|_| AppError::InternalWithMsg(format!("Establishment {} has corrupt photos", r.id)))?;

        Ok(Establishment {
            id: r.id,
            name: r.name,
            description: r.description,
            phone: r.phone,
            email: r.email,
            address: Address {
                line1: r.address_line1,
                line2: r.address_line2,
                postal_code: r.postal_code,
                city: r.city,
                country: r.country,
            },
            opening_hours,
            photos,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}
