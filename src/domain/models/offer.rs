use crate::domain::models::{clock::{self, hhmm}, weekday::Weekday};
use crate::error::AppError;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

pub const TYPE_PERCENTAGE: &str = "percentage";
pub const TYPE_SPECIAL: &str = "special";
pub const TYPE_HAPPY_HOUR: &str = "happy-hour";

/// The value an offer carries, one variant per offer type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OfferKind {
    #[serde(rename = "percentage")]
    Percentage { percentage: u8 },
    #[serde(rename = "special")]
    Special {
        #[serde(rename = "specialText")]
        special_text: String,
    },
    #[serde(rename = "happy-hour")]
    HappyHour {
        #[serde(rename = "happyHourPrice", with = "rust_decimal::serde::float")]
        happy_hour_price: Decimal,
    },
}

impl OfferKind {
    pub fn type_tag(&self) -> &'static str {
        match self {
            OfferKind::Percentage { .. } => TYPE_PERCENTAGE,
            OfferKind::Special { .. } => TYPE_SPECIAL,
            OfferKind::HappyHour { .. } => TYPE_HAPPY_HOUR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferSchedule {
    pub days: Vec<Weekday>,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferValidity {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A validated offer that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferDraft {
    pub title: String,
    pub description: String,
    pub kind: OfferKind,
    pub schedule: OfferSchedule,
    pub validity: OfferValidity,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    pub establishment_id: String,
    pub title: String,
    pub description: String,
    #[serde(flatten)]
    pub kind: OfferKind,
    pub schedule: OfferSchedule,
    pub validity: OfferValidity,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Offer {
    pub fn new(establishment_id: String, draft: OfferDraft) -> Self {
        let now = Utc::now();
        Self {
            id: format!("offer_{}", Uuid::new_v4()),
            establishment_id,
            title: draft.title,
            description: draft.description,
            kind: draft.kind,
            schedule: draft.schedule,
            validity: draft.validity,
            is_active: draft.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every editable field, keeping identity and `created_at`.
    pub fn apply(&mut self, draft: OfferDraft) {
        self.title = draft.title;
        self.description = draft.description;
        self.kind = draft.kind;
        self.schedule = draft.schedule;
        self.validity = draft.validity;
        self.is_active = draft.is_active;
        self.updated_at = Utc::now();
    }
}

/// Flat storage shape of an offer, one nullable column per variant value.
#[derive(Debug, FromRow, Clone)]
pub struct OfferRecord {
    pub id: String,
    pub establishment_id: String,
    pub title: String,
    pub description: String,
    pub offer_type: String,
    pub percentage: Option<i32>,
    pub special_text: Option<String>,
    pub happy_hour_price: Option<String>,
    pub days_json: String,
    pub start_time: String,
    pub end_time: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Offer> for OfferRecord {
    fn from(offer: &Offer) -> Self {
        let (percentage, special_text, happy_hour_price) = match &offer.kind {
            OfferKind::Percentage { percentage } => (Some(i32::from(*percentage)), None, None),
            OfferKind::Special { special_text } => (None, Some(special_text.clone()), None),
            OfferKind::HappyHour { happy_hour_price } => (None, None, Some(happy_hour_price.to_string())),
        };

        Self {
            id: offer.id.clone(),
            establishment_id: offer.establishment_id.clone(),
            title: offer.title.clone(),
            description: offer.description.clone(),
            offer_type: offer.kind.type_tag().to_string(),
            percentage,
            special_text,
            happy_hour_price,
            days_json: serde_json::to_string(&offer.schedule.days).unwrap_or_else(|_| "[]".to_string()),
            start_time: clock::format_clock_time(&offer.schedule.start_time),
            end_time: clock::format_clock_time(&offer.schedule.end_time),
            start_date: offer.validity.start_date,
            end_date: offer.validity.end_date,
            is_active: offer.is_active,
            created_at: offer.created_at,
            updated_at: offer.updated_at,
        }
    }
}

impl TryFrom<OfferRecord> for Offer {
    type Error = AppError;

    fn try_from(record: OfferRecord) -> Result<Self, Self::Error> {
        let corrupt = |what: &str| AppError::InternalWithMsg(format!("Offer {} has corrupt {}", record.id, what));

        let kind = match record.offer_type.as_str() {
            TYPE_PERCENTAGE => {
                let value = record.percentage.ok_or_else(|| corrupt("percentage"))?;
                OfferKind::Percentage {
                    percentage: u8::try_from(value).map_err(|_| corrupt("percentage"))?,
                }
            }
            TYPE_SPECIAL => OfferKind::Special {
                special_text: record.special_text.clone().ok_or_else(|| corrupt("special_text"))?,
            },
            TYPE_HAPPY_HOUR => {
                let raw = record.happy_hour_price.as_deref().ok_or_else(|| corrupt("happy_hour_price"))?;
                OfferKind::HappyHour {
                    happy_hour_price: Decimal::from_str(raw).map_err(|_| corrupt("happy_hour_price"))?,
                }
            }
            _ => return Err(corrupt("offer_type")),
        };

        let days: Vec<Weekday> = serde_json::from_str(&record.days_json).map_err(|_| corrupt("days_json"))?;
        let start_time = clock::parse_clock_time(&record.start_time).ok_or_else(|| corrupt("start_time"))?;
        let end_time = clock::parse_clock_time(&record.end_time).ok_or_else(|| corrupt("end_time"))?;

        Ok(Offer {
            id: record.id,
            establishment_id: record.establishment_id,
            title: record.title,
            description: record.description,
            kind,
            schedule: OfferSchedule { days, start_time, end_time },
            validity: OfferValidity {
                start_date: record.start_date,
                end_date: record.end_date,
            },
            is_active: record.is_active,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}
