use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    pub value: i64,
}

/// Counters fed by the consumer app; this service only reads them.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitorCounters {
    pub total_visitors: i64,
    pub offers_viewed: i64,
    pub offers_redeemed: i64,
    pub visitors_trend: Vec<TrendPoint>,
}

impl VisitorCounters {
    /// Seven zeroed points labelled L M M J V S D, Monday first.
    pub fn empty() -> Self {
        Self {
            total_visitors: 0,
            offers_viewed: 0,
            offers_redeemed: 0,
            visitors_trend: ["L", "M", "M", "J", "V", "S", "D"]
                .into_iter()
                .map(|label| TrendPoint { label: label.to_string(), value: 0 })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverview {
    pub total_visitors: i64,
    pub offers_viewed: i64,
    pub offers_redeemed: i64,
    pub active_offers: i64,
    pub visitors_trend: Vec<TrendPoint>,
}

#[derive(Debug, FromRow, Clone)]
pub struct StatsRecord {
    pub establishment_id: String,
    pub total_visitors: i64,
    pub offers_viewed: i64,
    pub offers_redeemed: i64,
    pub visitors_trend_json: String,
    pub updated_at: DateTime<Utc>,
}

impl StatsRecord {
    /// The row written alongside a new establishment.
    pub fn zeroed(establishment_id: &str) -> Result<Self, AppError> {
        let visitors_trend_json = serde_json::to_string(&VisitorCounters::empty().visitors_trend)
            .map_err(|e| AppError::InternalWithMsg(format!("Cannot encode trend: {}", e)))?;

        Ok(Self {
            establishment_id: establishment_id.to_string(),
            total_visitors: 0,
            offers_viewed: 0,
            offers_redeemed: 0,
            visitors_trend_json,
            updated_at: Utc::now(),
        })
    }
}

impl TryFrom<StatsRecord> for VisitorCounters {
    type Error = AppError;

    fn try_from(r: StatsRecord) -> Result<Self, Self::Error> {
        let visitors_trend = serde_json::from_str(&r.visitors_trend_json)
            .map_err(|_| AppError::InternalWithMsg(format!("Stats for {} have a corrupt trend", r.establishment_id)))?;

        Ok(VisitorCounters {
            total_visitors: r.total_visitors,
            offers_viewed: r.offers_viewed,
            offers_redeemed: r.offers_redeemed,
            visitors_trend,
        })
    }
}
