//! Acceptance rules for partner offers.
//!
//! A submission arrives as an [`OfferCandidate`], where every field is optional
//! and loosely typed, and leaves as either a fully typed [`OfferDraft`] or a
//! [`FieldErrors`] map keyed by the wire path of each offending input. All rules
//! run on every submission so the caller gets the complete list at once.

use crate::domain::models::{
    clock,
    offer::{Offer, OfferDraft, OfferKind, OfferSchedule, OfferValidity, TYPE_HAPPY_HOUR, TYPE_PERCENTAGE, TYPE_SPECIAL},
    weekday::Weekday,
};
use crate::error::FieldErrors;
use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const TITLE_MIN_CHARS: usize = 4;
pub const DESCRIPTION_MIN_CHARS: usize = 10;
pub const PERCENTAGE_MIN: f64 = 5.0;
pub const PERCENTAGE_MAX: f64 = 80.0;
pub const SPECIAL_TEXT_MAX_CHARS: usize = 160;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ScheduleCandidate {
    pub days: Option<Vec<String>>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidityCandidate {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Raw offer input. Also used as a partial patch on update: absent fields keep
/// their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct OfferCandidate {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub offer_type: Option<String>,
    pub percentage: Option<f64>,
    pub special_text: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub happy_hour_price: Option<Decimal>,
    pub schedule: Option<ScheduleCandidate>,
    pub validity: Option<ValidityCandidate>,
    pub is_active: Option<bool>,
}

impl From<&Offer> for OfferCandidate {
    fn from(offer: &Offer) -> Self {
        let mut candidate = OfferCandidate {
            title: Some(offer.title.clone()),
            description: Some(offer.description.clone()),
            offer_type: Some(offer.kind.type_tag().to_string()),
            schedule: Some(ScheduleCandidate {
                days: Some(offer.schedule.days.iter().map(|d| d.as_str().to_string()).collect()),
                start_time: Some(clock::format_clock_time(&offer.schedule.start_time)),
                end_time: Some(clock::format_clock_time(&offer.schedule.end_time)),
            }),
            validity: Some(ValidityCandidate {
                start_date: Some(offer.validity.start_date.to_string()),
                end_date: Some(offer.validity.end_date.to_string()),
            }),
            is_active: Some(offer.is_active),
            ..Default::default()
        };

        match &offer.kind {
            OfferKind::Percentage { percentage } => candidate.percentage = Some(f64::from(*percentage)),
            OfferKind::Special { special_text } => candidate.special_text = Some(special_text.clone()),
            OfferKind::HappyHour { happy_hour_price } => candidate.happy_hour_price = Some(*happy_hour_price),
        }

        candidate
    }
}

impl OfferCandidate {
    /// Lays `patch` over `self`, field by field, descending into schedule and validity.
    pub fn overlay(mut self, patch: OfferCandidate) -> OfferCandidate {
        macro_rules! take {
            ($dst:expr, $src:expr) => {
                if $src.is_some() {
                    $dst = $src;
                }
            };
        }

        take!(self.title, patch.title);
        take!(self.description, patch.description);
        take!(self.offer_type, patch.offer_type);
        take!(self.percentage, patch.percentage);
        take!(self.special_text, patch.special_text);
        take!(self.happy_hour_price, patch.happy_hour_price);
        take!(self.is_active, patch.is_active);

        if let Some(schedule) = patch.schedule {
            let mut merged = self.schedule.take().unwrap_or_default();
            take!(merged.days, schedule.days);
            take!(merged.start_time, schedule.start_time);
            take!(merged.end_time, schedule.end_time);
            self.schedule = Some(merged);
        }

        if let Some(validity) = patch.validity {
            let mut merged = self.validity.take().unwrap_or_default();
            take!(merged.start_date, validity.start_date);
            take!(merged.end_date, validity.end_date);
            self.validity = Some(merged);
        }

        self
    }
}

pub fn validate_offer(candidate: &OfferCandidate) -> Result<OfferDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let title = candidate.title.clone().unwrap_or_default();
    if title.chars().count() < TITLE_MIN_CHARS {
        errors.add("title", "Title is too short");
    }

    let description = candidate.description.clone().unwrap_or_default();
    if description.chars().count() < DESCRIPTION_MIN_CHARS {
        errors.add("description", "Describe the offer in at least 10 characters");
    }

    // Value fields are range-checked whenever supplied, whatever the type.
    let percentage = candidate.percentage.and_then(|value| {
        if value.fract() == 0.0 && (PERCENTAGE_MIN..=PERCENTAGE_MAX).contains(&value) {
            Some(value as u8)
        } else {
            errors.add("percentage", "Percentage must be a whole number between 5 and 80");
            None
        }
    });

    let happy_hour_price = candidate.happy_hour_price.and_then(|price| {
        if price >= Decimal::ONE {
            Some(price)
        } else {
            errors.add("happyHourPrice", "Price must be at least 1");
            None
        }
    });

    let special_text = candidate.special_text.clone().and_then(|text| {
        if text.chars().count() > SPECIAL_TEXT_MAX_CHARS {
            errors.add("specialText", "Special offer text is limited to 160 characters");
            None
        } else {
            Some(text)
        }
    });

    let kind = match candidate.offer_type.as_deref() {
        Some(TYPE_PERCENTAGE) => {
            if candidate.percentage.is_none() {
                errors.add("percentage", "Enter a percentage");
            }
            percentage.map(|percentage| OfferKind::Percentage { percentage })
        }
        Some(TYPE_HAPPY_HOUR) => {
            if candidate.happy_hour_price.is_none() {
                errors.add("happyHourPrice", "Enter a happy hour price");
            }
            happy_hour_price.map(|happy_hour_price| OfferKind::HappyHour { happy_hour_price })
        }
        Some(TYPE_SPECIAL) => {
            if candidate.special_text.as_deref().is_none_or(str::is_empty) {
                errors.add("specialText", "Describe your special offer");
            }
            special_text
                .filter(|text| !text.is_empty())
                .map(|special_text| OfferKind::Special { special_text })
        }
        _ => {
            errors.add("type", "Choose percentage, special or happy-hour");
            None
        }
    };

    let schedule = validate_schedule(candidate.schedule.as_ref(), &mut errors);
    let validity = validate_validity(candidate.validity.as_ref(), &mut errors);

    match (kind, schedule, validity) {
        (Some(kind), Some(schedule), Some(validity)) if errors.is_empty() => Ok(OfferDraft {
            title,
            description,
            kind,
            schedule,
            validity,
            is_active: candidate.is_active.unwrap_or(true),
        }),
        _ => Err(errors),
    }
}

fn validate_schedule(schedule: Option<&ScheduleCandidate>, errors: &mut FieldErrors) -> Option<OfferSchedule> {
    let empty = ScheduleCandidate::default();
    let schedule = schedule.unwrap_or(&empty);

    let mut days = BTreeSet::new();
    for raw in schedule.days.iter().flatten() {
        match raw.parse::<Weekday>() {
            Ok(day) => {
                days.insert(day);
            }
            Err(message) => errors.add("schedule.days", message),
        }
    }
    if days.is_empty() {
        errors.add("schedule.days", "Select at least one day");
    }

    let mut time_field = |path: &str, raw: Option<&String>| {
        let parsed = raw.and_then(|value| clock::parse_clock_time(value));
        if parsed.is_none() {
            errors.add(path, "Use the HH:MM format");
        }
        parsed
    };
    let start_time = time_field("schedule.startTime", schedule.start_time.as_ref());
    let end_time = time_field("schedule.endTime", schedule.end_time.as_ref());

    // Overnight windows (end before start) are accepted as-is.
    match (start_time, end_time) {
        (Some(start_time), Some(end_time)) if !days.is_empty() => Some(OfferSchedule {
            days: days.into_iter().collect(),
            start_time,
            end_time,
        }),
        _ => None,
    }
}

fn validate_validity(validity: Option<&ValidityCandidate>, errors: &mut FieldErrors) -> Option<OfferValidity> {
    let empty = ValidityCandidate::default();
    let validity = validity.unwrap_or(&empty);

    let start_date = validity.start_date.as_deref().and_then(parse_date);
    if start_date.is_none() {
        errors.add("validity.startDate", "Enter a valid start date");
    }
    let end_date = validity.end_date.as_deref().and_then(parse_date);
    if end_date.is_none() {
        errors.add("validity.endDate", "Enter a valid end date");
    }

    let (start_date, end_date) = (start_date?, end_date?);
    if end_date < start_date {
        errors.add("validity.endDate", "End date must not be before start date");
        return None;
    }

    Some(OfferValidity { start_date, end_date })
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp, keeping the date part.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
