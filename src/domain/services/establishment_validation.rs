use crate::domain::models::establishment::{Address, OpeningDay};
use crate::domain::services::opening_hours::{self, OpeningHoursForm};
use crate::error::FieldErrors;
use serde::{Deserialize, Serialize};

pub const MAX_PHOTOS: usize = 3;

/// `openingHours` may come as the stored day list or as the form's
/// day-to-override map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OpeningHoursInput {
    Table(Vec<OpeningDay>),
    Form(OpeningHoursForm),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EstablishmentInput {
    pub name: String,
    pub description: String,
    pub phone: String,
    pub email: String,
    pub address: Address,
    pub opening_hours: OpeningHoursInput,
    #[serde(default)]
    pub photos: Vec<String>,
}

/// Validated profile fields, opening hours already canonical.
#[derive(Debug, Clone, PartialEq)]
pub struct EstablishmentProfile {
    pub name: String,
    pub description: String,
    pub phone: String,
    pub email: String,
    pub address: Address,
    pub opening_hours: Vec<OpeningDay>,
    pub photos: Vec<String>,
}

pub fn validate_establishment(input: EstablishmentInput) -> Result<EstablishmentProfile, FieldErrors> {
    let mut errors = FieldErrors::new();

    min_chars(&mut errors, "name", &input.name, 2, "Name is required");
    min_chars(&mut errors, "description", &input.description, 20, "Add an engaging description (20 characters minimum)");
    min_chars(&mut errors, "phone", &input.phone, 6, "Invalid phone number");
    if !is_email(&input.email) {
        errors.add("email", "Invalid email");
    }

    min_chars(&mut errors, "address.line1", &input.address.line1, 3, "Address is required");
    min_chars(&mut errors, "address.postalCode", &input.address.postal_code, 4, "Invalid postal code");
    min_chars(&mut errors, "address.city", &input.address.city, 2, "City is required");
    min_chars(&mut errors, "address.country", &input.address.country, 2, "Country is required");

    if input.photos.is_empty() {
        errors.add("photos", "Add at least one photo");
    } else if input.photos.len() > MAX_PHOTOS {
        errors.add("photos", "At most 3 photos");
    }
    for (i, photo) in input.photos.iter().enumerate() {
        if !is_absolute_url(photo) {
            errors.add(format!("photos.{}", i), "Invalid URL");
        }
    }

    let opening_hours = match input.opening_hours {
        OpeningHoursInput::Table(days) => Some(opening_hours::canonicalize(&days)),
        OpeningHoursInput::Form(form) => match opening_hours::normalize(&form) {
            Ok(table) => Some(table),
            Err(day_errors) => {
                errors.merge(day_errors.nested("openingHours"));
                None
            }
        },
    };

    let address = Address {
        line2: input.address.line2.filter(|line| !line.trim().is_empty()),
        ..input.address
    };

    match opening_hours {
        Some(opening_hours) if errors.is_empty() => Ok(EstablishmentProfile {
            name: input.name,
            description: input.description,
            phone: input.phone,
            email: input.email,
            address,
            opening_hours,
            photos: input.photos,
        }),
        _ => Err(errors),
    }
}

fn min_chars(errors: &mut FieldErrors, path: &str, value: &str, min: usize, message: &str) {
    if value.trim().chars().count() < min {
        errors.add(path, message);
    }
}

pub fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.contains(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

fn is_absolute_url(value: &str) -> bool {
    reqwest::Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}
