use crate::domain::services::establishment_validation::is_email;
use crate::error::FieldErrors;
use serde::{Deserialize, Serialize};

pub const PASSWORD_MIN_CHARS: usize = 6;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistrationInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub establishment_name: String,
    pub accept_terms: bool,
}

pub fn validate_login(input: &LoginInput) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_credentials(&mut errors, &input.email, &input.password);
    errors.into_result(())
}

pub fn validate_registration(input: &RegistrationInput) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_credentials(&mut errors, &input.email, &input.password);

    if input.first_name.trim().chars().count() < 2 {
        errors.add("firstName", "First name is required");
    }
    if input.last_name.trim().chars().count() < 2 {
        errors.add("lastName", "Last name is required");
    }
    if input.establishment_name.trim().chars().count() < 2 {
        errors.add("establishmentName", "Establishment name is required");
    }
    if !input.accept_terms {
        errors.add("acceptTerms", "You must accept the terms");
    }

    errors.into_result(())
}

fn check_credentials(errors: &mut FieldErrors, email: &str, password: &str) {
    if !is_email(email) {
        errors.add("email", "Invalid email");
    }
    if password.chars().count() < PASSWORD_MIN_CHARS {
        errors.add("password", "6 characters minimum");
    }
}
