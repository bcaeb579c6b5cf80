pub mod account_validation;
pub mod auth_service;
pub mod establishment_validation;
pub mod metrics;
pub mod offer_validation;
pub mod opening_hours;
