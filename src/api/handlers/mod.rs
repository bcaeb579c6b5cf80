pub mod auth;
pub mod establishment;
pub mod health;
pub mod offer;
pub mod stats;
