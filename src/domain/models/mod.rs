pub mod auth;
pub mod clock;
pub mod establishment;
pub mod offer;
pub mod partner;
pub mod stats;
pub mod weekday;
