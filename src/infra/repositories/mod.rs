pub mod sqlite_partner_repo;
pub mod sqlite_auth_repo;
pub mod sqlite_establishment_repo;
pub mod sqlite_offer_repo;
pub mod sqlite_stats_repo;

pub mod postgres_partner_repo;
pub mod postgres_auth_repo;
pub mod postgres_establishment_repo;
pub mod postgres_offer_repo;
pub mod postgres_stats_repo;
