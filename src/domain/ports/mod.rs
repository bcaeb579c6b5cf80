use crate::domain::models::{
    auth::RefreshTokenRecord, establishment::Establishment, offer::Offer, partner::Partner,
    stats::VisitorCounters,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait PartnerRepository: Send + Sync {
    /// Writes the establishment, its zeroed stats row and the partner in one
    /// transaction. Nothing is kept when any insert fails.
    async fn create_account(&self, establishment: &Establishment, partner: &Partner) -> Result<Partner, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Partner>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Partner>, AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_for_partner(&self, partner_id: &str) -> Result<(), AppError>;
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError>;
}

#[async_trait]
pub trait EstablishmentRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Establishment>, AppError>;
    async fn update(&self, establishment: &Establishment) -> Result<Establishment, AppError>;
}

#[async_trait]
pub trait OfferRepository: Send + Sync {
    async fn create(&self, offer: &Offer) -> Result<Offer, AppError>;
    async fn find_by_id(&self, establishment_id: &str, id: &str) -> Result<Option<Offer>, AppError>;
    /// Newest first.
    async fn list(&self, establishment_id: &str) -> Result<Vec<Offer>, AppError>;
    async fn update(&self, offer: &Offer) -> Result<Offer, AppError>;
    async fn delete(&self, establishment_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn find(&self, establishment_id: &str) -> Result<Option<VisitorCounters>, AppError>;
}
