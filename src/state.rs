use std::sync::Arc;
use crate::domain::ports::{
    AuthRepository, EstablishmentRepository, OfferRepository, PartnerRepository, StatsRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub partner_repo: Arc<dyn PartnerRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub establishment_repo: Arc<dyn EstablishmentRepository>,
    pub offer_repo: Arc<dyn OfferRepository>,
    pub stats_repo: Arc<dyn StatsRepository>,
    pub auth_service: Arc<AuthService>,
}
