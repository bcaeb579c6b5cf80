use serde::{Deserialize, Serialize};

pub use crate::domain::services::account_validation::{LoginInput as LoginRequest, RegistrationInput as RegisterRequest};
pub use crate::domain::services::establishment_validation::EstablishmentInput as UpdateEstablishmentRequest;
pub use crate::domain::services::offer_validation::OfferCandidate as OfferRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}
