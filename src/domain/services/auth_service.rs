use std::sync::Arc;
use crate::domain::{
    models::{auth::{AuthTokens, Claims, PartnerSession, RefreshTokenRecord}, partner::Partner},
    ports::AuthRepository
};
use crate::error::AppError;
use crate::config::Config;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;
use chrono::{Utc, Duration};
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Sha256, Digest};

pub const TOKEN_AUDIENCE: &str = "mapero-partner-dashboard";

pub struct AuthService {
    repo: Arc<dyn AuthRepository>,
    config: Config,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(repo: Arc<dyn AuthRepository>, config: Config) -> Result<Self, AppError> {
        let encoding_key = EncodingKey::from_ed_pem(config.jwt_secret_key.as_bytes())
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid JWT private key PEM: {}", e)))?;
        let decoding_key = DecodingKey::from_ed_pem(config.jwt_public_key.as_bytes())
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid JWT public key PEM: {}", e)))?;

        Ok(Self { repo, config, encoding_key, decoding_key })
    }

    pub async fn login(&self, partner: &Partner) -> Result<AuthTokens, AppError> {
        let family_id = Uuid::new_v4();
        self.issue_token_pair(partner, family_id, 1).await
    }

    /// Rotates a refresh token. The presented token is consumed whatever the outcome.
    pub async fn refresh(&self, raw_refresh_token: &str) -> Result<RefreshTokenRecord, AppError> {
        let token_hash = self.hash_token(raw_refresh_token);

        let record = self.repo.find_refresh_token(&token_hash).await?
            .ok_or(AppError::SessionExpired)?;

        self.repo.delete_refresh_token(&token_hash).await?;
        if record.expires_at < Utc::now() {
            return Err(AppError::SessionExpired);
        }

        Ok(record)
    }

    pub async fn reissue(&self, partner: &Partner, previous: &RefreshTokenRecord) -> Result<AuthTokens, AppError> {
        self.issue_token_pair(partner, previous.family_id, previous.generation_id + 1).await
    }

    pub async fn logout(&self, partner_id: &str) -> Result<(), AppError> {
        self.repo.delete_for_partner(partner_id).await
    }

    pub fn verify(&self, access_token: &str) -> Result<PartnerSession, AppError> {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[TOKEN_AUDIENCE]);
        validation.set_issuer(&[&self.config.auth_issuer]);

        let token_data = decode::<Claims>(access_token, &self.decoding_key, &validation)
            .map_err(|_| AppError::SessionExpired)?;

        Ok(PartnerSession {
            partner_id: token_data.claims.sub,
            establishment_id: token_data.claims.establishment_id,
            email: token_data.claims.email,
        })
    }

    async fn issue_token_pair(&self, partner: &Partner, family_id: Uuid, generation_id: i32) -> Result<AuthTokens, AppError> {
        let now = Utc::now();
        let exp = (now + Duration::minutes(self.config.access_token_ttl_minutes)).timestamp() as usize;

        let claims = Claims {
            iss: self.config.auth_issuer.clone(),
            sub: partner.id.clone(),
            aud: TOKEN_AUDIENCE.to_string(),
            exp,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            establishment_id: partner.establishment_id.clone(),
            email: partner.email.clone(),
        };

        let access_token = encode(&Header::new(Algorithm::EdDSA), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("JWT encoding failed: {}", e);
                AppError::Internal
            })?;

        let refresh_token: String = rand::thread_rng().sample_iter(&Alphanumeric).take(64).map(char::from).collect();

        let refresh_record = RefreshTokenRecord {
            token_hash: self.hash_token(&refresh_token),
            partner_id: partner.id.clone(),
            family_id,
            generation_id,
            expires_at: now + Duration::days(self.config.refresh_token_ttl_days),
            created_at: now,
        };

        self.repo.create_refresh_token(&refresh_record).await?;
        Ok(AuthTokens { token: access_token, refresh_token })
    }

    fn hash_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}
