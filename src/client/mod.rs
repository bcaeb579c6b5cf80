//! Typed HTTP client for the partner API, used by the dashboard front end.
//!
//! Calls take an explicit [`Session`]. Reads of the establishment, the offer
//! list and the metrics go through a [`ResponseCache`] that is cleared after
//! every write and whenever a session for another establishment uses the
//! client.

pub mod cache;
pub mod error;
pub mod session;

pub use cache::ResponseCache;
pub use error::{ClientError, ClientResult, ErrorKind};
pub use session::Session;

use crate::api::dtos::responses::{ApiListResponse, ApiResponse};
use crate::domain::models::{
    auth::AuthResponse, establishment::Establishment, offer::Offer, partner::Partner,
    stats::StatsOverview,
};
use crate::domain::services::{
    account_validation::{LoginInput, RegistrationInput},
    establishment_validation::EstablishmentInput,
    offer_validation::OfferCandidate,
};
use crate::error::FieldErrors;
use cache::{ESTABLISHMENT_KEY, METRICS_KEY, OFFERS_KEY};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct ApiErrorBody {
    error: String,
    #[serde(default)]
    fields: Option<FieldErrors>,
}

pub struct PartnerClient {
    http: Client,
    base_url: String,
    cache: ResponseCache,
}

impl PartnerClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: ResponseCache::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    // Auth

    pub async fn register(&self, input: &RegistrationInput) -> ClientResult<Session> {
        let response: ApiResponse<AuthResponse> =
            self.send(self.http.post(self.url("/api/auth/register")).json(input)).await?;
        self.cache.invalidate_all().await;
        Ok(Session::from(response.data))
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        let input = LoginInput { email: email.to_string(), password: password.to_string() };
        let response: ApiResponse<AuthResponse> =
            self.send(self.http.post(self.url("/api/auth/login")).json(&input)).await?;
        self.cache.invalidate_all().await;
        Ok(Session::from(response.data))
    }

    /// Trades the session's refresh token for a new session. The old
    /// refresh token is spent either way.
    pub async fn refresh(&self, session: &Session) -> ClientResult<Session> {
        let body = json!({ "refreshToken": session.refresh_token() });
        let response: ApiResponse<AuthResponse> =
            self.send(self.http.post(self.url("/api/auth/refresh")).json(&body)).await?;
        Ok(Session::from(response.data))
    }

    pub async fn logout(&self, session: Session) -> ClientResult<()> {
        let result: ClientResult<ApiResponse<()>> =
            self.send(self.authed(self.http.post(self.url("/api/auth/logout")), &session)).await;
        self.cache.invalidate_all().await;
        result.map(|_| ())
    }

    pub async fn me(&self, session: &Session) -> ClientResult<Partner> {
        let response: ApiResponse<Partner> =
            self.send(self.authed(self.http.get(self.url("/api/auth/me")), session)).await?;
        Ok(response.data)
    }

    // Establishment

    pub async fn establishment(&self, session: &Session) -> ClientResult<Establishment> {
        let (cached, generation) = self.cache.lookup(session.establishment_id(), ESTABLISHMENT_KEY).await;
        if let Some(cached) = cached {
            return Ok(cached);
        }
        let response: ApiResponse<Establishment> = self
            .send(self.authed(self.http.get(self.url("/api/partner/establishment")), session))
            .await?;
        self.cache.put(ESTABLISHMENT_KEY, generation, &response.data).await;
        Ok(response.data)
    }

    pub async fn update_establishment(&self, session: &Session, input: &EstablishmentInput) -> ClientResult<Establishment> {
        let request = self.http.put(self.url("/api/partner/establishment")).json(input);
        let response: ApiResponse<Establishment> = self.send(self.authed(request, session)).await?;
        self.cache.invalidate_all().await;
        Ok(response.data)
    }

    // Offers

    pub async fn offers(&self, session: &Session) -> ClientResult<Vec<Offer>> {
        let (cached, generation) = self.cache.lookup(session.establishment_id(), OFFERS_KEY).await;
        if let Some(cached) = cached {
            return Ok(cached);
        }
        let response: ApiListResponse<Offer> = self
            .send(self.authed(self.http.get(self.url("/api/partner/offers")), session))
            .await?;
        self.cache.put(OFFERS_KEY, generation, &response.data).await;
        Ok(response.data)
    }

    pub async fn offer(&self, session: &Session, offer_id: &str) -> ClientResult<Offer> {
        let path = format!("/api/partner/offers/{}", offer_id);
        let response: ApiResponse<Offer> = self.send(self.authed(self.http.get(self.url(&path)), session)).await?;
        Ok(response.data)
    }

    pub async fn create_offer(&self, session: &Session, candidate: &OfferCandidate) -> ClientResult<Offer> {
        let request = self.http.post(self.url("/api/partner/offers")).json(candidate);
        let response: ApiResponse<Offer> = self.send(self.authed(request, session)).await?;
        self.cache.invalidate_all().await;
        Ok(response.data)
    }

    /// Sends only the supplied fields; the server merges them into the stored offer.
    pub async fn update_offer(&self, session: &Session, offer_id: &str, patch: &OfferCandidate) -> ClientResult<Offer> {
        let path = format!("/api/partner/offers/{}", offer_id);
        let request = self.http.put(self.url(&path)).json(patch);
        let response: ApiResponse<Offer> = self.send(self.authed(request, session)).await?;
        self.cache.invalidate_all().await;
        Ok(response.data)
    }

    pub async fn set_offer_active(&self, session: &Session, offer_id: &str, is_active: bool) -> ClientResult<Offer> {
        let patch = OfferCandidate { is_active: Some(is_active), ..Default::default() };
        self.update_offer(session, offer_id, &patch).await
    }

    pub async fn delete_offer(&self, session: &Session, offer_id: &str) -> ClientResult<()> {
        let path = format!("/api/partner/offers/{}", offer_id);
        let _: ApiResponse<()> = self.send(self.authed(self.http.delete(self.url(&path)), session)).await?;
        self.cache.invalidate_all().await;
        Ok(())
    }

    // Metrics

    pub async fn stats_overview(&self, session: &Session) -> ClientResult<StatsOverview> {
        let (cached, generation) = self.cache.lookup(session.establishment_id(), METRICS_KEY).await;
        if let Some(cached) = cached {
            return Ok(cached);
        }
        let response: ApiResponse<StatsOverview> = self
            .send(self.authed(self.http.get(self.url("/api/partner/stats/overview")), session))
            .await?;
        self.cache.put(METRICS_KEY, generation, &response.data).await;
        Ok(response.data)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, request: RequestBuilder, session: &Session) -> RequestBuilder {
        request.bearer_auth(session.access_token())
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&text)?);
        }

        debug!(status = status.as_u16(), "Partner API call failed");
        Err(error_from_response(status, &text))
    }
}

fn error_from_response(status: StatusCode, text: &str) -> ClientError {
    let (message, fields) = match serde_json::from_str::<ApiErrorBody>(text) {
        Ok(body) => (body.error, body.fields),
        Err(_) => (text.to_string(), None),
    };

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ClientError::Validation {
            message,
            fields: fields.unwrap_or_default(),
        },
        StatusCode::UNAUTHORIZED => ClientError::SessionExpired(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::CONFLICT => ClientError::Conflict(message),
        _ => ClientError::Server { status: status.as_u16(), message },
    }
}
