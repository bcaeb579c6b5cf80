use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header::AUTHORIZATION, request::Parts},
};
use crate::state::AppState;
use crate::domain::models::auth::PartnerSession;
use crate::error::AppError;
use std::sync::Arc;
use tracing::Span;

/// The signed-in partner, taken from `Authorization: Bearer <token>`.
pub struct AuthPartner(pub PartnerSession);

impl<S> FromRequestParts<S> for AuthPartner
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let access_token = parts.headers.get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AppError::SessionExpired)?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let session = app_state.auth_service.verify(access_token)?;

        Span::current().record("partner_id", &session.partner_id);

        Ok(AuthPartner(session))
    }
}
