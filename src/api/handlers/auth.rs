use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::{LoginRequest, RefreshRequest, RegisterRequest};
use crate::api::dtos::responses::ApiResponse;
use crate::api::extractors::auth::AuthPartner;
use crate::domain::models::{auth::AuthResponse, establishment::Establishment, partner::Partner};
use crate::domain::services::account_validation::{validate_login, validate_registration};
use crate::domain::services::opening_hours::default_table;
use std::sync::Arc;
use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use tracing::info;

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_registration(&payload)?;
    let email = normalize_email(&payload.email);

    if state.partner_repo.find_by_email(&email).await?.is_some() {
        return Err(account_exists());
    }

    let salt = SaltString::generate(&mut rand::thread_rng());
    let password_hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal)?
        .to_string();

    let establishment = Establishment::new(
        payload.establishment_name.trim().to_string(),
        email.clone(),
        default_table(),
    );
    let partner = Partner::new(
        email,
        password_hash,
        payload.first_name.trim().to_string(),
        payload.last_name.trim().to_string(),
        establishment.id.clone(),
    );

    // A concurrent registration can win between the lookup above and this write.
    let partner = state.partner_repo.create_account(&establishment, &partner).await
        .map_err(|e| if e.is_unique_violation() { account_exists() } else { e })?;
    let tokens = state.auth_service.login(&partner).await?;

    info!("Partner registered: {} for establishment {}", partner.id, partner.establishment_id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(AuthResponse { user: partner, tokens }, "Account created")),
    ))
}

fn account_exists() -> AppError {
    AppError::Conflict("An account already exists for this email".into())
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_login(&payload)?;

    let partner = state.partner_repo.find_by_email(&normalize_email(&payload.email)).await?
        .ok_or(AppError::InvalidCredentials)?;

    let parsed_hash = PasswordHash::new(&partner.password_hash)
        .map_err(|_| AppError::Internal)?;

    Argon2::default().verify_password(payload.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::InvalidCredentials)?;

    let tokens = state.auth_service.login(&partner).await?;

    info!("Partner logged in: {}", partner.id);

    Ok(Json(ApiResponse::new(AuthResponse { user: partner, tokens })))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RefreshRequest>,
) -> Result<impl IntoResponse, AppError> {
    let previous = state.auth_service.refresh(&payload.refresh_token).await?;

    let partner = state.partner_repo.find_by_id(&previous.partner_id).await?
        .ok_or(AppError::SessionExpired)?;

    let tokens = state.auth_service.reissue(&partner, &previous).await?;

    info!("Token refreshed for partner: {}", partner.id);

    Ok(Json(ApiResponse::new(AuthResponse { user: partner, tokens })))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    AuthPartner(session): AuthPartner,
) -> Result<impl IntoResponse, AppError> {
    state.auth_service.logout(&session.partner_id).await?;

    info!("Partner logged out: {}", session.partner_id);

    Ok(Json(ApiResponse::with_message((), "Signed out")))
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthPartner(session): AuthPartner,
) -> Result<impl IntoResponse, AppError> {
    let partner = state.partner_repo.find_by_id(&session.partner_id).await?
        .ok_or(AppError::SessionExpired)?;

    Ok(Json(ApiResponse::new(partner)))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
