use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::OfferRequest;
use crate::api::dtos::responses::{ApiListResponse, ApiResponse};
use crate::api::extractors::auth::AuthPartner;
use crate::domain::models::offer::Offer;
use crate::domain::services::offer_validation::{validate_offer, OfferCandidate};
use std::sync::Arc;
use tracing::info;

pub async fn list_offers(
    State(state): State<Arc<AppState>>,
    AuthPartner(session): AuthPartner,
) -> Result<impl IntoResponse, AppError> {
    let offers = state.offer_repo.list(&session.establishment_id).await?;
    Ok(Json(ApiListResponse::from(offers)))
}

pub async fn get_offer(
    State(state): State<Arc<AppState>>,
    AuthPartner(session): AuthPartner,
    Path(offer_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let offer = find_offer(&state, &session.establishment_id, &offer_id).await?;
    Ok(Json(ApiResponse::new(offer)))
}

pub async fn create_offer(
    State(state): State<Arc<AppState>>,
    AuthPartner(session): AuthPartner,
    Json(payload): Json<OfferRequest>,
) -> Result<impl IntoResponse, AppError> {
    let draft = validate_offer(&payload)?;
    let offer = Offer::new(session.establishment_id, draft);
    let created = state.offer_repo.create(&offer).await?;

    info!("Created {} offer: {}", created.kind.type_tag(), created.id);

    Ok((StatusCode::CREATED, Json(ApiResponse::with_message(created, "Offer created"))))
}

/// Partial update: supplied fields overlay the stored offer, then the
/// result is validated as a whole.
pub async fn update_offer(
    State(state): State<Arc<AppState>>,
    AuthPartner(session): AuthPartner,
    Path(offer_id): Path<String>,
    Json(payload): Json<OfferRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut offer = find_offer(&state, &session.establishment_id, &offer_id).await?;

    let merged = OfferCandidate::from(&offer).overlay(payload);
    let draft = validate_offer(&merged)?;
    offer.apply(draft);

    let updated = state.offer_repo.update(&offer).await?;
    info!("Updated offer: {} (active: {})", updated.id, updated.is_active);

    Ok(Json(ApiResponse::with_message(updated, "Offer updated")))
}

pub async fn delete_offer(
    State(state): State<Arc<AppState>>,
    AuthPartner(session): AuthPartner,
    Path(offer_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.offer_repo.delete(&session.establishment_id, &offer_id).await?;
    info!("Deleted offer: {}", offer_id);
    Ok(Json(ApiResponse::with_message((), "Offer deleted")))
}

async fn find_offer(state: &AppState, establishment_id: &str, offer_id: &str) -> Result<Offer, AppError> {
    state.offer_repo.find_by_id(establishment_id, offer_id).await?
        .ok_or(AppError::NotFound("Offer not found".into()))
}
