use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::UpdateEstablishmentRequest;
use crate::api::dtos::responses::ApiResponse;
use crate::api::extractors::auth::AuthPartner;
use crate::domain::services::establishment_validation::validate_establishment;
use std::sync::Arc;
use tracing::info;

pub async fn get_establishment(
    State(state): State<Arc<AppState>>,
    AuthPartner(session): AuthPartner,
) -> Result<impl IntoResponse, AppError> {
    let establishment = state.establishment_repo.find_by_id(&session.establishment_id).await?
        .ok_or(AppError::NotFound("Establishment not found".into()))?;

    Ok(Json(ApiResponse::new(establishment)))
}

/// Full replacement of the editable profile. Identity and `createdAt` are kept.
pub async fn update_establishment(
    State(state): State<Arc<AppState>>,
    AuthPartner(session): AuthPartner,
    Json(payload): Json<UpdateEstablishmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let profile = validate_establishment(payload)?;

    let mut establishment = state.establishment_repo.find_by_id(&session.establishment_id).await?
        .ok_or(AppError::NotFound("Establishment not found".into()))?;

    establishment.name = profile.name;
    establishment.description = profile.description;
    establishment.phone = profile.phone;
    establishment.email = profile.email;
    establishment.address = profile.address;
    establishment.opening_hours = profile.opening_hours;
    establishment.photos = profile.photos;
    establishment.updated_at = Utc::now();

    let updated = state.establishment_repo.update(&establishment).await?;
    info!("Updated establishment: {}", updated.id);

    Ok(Json(ApiResponse::with_message(updated, "Establishment updated")))
}
