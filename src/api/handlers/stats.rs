use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::responses::ApiResponse;
use crate::api::extractors::auth::AuthPartner;
use crate::domain::models::stats::VisitorCounters;
use crate::domain::services::metrics::summarize;
use std::sync::Arc;

pub async fn get_overview(
    State(state): State<Arc<AppState>>,
    AuthPartner(session): AuthPartner,
) -> Result<impl IntoResponse, AppError> {
    let counters = state.stats_repo.find(&session.establishment_id).await?
        .unwrap_or_else(VisitorCounters::empty);
    let offers = state.offer_repo.list(&session.establishment_id).await?;

    Ok(Json(ApiResponse::new(summarize(counters, &offers))))
}
