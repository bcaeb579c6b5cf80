use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tokio::time::sleep;
use tracing::{error, info, info_span, Instrument};
use crate::state::AppState;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Periodically drops refresh tokens that can no longer be redeemed.
pub async fn start_background_worker(state: Arc<AppState>) {
    info!("Starting refresh token sweeper...");

    loop {
        let span = info_span!("refresh_token_sweep");
        async {
            match state.auth_repo.delete_expired(Utc::now()).await {
                Ok(0) => {}
                Ok(removed) => info!(removed, "Expired refresh tokens removed"),
                Err(e) => error!("Failed to sweep refresh tokens: {:?}", e),
            }
        }
            .instrument(span)
            .await;

        sleep(SWEEP_INTERVAL).await;
    }
}
