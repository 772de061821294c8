//! On-demand sync endpoint

use axum::extract::State;
use tracing::info;

use super::state::AppState;
use super::types::{ApiError, DataResponse};

/// Run one pass and wait for its outcome
pub async fn run_sync(
    State(state): State<AppState>,
) -> Result<axum::Json<DataResponse<String>>, ApiError> {
    info!("Sync requested over HTTP");

    state.sync.trigger().await?;

    Ok(axum::Json(DataResponse::new("success".to_string())))
}
