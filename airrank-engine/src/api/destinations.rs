//! Destination cascade options

use axum::{extract::State, Json};

use crate::api::ApiResult;
use crate::controller::CascadeView;
use crate::AppState;

/// GET /api/destinations/options
///
/// Loads destination reference data on first use. A load failure is
/// returned as 502 and retried on the next request.
pub async fn get_destination_options(State(state): State<AppState>) -> ApiResult<Json<CascadeView>> {
    let options = state.controller.destination_options().await?;
    Ok(Json(options))
}
