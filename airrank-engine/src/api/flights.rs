//! Airline drill-down

use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::ApiResult;
use crate::controller::AirlineDetail;
use crate::AppState;

/// GET /api/airlines/:code/flights
///
/// Per-flight rows for one airline under the current date range and flight
/// type, each with its display status label.
pub async fn get_airline_flights(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<AirlineDetail>> {
    let detail = state.controller.airline_flights(&code).await?;
    Ok(Json(detail))
}
