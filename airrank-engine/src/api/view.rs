//! Current ranking view

use axum::{extract::State, Json};

use crate::controller::RankingView;
use crate::AppState;

/// GET /api/view
///
/// Ranked rows, summary, sort/filter state and cascade options as of now.
pub async fn get_view(State(state): State<AppState>) -> Json<RankingView> {
    Json(state.controller.view().await)
}
