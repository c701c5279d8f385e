//! Medication Routes
//!
//! - GET /api/v1/medications - All saved medications
//! - GET /api/v1/medications/:id - One medication

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dashboard::ListView;
use crate::fleet::Medication;

/// GET /api/v1/medications
pub async fn list_medications(State(state): State<Arc<AppState>>) -> Json<ListView<Medication>> {
    Json(state.dashboard.medications().await)
}

/// GET /api/v1/medications/:id
pub async fn get_medication(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Medication>> {
    state
        .dashboard
        .medication(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Medication '{}' not found", id)))
}
