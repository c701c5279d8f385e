//! Event Routes
//!
//! - GET /api/v1/events - The event log page (seeds an empty log)
//! - POST /api/v1/events - Append a message

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::RecordEventRequest;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dashboard::EventsView;
use crate::events::Event;

/// GET /api/v1/events
pub async fn list_events(State(state): State<Arc<AppState>>) -> Json<EventsView> {
    Json(state.dashboard.events().await)
}

/// POST /api/v1/events
///
/// Unlike dashboard-generated events, a failed append is reported to the
/// caller.
pub async fn record_event(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecordEventRequest>,
) -> ApiResult<(StatusCode, Json<Event>)> {
    if req.message.trim().is_empty() {
        return Err(ApiError::Validation("message cannot be empty".to_string()));
    }

    // Stored verbatim, surrounding whitespace included
    let event = state.dashboard.event_log().try_append(req.message).await?;
    Ok((StatusCode::CREATED, Json(event)))
}
