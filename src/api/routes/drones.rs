//! Drone Routes
//!
//! - GET /api/v1/home - Home page sections
//! - GET /api/v1/drones?view= - One drone list page
//! - GET /api/v1/drones/:serial - Drone with battery and medications
//! - POST /api/v1/drones/register - Register a drone
//! - POST /api/v1/drones/:serial/advance - Press the drone's action button
//! - POST /api/v1/drones/:serial/medications - Load a medication
//!
//! Actions answer with the operator notification. A notification of kind
//! `error` comes with 502 Bad Gateway.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{ActionResponse, AdvanceRequest, DronesQuery, RegisterRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dashboard::{
    DroneCard, DroneDetail, DroneView, HomeView, ListView, MedicationForm, Notification,
};

/// GET /api/v1/home
pub async fn home(State(state): State<Arc<AppState>>) -> Json<HomeView> {
    Json(state.dashboard.home().await)
}

/// GET /api/v1/drones
pub async fn list_drones(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DronesQuery>,
) -> ApiResult<Json<ListView<DroneCard>>> {
    let view = match query.view.as_deref() {
        Some(v) => v.parse::<DroneView>().map_err(ApiError::Validation)?,
        None => DroneView::All,
    };
    Ok(Json(state.dashboard.drones(view).await))
}

/// GET /api/v1/drones/:serial
pub async fn get_drone(
    State(state): State<Arc<AppState>>,
    Path(serial): Path<String>,
) -> ApiResult<Json<DroneDetail>> {
    state
        .dashboard
        .drone_detail(&serial)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Drone '{}' not found", serial)))
}

/// POST /api/v1/drones/register
///
/// On success the idle drones are fetched once after the follow-up delay.
pub async fn register_drone(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Response> {
    let weight_class = req.weight_class().map_err(ApiError::Validation)?;
    let outcome = state.dashboard.register(weight_class).await;

    if outcome.notification.is_success() {
        let follow_up = state.dashboard.follow_up_idle();
        tokio::spawn(async move {
            if let Some(idle) = follow_up.wait().await {
                tracing::info!("{} idle drones after registration", idle.items.len());
            }
        });
    }

    let status = action_status(&outcome.notification, StatusCode::CREATED);
    Ok((status, Json(outcome)).into_response())
}

/// POST /api/v1/drones/:serial/advance
///
/// The body is optional; without one the drone's current state is looked up.
pub async fn advance_drone(
    State(state): State<Arc<AppState>>,
    Path(serial): Path<String>,
    body: Bytes,
) -> ApiResult<Response> {
    let req = AdvanceRequest::from_body(&body).map_err(ApiError::Validation)?;

    let current = match req.state {
        Some(s) => s,
        None => {
            state
                .dashboard
                .drone(&serial)
                .await?
                .ok_or_else(|| ApiError::NotFound(format!("Drone '{}' not found", serial)))?
                .state
        }
    };

    let notification = state
        .dashboard
        .advance(&serial, &current)
        .await
        .ok_or_else(|| {
            ApiError::Validation(format!("No action for drone {} in state {}", serial, current))
        })?;

    Ok(action_response(notification, StatusCode::OK))
}

/// POST /api/v1/drones/:serial/medications
///
/// Body is the load-medication form: `{name, weight, code, img_url?}`.
pub async fn load_medication(
    State(state): State<Arc<AppState>>,
    Path(serial): Path<String>,
    Json(form): Json<MedicationForm>,
) -> ApiResult<Response> {
    let medication = form
        .into_medication()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let notification = state.dashboard.load_medication(&serial, &medication).await;
    Ok(action_response(notification, StatusCode::OK))
}

fn action_status(notification: &Notification, ok: StatusCode) -> StatusCode {
    if notification.is_success() {
        ok
    } else {
        StatusCode::BAD_GATEWAY
    }
}

fn action_response(notification: Notification, ok: StatusCode) -> Response {
    let status = action_status(&notification, ok);
    (status, Json(ActionResponse { notification })).into_response()
}
