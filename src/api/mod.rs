//! DroneDesk REST API
//!
//! HTTP surface of the operator dashboard, built with Axum.
//!
//! # Endpoints
//!
//! ## Events
//! - `GET /api/v1/events` - Event log page
//! - `POST /api/v1/events` - Append a message
//!
//! ## Drones
//! - `GET /api/v1/home` - Home page sections
//! - `GET /api/v1/drones?view=` - Drone list page
//! - `GET /api/v1/drones/:serial` - Drone detail
//! - `POST /api/v1/drones/register` - Register a drone
//! - `POST /api/v1/drones/:serial/advance` - Advance delivery state
//! - `POST /api/v1/drones/:serial/medications` - Load a medication
//!
//! ## Medications
//! - `GET /api/v1/medications` - Medication list page
//! - `GET /api/v1/medications/:id` - One medication
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health` - Full health status

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Event routes
        .route(
            "/events",
            get(routes::events::list_events).post(routes::events::record_event),
        )
        // Drone routes
        .route("/home", get(routes::drones::home))
        .route("/drones", get(routes::drones::list_drones))
        .route("/drones/register", post(routes::drones::register_drone))
        .route("/drones/:serial", get(routes::drones::get_drone))
        .route("/drones/:serial/advance", post(routes::drones::advance_drone))
        .route(
            "/drones/:serial/medications",
            post(routes::drones::load_medication),
        )
        // Medication routes
        .route("/medications", get(routes::medications::list_medications))
        .route("/medications/:id", get(routes::medications::get_medication));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.cors_origins);
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ServerConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("DroneDesk API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("DroneDesk API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::mock::{drone, MockFleet};
    use crate::dashboard::Dashboard;
    use crate::events::{EventLog, MemoryStore};
    use crate::fleet::{DroneState, Medication};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use std::time::Duration;
    use tower::util::ServiceExt;

    fn fleet() -> MockFleet {
        let mut fleet = MockFleet::with_drones(vec![
            drone("d-1", DroneState::Idle),
            drone("d-2", DroneState::Loaded),
            drone("d-3", DroneState::Delivered),
        ]);
        fleet.medications = vec![Medication {
            id: Some("m-1".to_string()),
            name: "Aspirin".to_string(),
            weight: 20.0,
            code: "ASP_01".to_string(),
            img_url: None,
        }];
        fleet
    }

    fn create_test_app(fleet: MockFleet) -> (Router, Arc<MockFleet>, Arc<EventLog>) {
        let fleet = Arc::new(fleet);
        let events = Arc::new(EventLog::new(Arc::new(MemoryStore::new())));
        let dashboard = Dashboard::new(fleet.clone(), Arc::clone(&events))
            .with_follow_up_delay(Duration::from_millis(10));
        let state = AppState::new(Arc::new(dashboard), ServerConfig::default());
        (build_router(state), fleet, events)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _, _) = create_test_app(fleet());

        let response = app.clone().oneshot(get("/health/live")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["event_store"], "memory");
        assert_eq!(body["event_key"], "eventMessages");
    }

    #[tokio::test]
    async fn test_events_seeded_then_append() {
        let (app, _, _) = create_test_app(fleet());

        let response = app.clone().oneshot(get("/api/v1/events")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["events"].as_array().unwrap().len(), 3);
        assert_eq!(body["events"][0]["message"], "Drone Alpha loaded successfully");

        let response = app
            .clone()
            .oneshot(post("/api/v1/events", r#"{"message": "Shift handover"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let event = json(response).await;
        assert_eq!(event["message"], "Shift handover");
        assert!(event["timeStamp"].is_string());

        let body = json(app.oneshot(get("/api/v1/events")).await.unwrap()).await;
        assert_eq!(body["events"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_event_message_stored_verbatim() {
        let (app, _, events) = create_test_app(fleet());

        let response = app
            .oneshot(post(
                "/api/v1/events",
                r#"{"message": "  Drone Beta dispatched\n"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(json(response).await["message"], "  Drone Beta dispatched\n");

        let stored = events.read_all().await;
        assert_eq!(stored.last().unwrap().message, "  Drone Beta dispatched\n");
    }

    #[tokio::test]
    async fn test_empty_event_rejected() {
        let (app, _, _) = create_test_app(fleet());

        let response = app
            .oneshot(post("/api/v1/events", r#"{"message": "   "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_drones_views() {
        let (app, _, events) = create_test_app(fleet());

        let body = json(app.clone().oneshot(get("/api/v1/drones")).await.unwrap()).await;
        assert_eq!(body["title"], "All Drones");
        assert_eq!(body["items"].as_array().unwrap().len(), 3);

        let body = json(
            app.clone()
                .oneshot(get("/api/v1/drones?view=loaded"))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["items"][0]["serialNumber"], "d-2");
        assert_eq!(body["items"][0]["action"], "Send for Delivery");

        let response = app.oneshot(get("/api/v1/drones?view=parked")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert_eq!(events.read_all().await.len(), 2);
    }

    #[tokio::test]
    async fn test_offline_fleet_still_renders() {
        let (app, _, _) = create_test_app(MockFleet {
            offline: true,
            ..fleet()
        });

        let response = app.clone().oneshot(get("/api/v1/home")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["sections"].as_array().unwrap().len(), 4);
        assert_eq!(body["sections"][0]["empty_message"], "No loaded drones.");

        let response = app.oneshot(get("/api/v1/drones/d-1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_drone_detail() {
        let (app, _, _) = create_test_app(fleet());

        let response = app.clone().oneshot(get("/api/v1/drones/d-1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["serialNumber"], "d-1");
        assert_eq!(body["battery_level"], 80);

        let response = app.oneshot(get("/api/v1/drones/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_advance_looks_up_state() {
        let (app, fleet, _) = create_test_app(fleet());

        let response = app
            .clone()
            .oneshot(post("/api/v1/drones/d-3/advance", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["notification"]["title"], "Drone returning to base.");
        assert_eq!(fleet.calls(), vec!["advance d-3 returnDrone"]);

        let response = app
            .oneshot(post("/api/v1/drones/d-1/advance", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rejected_action_is_bad_gateway() {
        let (app, _, _) = create_test_app(MockFleet {
            reject: Some(("DRONE_NOT_FOUND", "unknown drone")),
            ..fleet()
        });

        let response = app
            .oneshot(post(
                "/api/v1/drones/x-9/advance",
                r#"{"state": "DELIVERING"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json(response).await;
        assert_eq!(body["notification"]["kind"], "error");
        assert_eq!(body["notification"]["title"], "Deliver failed");
    }

    #[tokio::test]
    async fn test_register_and_follow_up() {
        let (app, fleet, _) = create_test_app(fleet());

        let response = app
            .clone()
            .oneshot(post("/api/v1/drones/register", r#"{"weightClass": "CRUISER_WEIGHT"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json(response).await;
        assert_eq!(body["notification"]["title"], "Drone Registered");
        assert_eq!(body["drone"]["weightClass"], "CRUISER_WEIGHT");

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(
            fleet.calls(),
            vec!["register CRUISER_WEIGHT", "list Available"]
        );

        let response = app
            .oneshot(post("/api/v1/drones/register", r#"{"weightClass": "JUMBO"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_load_medication() {
        let (app, fleet, _) = create_test_app(fleet());

        let response = app
            .clone()
            .oneshot(post(
                "/api/v1/drones/d-1/medications",
                r#"{"name": "Aspirin", "weight": 20, "code": "asp_01"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(fleet.calls(), vec!["load d-1 ASP_01"]);

        let response = app
            .oneshot(post("/api/v1/drones/d-1/medications", r#"{"weight": 20}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_load_medication_form_rules() {
        let (app, fleet, _) = create_test_app(fleet());

        for body in [
            r#"{"name": "Aspirin 100", "weight": 20, "code": "ASP"}"#,
            r#"{"name": "Aspirin", "weight": 20, "code": "ASP-01"}"#,
            r#"{"name": "Aspirin", "weight": 0, "code": "ASP"}"#,
        ] {
            let response = app
                .clone()
                .oneshot(post("/api/v1/drones/d-1/medications", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", body);
            assert_eq!(json(response).await["error"]["code"], "VALIDATION_ERROR");
        }

        assert!(fleet.calls().is_empty());
    }

    #[tokio::test]
    async fn test_medications() {
        let (app, _, _) = create_test_app(fleet());

        let body = json(app.clone().oneshot(get("/api/v1/medications")).await.unwrap()).await;
        assert_eq!(body["items"][0]["code"], "ASP_01");

        let response = app.clone().oneshot(get("/api/v1/medications/m-1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get("/api/v1/medications/m-404")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
