//! Fleet Service REST Client
//!
//! HTTP client for the fleet service that owns drone state. Every call is
//! a single request: no retries, no backoff.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::fleet::error::{FleetError, FleetResult};
use crate::fleet::types::{
    Drone, DroneListing, Medication, RegisterDroneRequest, ServiceError, Transition, WeightClass,
};
use crate::fleet::FleetApi;

/// Configuration for the fleet client
#[derive(Debug, Clone)]
pub struct FleetConfig {
    /// Base URL including the API prefix (e.g., "http://localhost:8080/api/v1")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/v1".to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

/// REST client for the fleet service
#[derive(Debug, Clone)]
pub struct FleetClient {
    client: Client,
    config: FleetConfig,
}

impl FleetClient {
    /// Create a client with the given configuration
    pub fn new(config: FleetConfig) -> FleetResult<Self> {
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(FleetError::Config(format!(
                "base URL must start with http:// or https://: {}",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        let config = FleetConfig {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            ..config
        };

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &FleetConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn drone_url(&self, serial_number: &str, suffix: &str) -> String {
        self.url(&format!(
            "/drones/{}{}",
            urlencoding::encode(serial_number),
            suffix
        ))
    }

    /// Send a request and turn non-success statuses into `FleetError::Api`
    async fn send(&self, request: RequestBuilder) -> FleetResult<Response> {
        let response = request.send().await.map_err(|e| self.classify(e))?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();

        let (code, message) = match serde_json::from_str::<ServiceError>(&text) {
            Ok(body) => (body.code, body.message.unwrap_or_default()),
            Err(_) => (None, text),
        };

        Err(FleetError::Api {
            status,
            code,
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> FleetResult<T> {
        tracing::debug!("GET {}", url);
        let response = self.send(self.client.get(&url)).await?;
        let body = response.text().await.map_err(|e| self.classify(e))?;
        serde_json::from_str(&body).map_err(|e| FleetError::Decode(format!("{}: {}", url, e)))
    }

    fn classify(&self, e: reqwest::Error) -> FleetError {
        if e.is_timeout() {
            FleetError::Timeout
        } else if e.is_connect() {
            FleetError::Unavailable(self.config.base_url.clone())
        } else {
            FleetError::Request(e)
        }
    }
}

#[async_trait]
impl FleetApi for FleetClient {
    async fn list_drones(&self, listing: DroneListing) -> FleetResult<Vec<Drone>> {
        let url = self.url(&format!("/drones{}", listing.path()));
        let drones: Option<Vec<Drone>> = self.get_json(url).await?;
        Ok(drones.unwrap_or_default())
    }

    async fn get_drone(&self, serial_number: &str) -> FleetResult<Option<Drone>> {
        self.get_json(self.drone_url(serial_number, "")).await
    }

    async fn drone_medications(&self, serial_number: &str) -> FleetResult<Vec<Medication>> {
        let meds: Option<Vec<Medication>> = self
            .get_json(self.drone_url(serial_number, "/medications"))
            .await?;
        Ok(meds.unwrap_or_default())
    }

    async fn battery_level(&self, serial_number: &str) -> FleetResult<u32> {
        self.get_json(self.drone_url(serial_number, "/battery")).await
    }

    async fn list_medications(&self) -> FleetResult<Vec<Medication>> {
        let meds: Option<Vec<Medication>> = self.get_json(self.url("/medications")).await?;
        Ok(meds.unwrap_or_default())
    }

    async fn get_medication(&self, id: &str) -> FleetResult<Option<Medication>> {
        self.get_json(self.url(&format!("/medications/{}", urlencoding::encode(id))))
            .await
    }

    async fn register_drone(&self, weight_class: WeightClass) -> FleetResult<Option<Drone>> {
        let url = self.url("/drones/register");
        tracing::debug!("POST {}", url);

        let response = self
            .send(
                self.client
                    .post(&url)
                    .json(&RegisterDroneRequest { weight_class }),
            )
            .await?;

        // The service may answer with an empty body
        let body = response.text().await.map_err(|e| self.classify(e))?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&body).map_err(|e| FleetError::Decode(format!("{}: {}", url, e)))
    }

    async fn load_medication(&self, serial_number: &str, medication: &Medication) -> FleetResult<()> {
        let url = self.drone_url(serial_number, "/loadMeds");
        tracing::debug!("POST {}", url);
        self.send(self.client.post(&url).json(medication)).await?;
        Ok(())
    }

    async fn advance(&self, serial_number: &str, transition: Transition) -> FleetResult<()> {
        let url = self.drone_url(serial_number, &format!("/{}", transition.path()));
        tracing::debug!("PATCH {}", url);
        self.send(self.client.patch(&url)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::types::DroneState;
    use axum::{
        extract::Path,
        http::StatusCode,
        routing::{get, patch, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    fn drone_json(serial: &str, state: &str) -> Value {
        json!({
            "serialNumber": serial,
            "weightClass": "HEAVY_WEIGHT",
            "weightLimit": 500.0,
            "batteryCapacity": 100,
            "state": state,
            "loadedMeds": []
        })
    }

    /// Minimal stand-in for the fleet service
    async fn spawn_fleet_stub() -> FleetClient {
        let app = Router::new()
            .route(
                "/api/v1/drones",
                get(|| async {
                    Json(json!([drone_json("d-1", "IDLE"), drone_json("d-2", "LOADED")]))
                }),
            )
            .route(
                "/api/v1/drones/loaded",
                get(|| async { Json(json!([drone_json("d-2", "LOADED")])) }),
            )
            .route("/api/v1/drones/returning", get(|| async { Json(Value::Null) }))
            .route(
                "/api/v1/drones/register",
                post(|Json(body): Json<Value>| async move {
                    let mut drone = drone_json("d-new", "IDLE");
                    drone["weightClass"] = body["weightClass"].clone();
                    (StatusCode::CREATED, Json(drone))
                }),
            )
            .route(
                "/api/v1/drones/:serial",
                get(|Path(serial): Path<String>| async move {
                    if serial == "d-1" {
                        Json(drone_json("d-1", "IDLE"))
                    } else {
                        Json(Value::Null)
                    }
                }),
            )
            .route(
                "/api/v1/drones/:serial/battery",
                get(|| async { Json(json!(85)) }),
            )
            .route(
                "/api/v1/drones/:serial/loadMeds",
                post(|Path(serial): Path<String>, Json(med): Json<Value>| async move {
                    if med["weight"].as_f64().unwrap_or(0.0) > 500.0 {
                        (
                            StatusCode::BAD_REQUEST,
                            Json(json!({"code": "DRONE_WEIGHT_LIMIT", "message": format!("Drone {} is over its weight limit", serial)})),
                        )
                    } else {
                        (StatusCode::ACCEPTED, Json(Value::Null))
                    }
                }),
            )
            .route(
                "/api/v1/drones/:serial/setForDelivery",
                patch(|Path(serial): Path<String>| async move {
                    if serial == "d-2" {
                        StatusCode::ACCEPTED
                    } else {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                }),
            )
            .route(
                "/api/v1/medications",
                get(|| async {
                    Json(json!([{"id": "m-1", "name": "Aspirin", "weight": 12.5, "code": "ASP_01", "img_url": null}]))
                }),
            )
            .route("/api/v1/broken", get(|| async { "not json" }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        FleetClient::new(FleetConfig {
            base_url: format!("http://{}/api/v1/", addr),
            request_timeout_ms: 5_000,
        })
        .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = FleetConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080/api/v1");
        assert_eq!(config.request_timeout_ms, 30_000);
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let err = FleetClient::new(FleetConfig {
            base_url: "localhost:8080".to_string(),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, FleetError::Config(_)));
    }

    #[test]
    fn test_drone_url_encodes_serial() {
        let client = FleetClient::new(FleetConfig::default()).unwrap();
        assert_eq!(
            client.drone_url("a b/c", "/battery"),
            "http://localhost:8080/api/v1/drones/a%20b%2Fc/battery"
        );
    }

    #[tokio::test]
    async fn test_list_drones() {
        let client = spawn_fleet_stub().await;

        let all = client.list_drones(DroneListing::All).await.unwrap();
        assert_eq!(all.len(), 2);

        let loaded = client.list_drones(DroneListing::Loaded).await.unwrap();
        assert_eq!(loaded[0].state, DroneState::Loaded);

        // null body reads as an empty list
        let returning = client.list_drones(DroneListing::Returning).await.unwrap();
        assert!(returning.is_empty());
    }

    #[tokio::test]
    async fn test_missing_endpoint_is_api_error() {
        let client = spawn_fleet_stub().await;
        let err = client.get_medication("m-1").await.unwrap_err();
        assert!(matches!(err, FleetError::Api { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_get_drone_and_battery() {
        let client = spawn_fleet_stub().await;

        let drone = client.get_drone("d-1").await.unwrap().unwrap();
        assert_eq!(drone.serial_number, "d-1");
        assert!(client.get_drone("nope").await.unwrap().is_none());
        assert_eq!(client.battery_level("d-1").await.unwrap(), 85);
    }

    #[tokio::test]
    async fn test_register_drone() {
        let client = spawn_fleet_stub().await;
        let drone = client
            .register_drone(WeightClass::CruiserWeight)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(drone.weight_class, Some(WeightClass::CruiserWeight));
    }

    #[tokio::test]
    async fn test_load_medication_rejection_carries_code() {
        let client = spawn_fleet_stub().await;

        let light = Medication {
            name: "Aspirin".to_string(),
            weight: 12.5,
            code: "ASP_01".to_string(),
            ..Default::default()
        };
        client.load_medication("d-1", &light).await.unwrap();

        let heavy = Medication {
            weight: 900.0,
            ..light
        };
        let err = client.load_medication("d-1", &heavy).await.unwrap_err();
        assert_eq!(err.code(), Some("DRONE_WEIGHT_LIMIT"));
        assert_eq!(err.user_message(), "Drone d-1 is over its weight limit");
    }

    #[tokio::test]
    async fn test_advance_checks_status() {
        let client = spawn_fleet_stub().await;

        client.advance("d-2", Transition::SetForDelivery).await.unwrap();
        let err = client
            .advance("d-1", Transition::SetForDelivery)
            .await
            .unwrap_err();
        assert!(matches!(err, FleetError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_list_medications() {
        let client = spawn_fleet_stub().await;
        let meds = client.list_medications().await.unwrap();
        assert_eq!(meds.len(), 1);
        assert_eq!(meds[0].code, "ASP_01");
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let client = spawn_fleet_stub().await;
        let err = client
            .get_json::<Vec<Drone>>(client.url("/broken"))
            .await
            .unwrap_err();
        assert!(matches!(err, FleetError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        // Bind then drop to get a port nothing listens on
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = FleetClient::new(FleetConfig {
            base_url: format!("http://127.0.0.1:{}/api/v1", port),
            request_timeout_ms: 2_000,
        })
        .unwrap();

        let err = client.list_medications().await.unwrap_err();
        assert!(matches!(err, FleetError::Unavailable(_)));
    }
}
