//! Routing provider integration for the trip planner.
//!
//! Wraps the `OpenRouteService` directions API and reduces its response to
//! the two scalars the simulator needs: total drive hours and total miles.

use std::fmt;
use std::time::Duration;

use hos_core::Coordinate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Public `OpenRouteService` endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org";
const DIRECTIONS_PATH: &str = "/v2/directions/driving-car/geojson";
const SECONDS_PER_HOUR: f64 = 3600.0;
const MILES_PER_METER: f64 = 0.000_621_371;

/// Routing client errors.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The provided API key was invalid.
    #[error("invalid API key: {reason}")]
    InvalidApiKey { reason: &'static str },
    /// Fewer than two waypoints were supplied.
    #[error("a route needs at least two waypoints, got {0}")]
    TooFewWaypoints(usize),
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("API error: {message}")]
    Api { message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// A driving route between waypoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    /// The provider's `GeoJSON` feature, passed through for display.
    pub geometry: Value,
    pub drive_hours: f64,
    pub miles: f64,
}

/// `OpenRouteService` directions client.
///
/// # Thread Safety
///
/// The client is safe to clone and share across threads. Each clone shares
/// the underlying HTTP connection pool.
#[derive(Clone)]
pub struct RouteClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for RouteClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl RouteClient {
    /// Creates a new client with the given API key against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or whitespace-only, or if
    /// the HTTP client fails to build.
    pub fn new(api_key: impl Into<String>, base_url: &str) -> Result<Self, RouteError> {
        let api_key = api_key.into();

        if api_key.is_empty() {
            return Err(RouteError::InvalidApiKey {
                reason: "API key cannot be empty",
            });
        }
        if api_key.trim().is_empty() {
            return Err(RouteError::InvalidApiKey {
                reason: "API key cannot be whitespace-only",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(RouteError::ClientBuild)?;

        Ok(Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the driving route through `waypoints` in order.
    pub async fn directions(&self, waypoints: &[Coordinate]) -> Result<Route, RouteError> {
        if waypoints.len() < 2 {
            return Err(RouteError::TooFewWaypoints(waypoints.len()));
        }

        let request = DirectionsRequest::from_waypoints(waypoints);
        let url = format!("{}{DIRECTIONS_PATH}", self.base_url);
        tracing::debug!(%url, waypoints = waypoints.len(), "requesting route");

        let response = self
            .http
            .post(&url)
            .header("Authorization", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(parse_api_error(&body).unwrap_or_else(|| RouteError::Api {
                message: format!("status {status}: {body}"),
            }));
        }

        let route = parse_route(&body)?;
        tracing::debug!(
            drive_hours = route.drive_hours,
            miles = route.miles,
            "route received"
        );
        Ok(route)
    }
}

/// ORS expects `[lng, lat]` pairs.
#[derive(Debug, Serialize)]
struct DirectionsRequest {
    coordinates: Vec<[f64; 2]>,
}

impl DirectionsRequest {
    fn from_waypoints(waypoints: &[Coordinate]) -> Self {
        Self {
            coordinates: waypoints.iter().map(|c| [c.lng(), c.lat()]).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RouteSummary {
    /// Seconds.
    duration: f64,
    /// Meters.
    distance: f64,
}

fn parse_route(body: &str) -> Result<Route, RouteError> {
    let collection: FeatureCollection =
        serde_json::from_str(body).map_err(|err| RouteError::InvalidResponse(err.to_string()))?;
    let Some(feature) = collection.features.into_iter().next() else {
        return Err(RouteError::InvalidResponse(
            "response contains no route features".to_string(),
        ));
    };

    let summary = feature
        .pointer("/properties/summary")
        .cloned()
        .ok_or_else(|| RouteError::InvalidResponse("missing route summary".to_string()))?;
    let summary: RouteSummary = serde_json::from_value(summary)
        .map_err(|err| RouteError::InvalidResponse(err.to_string()))?;

    Ok(Route {
        drive_hours: summary.duration / SECONDS_PER_HOUR,
        miles: summary.distance * MILES_PER_METER,
        geometry: feature,
    })
}

fn parse_api_error(body: &str) -> Option<RouteError> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        error: ErrorDetails,
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ErrorDetails {
        Message { message: String },
        Text(String),
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| RouteError::Api {
            message: match payload.error {
                ErrorDetails::Message { message } | ErrorDetails::Text(message) => message,
            },
        })
}
