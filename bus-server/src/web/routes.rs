//! HTTP route handlers.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Local;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, warn};

use crate::bods::{FeedError, VehicleActivity};
use crate::config::MAX_WINDOW_MINS;
use crate::domain::{BoundingBox, Departure, Journey, JourneyCriteria, RunDays, ScheduleTime, Stop};
use crate::live::LiveFeedError;
use crate::schedule::{self, ScheduleError, StorageError};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/live", get(live_vehicles))
        .route("/journeys/block", get(block_by_criteria))
        .route("/journeys/block/:block_ref", get(block_by_ref))
        .route("/stops/nearest", get(nearest_stop))
        .route("/stops/:atco_code/departures", get(stop_departures))
        .route("/routes/:route/stops", get(route_stops))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> &'static str {
    "Welcome to the busbuddy server"
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Unwrap a query string, reporting bad ones in the JSON error shape.
fn query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(q)| q)
        .map_err(|rejection| AppError::BadRequest {
            message: rejection.body_text(),
        })
}

fn run_days(raw: &str) -> Result<RunDays, AppError> {
    RunDays::parse(raw).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })
}

/// Live vehicle positions inside a bounding box.
async fn live_vehicles(
    State(state): State<AppState>,
    req: Result<Query<LiveQuery>, QueryRejection>,
) -> Result<Json<Vec<VehicleActivity>>, AppError> {
    let req = query(req)?;
    let bbox = resolve_bbox(req.bbox.as_deref(), state.config.default_bbox)?;

    let vehicles = state.live.fetch(&bbox, Instant::now()).await?;
    Ok(Json(vehicles))
}

fn resolve_bbox(raw: Option<&str>, default: BoundingBox) -> Result<BoundingBox, AppError> {
    match raw {
        Some(raw) => BoundingBox::parse(raw).map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// Every journey in the block of the journey matching the criteria.
async fn block_by_criteria(
    State(state): State<AppState>,
    req: Result<Query<BlockQuery>, QueryRejection>,
) -> Result<Json<Vec<Journey>>, AppError> {
    let req = query(req)?;
    let criteria = JourneyCriteria {
        route: req.route,
        departure_time: req.departure_time,
        direction: req.direction,
        run_days: run_days(&req.run_days)?,
    };

    let journeys = schedule::find_by_criteria(state.schedule.as_ref(), &criteria).await?;
    Ok(Json(journeys))
}

/// Every journey in a block.
async fn block_by_ref(
    State(state): State<AppState>,
    Path(block_ref): Path<String>,
) -> Result<Json<Vec<Journey>>, AppError> {
    let journeys = schedule::find_by_block_ref(state.schedule.as_ref(), &block_ref).await?;
    Ok(Json(journeys))
}

/// The stop closest to a coordinate.
async fn nearest_stop(
    State(state): State<AppState>,
    req: Result<Query<NearestQuery>, QueryRejection>,
) -> Result<Json<Stop>, AppError> {
    let NearestQuery { lat, lon } = query(req)?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(AppError::BadRequest {
            message: format!("Invalid coordinate: {lat},{lon}"),
        });
    }

    let stop = schedule::nearest_stop(
        state.schedule.as_ref(),
        lat,
        lon,
        state.config.nearest_candidates,
    )
    .await?;
    Ok(Json(stop))
}

/// Departures from a stop in the coming window.
async fn stop_departures(
    State(state): State<AppState>,
    Path(atco_code): Path<String>,
    req: Result<Query<DeparturesQuery>, QueryRejection>,
) -> Result<Json<Vec<Departure>>, AppError> {
    let req = query(req)?;
    let run_days = run_days(&req.run_days)?;
    let window_mins = window_mins(req.window_mins, state.config.departure_window_mins)?;

    let now = match req.time.as_deref() {
        Some(t) => ScheduleTime::parse(t).map_err(|e| AppError::BadRequest {
            message: format!("Invalid time {t:?}: {e}"),
        })?,
        None => ScheduleTime::from(Local::now().time()),
    };

    let departures = schedule::upcoming_departures(
        state.schedule.as_ref(),
        &atco_code,
        &run_days,
        now,
        window_mins,
    )
    .await?;
    Ok(Json(departures))
}

fn window_mins(requested: Option<u32>, default: u32) -> Result<u32, AppError> {
    match requested {
        None => Ok(default),
        Some(mins) if (1..=MAX_WINDOW_MINS).contains(&mins) => Ok(mins),
        Some(mins) => Err(AppError::BadRequest {
            message: format!("window_mins must be 1-{MAX_WINDOW_MINS}, got {mins}"),
        }),
    }
}

/// Distinct stops served by a route.
async fn route_stops(
    State(state): State<AppState>,
    Path(route): Path<String>,
) -> Result<Json<Vec<Stop>>, AppError> {
    let stops = schedule::stops_for_route(state.schedule.as_ref(), &route).await?;
    Ok(Json(stops))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    /// Live feed throttled; come back after this many seconds.
    RetryLater { retry_after_secs: u64 },
    /// Vehicle feed failure. `detail` is logged, never sent.
    Upstream { detail: String },
    /// Storage failure. `detail` is logged, never sent.
    Internal { code: Option<String>, detail: String },
}

impl From<FeedError> for AppError {
    fn from(e: FeedError) -> Self {
        AppError::Upstream {
            detail: e.to_string(),
        }
    }
}

impl From<LiveFeedError> for AppError {
    fn from(e: LiveFeedError) -> Self {
        match e {
            LiveFeedError::Rejected { retry_after_secs } => AppError::RetryLater { retry_after_secs },
            LiveFeedError::Upstream(e) => e.into(),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        let detail = match &e {
            StorageError::Query { message, .. } => format!("{e}: {message}"),
            _ => e.to_string(),
        };
        AppError::Internal {
            code: e.code().map(str::to_string),
            detail,
        }
    }
}

impl From<ScheduleError> for AppError {
    fn from(e: ScheduleError) -> Self {
        match e {
            ScheduleError::InvalidTimeFormat(message) => AppError::BadRequest {
                message: format!("Invalid time format: {message}"),
            },
            ScheduleError::NoStopsAvailable => AppError::NotFound {
                message: "No stops available".into(),
            },
            ScheduleError::Storage(e) => e.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest { message } => {
                debug!(%message, "bad request");
                error_body(StatusCode::BAD_REQUEST, message, None)
            }
            AppError::NotFound { message } => error_body(StatusCode::NOT_FOUND, message, None),
            AppError::RetryLater { retry_after_secs } => (
                [(header::RETRY_AFTER, retry_after_secs.to_string())],
                error_body(
                    StatusCode::SERVICE_UNAVAILABLE,
                    format!("Please retry in {retry_after_secs} seconds."),
                    None,
                ),
            )
                .into_response(),
            AppError::Upstream { detail } => {
                warn!(%detail, "vehicle feed unavailable");
                error_body(
                    StatusCode::BAD_GATEWAY,
                    "Vehicle feed unavailable".into(),
                    None,
                )
            }
            AppError::Internal { code, detail } => {
                error!(%detail, code = code.as_deref(), "storage failure");
                error_body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                    code,
                )
            }
        }
    }
}

fn error_body(status: StatusCode, error: String, code: Option<String>) -> Response {
    (status, Json(ErrorResponse { error, code })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bods::{FeedSource, MockFeed};
    use crate::config::ServerConfig;
    use crate::live::{FeedGate, LiveFeed};
    use crate::schedule::{MemoryScheduleStore, ScheduleSource};
    use axum::body::to_bytes;

    /// Serve the full router over the bundled fixtures on a local port.
    async fn spawn_app() -> String {
        let fixtures = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");
        let config = ServerConfig::from_lookup(|name| match name {
            "SCHEDULE_FIXTURE" => Some(format!("{fixtures}/schedule.json")),
            "BODS_MOCK_FILE" => Some(format!("{fixtures}/vehicles.json")),
            _ => None,
        })
        .unwrap();

        let feed = FeedSource::Mock(MockFeed::from_file(format!("{fixtures}/vehicles.json")).unwrap());
        let schedule = ScheduleSource::Memory(
            MemoryScheduleStore::from_file(format!("{fixtures}/schedule.json")).unwrap(),
        );
        let live = LiveFeed::new(FeedGate::new(config.feed_interval), feed);
        let app = create_router(AppState::new(live, schedule, config));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn router_serves_requests_end_to_end() {
        let base = spawn_app().await;
        let http = reqwest::Client::new();

        let health = http.get(format!("{base}/health")).send().await.unwrap();
        assert_eq!(health.status(), reqwest::StatusCode::OK);
        assert_eq!(health.text().await.unwrap(), "ok");

        let bad = http.get(format!("{base}/stops/nearest?lat=abc&lon=-1.4")).send().await.unwrap();
        assert_eq!(bad.status(), reqwest::StatusCode::BAD_REQUEST);
        let json: serde_json::Value = bad.json().await.unwrap();
        assert!(json["error"].is_string());

        let block: serde_json::Value = http
            .get(format!(
                "{base}/journeys/block?route=U1&departure_time=8:00&direction=outbound&run_days=Mo,Tu,We,Th,Fr"
            ))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(block.as_array().unwrap().len(), 2);

        let live = http.get(format!("{base}/live")).send().await.unwrap();
        assert_eq!(live.status(), reqwest::StatusCode::OK);
        let vehicles: serde_json::Value = live.json().await.unwrap();
        assert_eq!(vehicles[0]["MonitoredVehicleJourney"]["LineRef"], "U1");

        let throttled = http.get(format!("{base}/live")).send().await.unwrap();
        assert_eq!(throttled.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);
        assert!(throttled.headers().contains_key(reqwest::header::RETRY_AFTER));
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn rejected_is_503_with_retry_after() {
        let response = AppError::from(LiveFeedError::Rejected { retry_after_secs: 3 }).into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()[header::RETRY_AFTER], "3");
        let json = body_json(response).await;
        assert_eq!(json["error"], "Please retry in 3 seconds.");
    }

    #[tokio::test]
    async fn upstream_failure_hides_detail() {
        let response = AppError::from(LiveFeedError::Upstream(FeedError::Api {
            status: 500,
            message: "stack trace here".into(),
        }))
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert!(!json["error"].as_str().unwrap().contains("stack trace"));
    }

    #[tokio::test]
    async fn storage_failure_exposes_code_not_message() {
        let err = StorageError::Query {
            code: Some("42P01".into()),
            routine: None,
            message: "relation \"journeys\" does not exist".into(),
        };
        let response = AppError::from(ScheduleError::Storage(err)).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["code"], "42P01");
        assert!(!json["error"].as_str().unwrap().contains("relation"));
    }

    #[tokio::test]
    async fn schedule_errors_map_to_client_statuses() {
        let response = AppError::from(ScheduleError::InvalidTimeFormat("8am".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await.get("code").is_none());

        let response = AppError::from(ScheduleError::NoStopsAvailable).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn bbox_defaults_when_absent() {
        let default = BoundingBox::SOUTHAMPTON;
        assert_eq!(resolve_bbox(None, default).unwrap(), default);

        let parsed = resolve_bbox(Some("-2,51,-1,52"), default).unwrap();
        assert_eq!(parsed.min_lon(), -2.0);

        assert!(matches!(
            resolve_bbox(Some("1,2,3"), default),
            Err(AppError::BadRequest { .. })
        ));
    }

    #[test]
    fn window_is_bounded() {
        assert_eq!(window_mins(None, 30).unwrap(), 30);
        assert_eq!(window_mins(Some(240), 30).unwrap(), 240);
        assert!(window_mins(Some(0), 30).is_err());
        assert!(window_mins(Some(241), 30).is_err());
    }
}
