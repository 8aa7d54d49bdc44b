//! Server configuration from the environment.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;
use std::time::Duration;

use crate::bods::BodsConfig;
use crate::domain::BoundingBox;
use crate::schedule::{DEFAULT_CANDIDATES, DEFAULT_WINDOW_MINS, PgStoreConfig};

/// Default listen address.
pub const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 3000));

/// Default live-feed area.
pub const DEFAULT_BBOX: BoundingBox = BoundingBox::SOUTHAMPTON;

/// Default upstream request timeout in seconds.
pub const DEFAULT_BODS_TIMEOUT_SECS: u64 = 10;

/// Default maximum pooled database connections.
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;

/// Default minimum gap between upstream fetches.
const DEFAULT_INTERVAL_MS: u64 = 5000;

/// Largest departure window a client may ask for, in minutes.
pub const MAX_WINDOW_MINS: u32 = 240;

/// Error loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name}: invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("no schedule data: set DATABASE_URL or SCHEDULE_FIXTURE")]
    NoScheduleSource,
}

/// Where live vehicle data comes from.
#[derive(Debug, Clone)]
pub enum FeedConfig {
    Bods(BodsConfig),
    Mock(PathBuf),
}

/// Where schedule data comes from.
#[derive(Debug, Clone)]
pub enum ScheduleConfig {
    Postgres(PgStoreConfig),
    Fixture(PathBuf),
}

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub feed: FeedConfig,
    pub feed_interval: Duration,
    /// Area used when a live request names none
    pub default_bbox: BoundingBox,
    pub schedule: ScheduleConfig,
    pub departure_window_mins: u32,
    /// Stops fetched from the store before nearest-stop re-ranking
    pub nearest_candidates: u32,
}

impl ServerConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to read variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let feed = match var("BODS_MOCK_FILE") {
            Some(path) => FeedConfig::Mock(PathBuf::from(path)),
            None => {
                let api_key = var("BODS_API_KEY").unwrap_or_else(|| {
                    tracing::warn!("BODS_API_KEY not set, live requests will fail");
                    String::new()
                });
                let mut bods = BodsConfig::new(api_key).with_timeout(parse_or(
                    &var,
                    "BODS_TIMEOUT_SECS",
                    DEFAULT_BODS_TIMEOUT_SECS,
                )?);
                if let Some(url) = var("BODS_BASE_URL") {
                    bods = bods.with_base_url(url);
                }
                FeedConfig::Bods(bods)
            }
        };

        let schedule = match (var("SCHEDULE_FIXTURE"), var("DATABASE_URL")) {
            (Some(path), _) => ScheduleConfig::Fixture(PathBuf::from(path)),
            (None, Some(url)) => ScheduleConfig::Postgres(PgStoreConfig::new(url).with_max_connections(
                parse_or(&var, "DATABASE_MAX_CONNECTIONS", DEFAULT_DATABASE_MAX_CONNECTIONS)?,
            )),
            (None, None) => return Err(ConfigError::NoScheduleSource),
        };

        let bind_addr = parse_or(&var, "BIND_ADDR", DEFAULT_BIND_ADDR)?;

        let interval_ms = parse_or(&var, "FEED_INTERVAL_MS", DEFAULT_INTERVAL_MS)?;

        let default_bbox = match var("DEFAULT_BBOX") {
            Some(raw) => BoundingBox::parse(&raw).map_err(|e| ConfigError::Invalid {
                name: "DEFAULT_BBOX",
                value: raw,
                reason: e.to_string(),
            })?,
            None => DEFAULT_BBOX,
        };

        let departure_window_mins = parse_or(&var, "DEPARTURE_WINDOW_MINS", DEFAULT_WINDOW_MINS)?;
        if !(1..=MAX_WINDOW_MINS).contains(&departure_window_mins) {
            return Err(ConfigError::Invalid {
                name: "DEPARTURE_WINDOW_MINS",
                value: departure_window_mins.to_string(),
                reason: format!("must be 1-{MAX_WINDOW_MINS}"),
            });
        }

        Ok(Self {
            bind_addr,
            feed,
            feed_interval: Duration::from_millis(interval_ms),
            default_bbox,
            schedule,
            departure_window_mins,
            nearest_candidates: parse_or(&var, "NEAREST_CANDIDATES", DEFAULT_CANDIDATES)?,
        })
    }
}

fn parse_or<T>(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match var(name) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value: raw.clone(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
