use std::error::Error;

use tracing::info;
use tracing_subscriber::EnvFilter;

use bus_server::bods::{BodsClient, FeedSource, MockFeed};
use bus_server::config::{FeedConfig, ScheduleConfig, ServerConfig};
use bus_server::live::{FeedGate, LiveFeed};
use bus_server::schedule::{MemoryScheduleStore, PgScheduleStore, ScheduleSource};
use bus_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;

    let feed = match &config.feed {
        FeedConfig::Bods(bods) => {
            info!(base_url = %bods.base_url, "using BODS vehicle feed");
            FeedSource::Bods(BodsClient::new(bods.clone())?)
        }
        FeedConfig::Mock(path) => {
            info!(path = %path.display(), "using mock vehicle feed");
            FeedSource::Mock(MockFeed::from_file(path)?)
        }
    };
    let live = LiveFeed::new(FeedGate::new(config.feed_interval), feed);

    let schedule = match &config.schedule {
        ScheduleConfig::Postgres(pg) => {
            info!(max_connections = pg.max_connections, "using PostgreSQL schedule store");
            ScheduleSource::Postgres(PgScheduleStore::connect_lazy(pg)?)
        }
        ScheduleConfig::Fixture(path) => {
            info!(path = %path.display(), "using schedule fixture");
            ScheduleSource::Memory(MemoryScheduleStore::from_file(path)?)
        }
    };

    let addr = config.bind_addr;
    let app = create_router(AppState::new(live, schedule, config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "bus server listening");
    info!("GET /live?bbox=minLng,minLat,maxLng,maxLat");
    info!("GET /journeys/block?route=&departure_time=&direction=&run_days=");
    info!("GET /journeys/block/:block_ref");
    info!("GET /stops/nearest?lat=&lon=");
    info!("GET /stops/:atco_code/departures?run_days=&window_mins=&time=");
    info!("GET /routes/:route/stops");

    axum::serve(listener, app).await?;
    Ok(())
}
