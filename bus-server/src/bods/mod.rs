//! Bus Open Data Service (BODS) vehicle location feed.
//!
//! BODS publishes live bus positions as SIRI Vehicle Monitoring documents,
//! queried by bounding box and returned as XML. Key characteristics:
//! - The provider applies its own request quota per API key
//! - Positions are refreshed roughly every 10-30 seconds per vehicle
//! - The interesting payload sits four levels deep in the envelope

mod client;
mod convert;
mod error;
mod feed;
mod mock;
mod types;
mod xml;

pub use client::{BodsClient, BodsConfig};
pub use convert::{MalformedEnvelope, project};
pub use error::FeedError;
pub use feed::{FeedSource, VehicleFeed};
pub use mock::MockFeed;
pub use types::{
    OneOrMany, ServiceDelivery, Siri, SiriEnvelope, VehicleActivity, VehicleMonitoringDelivery,
};
