//! Projection from the SIRI envelope to the vehicle activity list.
//!
//! Clients only ever see the activity list, so the envelope can change
//! shape upstream without changing our response contract.

use super::types::{SiriEnvelope, VehicleActivity};

/// The envelope lacked one of the levels leading to the activity list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed upstream response: missing {missing}")]
pub struct MalformedEnvelope {
    /// Dotted path of the first absent level.
    pub missing: &'static str,
}

/// Extract `Siri.ServiceDelivery.VehicleMonitoringDelivery.VehicleActivity`.
pub fn project(envelope: SiriEnvelope) -> Result<Vec<VehicleActivity>, MalformedEnvelope> {
    let absent = |missing| MalformedEnvelope { missing };

    let siri = envelope.siri.ok_or_else(|| absent("Siri"))?;
    let delivery = siri
        .service_delivery
        .ok_or_else(|| absent("Siri.ServiceDelivery"))?;
    let monitoring = delivery
        .vehicle_monitoring_delivery
        .ok_or_else(|| absent("Siri.ServiceDelivery.VehicleMonitoringDelivery"))?;
    let activities = monitoring.vehicle_activity.ok_or_else(|| {
        absent("Siri.ServiceDelivery.VehicleMonitoringDelivery.VehicleActivity")
    })?;

    Ok(activities.into_vec())
}
