//! SIRI-VM response DTOs.
//!
//! These mirror the Bus Open Data Service SIRI Vehicle Monitoring
//! document, either as JSON or as the element tree `xml` folds the XML
//! datafeed into. Every level is optional here; the
//! projection in `convert` decides which absences are errors.

use serde::{Deserialize, Serialize};

/// Top-level document: `{"Siri": {...}}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SiriEnvelope {
    pub siri: Option<Siri>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Siri {
    pub service_delivery: Option<ServiceDelivery>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceDelivery {
    /// When the provider produced this delivery.
    pub response_timestamp: Option<String>,

    pub vehicle_monitoring_delivery: Option<VehicleMonitoringDelivery>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VehicleMonitoringDelivery {
    pub response_timestamp: Option<String>,

    /// Valid-until time of this snapshot.
    pub valid_until: Option<String>,

    pub vehicle_activity: Option<OneOrMany<VehicleActivity>>,
}

/// XML-to-JSON converters collapse single-element lists into a bare
/// object, so either shape is accepted.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// One vehicle's reported position and journey.
///
/// Passed through to clients unchanged; nothing in this service reads
/// its fields.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct VehicleActivity(pub serde_json::Value);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_full_envelope() {
        let json = r#"{
            "Siri": {
                "ServiceDelivery": {
                    "ResponseTimestamp": "2024-03-15T08:00:00+00:00",
                    "VehicleMonitoringDelivery": {
                        "ValidUntil": "2024-03-15T08:05:00+00:00",
                        "VehicleActivity": [
                            {"RecordedAtTime": "2024-03-15T07:59:41+00:00"},
                            {"RecordedAtTime": "2024-03-15T07:59:50+00:00"}
                        ]
                    }
                }
            }
        }"#;

        let envelope: SiriEnvelope = serde_json::from_str(json).unwrap();
        let delivery = envelope
            .siri
            .unwrap()
            .service_delivery
            .unwrap()
            .vehicle_monitoring_delivery
            .unwrap();
        assert_eq!(delivery.valid_until.as_deref(), Some("2024-03-15T08:05:00+00:00"));
        assert_eq!(delivery.vehicle_activity.unwrap().into_vec().len(), 2);
    }

    #[test]
    fn single_activity_object_becomes_list() {
        let json = r#"{"VehicleActivity": {"RecordedAtTime": "now"}}"#;
        let delivery: VehicleMonitoringDelivery = serde_json::from_str(json).unwrap();
        let activities = delivery.vehicle_activity.unwrap().into_vec();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].0["RecordedAtTime"], "now");
    }

    #[test]
    fn missing_levels_decode_as_none() {
        let envelope: SiriEnvelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.siri.is_none());
    }

    #[test]
    fn activity_is_passed_through_verbatim() {
        let raw = serde_json::json!({
            "MonitoredVehicleJourney": {"LineRef": "U1", "VehicleLocation": {"Longitude": "-1.4", "Latitude": "50.9"}}
        });
        let activity: VehicleActivity = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&activity).unwrap(), raw);
    }
}
