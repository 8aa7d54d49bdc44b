//! SIRI-VM XML decoding.
//!
//! The datafeed answers in XML. The document is folded into the same JSON
//! tree an XML-to-JSON converter produces, then decoded with the serde
//! DTOs: elements become object keys, repeated sibling elements become
//! arrays and leaf elements become strings. Attributes and namespace
//! prefixes are dropped.

use quick_xml::Reader;
use quick_xml::events::Event;
use serde_json::{Map, Value};

use super::types::SiriEnvelope;

/// The body was not a well-formed SIRI-VM document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct XmlError(String);

/// An element still being read.
struct Node {
    name: String,
    children: Map<String, Value>,
    text: String,
}

impl Node {
    fn new(name: String) -> Self {
        Self {
            name,
            children: Map::new(),
            text: String::new(),
        }
    }

    /// Add a child, turning a repeated name into an array.
    fn insert(&mut self, name: String, value: Value) {
        match self.children.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                self.children.insert(name, value);
            }
        }
    }

    fn into_value(self) -> Value {
        if self.children.is_empty() {
            Value::String(self.text)
        } else {
            Value::Object(self.children)
        }
    }
}

fn element_name(local: &[u8]) -> String {
    String::from_utf8_lossy(local).into_owned()
}

/// Fold an XML document into a JSON tree keyed by element name.
pub fn xml_to_value(xml: &str) -> Result<Value, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    // Bottom entry collects the document element.
    let mut stack = vec![Node::new(String::new())];

    loop {
        let event = reader
            .read_event()
            .map_err(|e| XmlError(format!("at byte {}: {e}", reader.buffer_position())))?;

        match event {
            Event::Start(start) => {
                stack.push(Node::new(element_name(start.local_name().as_ref())));
            }
            Event::Empty(start) => {
                let name = element_name(start.local_name().as_ref());
                if let Some(parent) = stack.last_mut() {
                    parent.insert(name, Value::String(String::new()));
                }
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| XmlError(e.to_string()))?;
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(_) => {
                if stack.len() < 2 {
                    return Err(XmlError("unexpected closing tag".into()));
                }
                if let Some(node) = stack.pop() {
                    let name = node.name.clone();
                    if let Some(parent) = stack.last_mut() {
                        parent.insert(name, node.into_value());
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() != 1 {
        return Err(XmlError("unclosed element at end of document".into()));
    }
    match stack.pop() {
        Some(root) if !root.children.is_empty() => Ok(Value::Object(root.children)),
        _ => Err(XmlError("document has no root element".into())),
    }
}

/// Decode a SIRI-VM XML document into the envelope DTOs.
pub fn decode_envelope(xml: &str) -> Result<SiriEnvelope, XmlError> {
    let tree = xml_to_value(xml)?;
    serde_json::from_value(tree).map_err(|e| XmlError(format!("unexpected document shape: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bods::project;

    const TWO_VEHICLES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Siri xmlns="http://www.siri.org.uk/siri" version="2.0">
  <ServiceDelivery>
    <ResponseTimestamp>2024-05-01T08:10:00+00:00</ResponseTimestamp>
    <ProducerRef>DepartmentForTransport</ProducerRef>
    <VehicleMonitoringDelivery>
      <ResponseTimestamp>2024-05-01T08:10:00+00:00</ResponseTimestamp>
      <ValidUntil>2024-05-01T08:15:00+00:00</ValidUntil>
      <VehicleActivity>
        <RecordedAtTime>2024-05-01T08:09:41+00:00</RecordedAtTime>
        <MonitoredVehicleJourney>
          <LineRef>U1</LineRef>
          <OperatorRef>BLUS</OperatorRef>
          <VehicleLocation>
            <Longitude>-1.3941</Longitude>
            <Latitude>50.9231</Latitude>
          </VehicleLocation>
          <VehicleRef>SO-1601</VehicleRef>
        </MonitoredVehicleJourney>
      </VehicleActivity>
      <VehicleActivity>
        <RecordedAtTime>2024-05-01T08:09:52+00:00</RecordedAtTime>
        <MonitoredVehicleJourney>
          <LineRef>U2</LineRef>
          <PublishedLineName>U2 &amp; Uni</PublishedLineName>
          <VehicleRef>SO-1602</VehicleRef>
        </MonitoredVehicleJourney>
      </VehicleActivity>
    </VehicleMonitoringDelivery>
  </ServiceDelivery>
</Siri>"#;

    #[test]
    fn repeated_activities_become_a_list() {
        let activities = project(decode_envelope(TWO_VEHICLES).unwrap()).unwrap();

        assert_eq!(activities.len(), 2);
        let first = &activities[0].0["MonitoredVehicleJourney"];
        assert_eq!(first["LineRef"], "U1");
        assert_eq!(first["VehicleLocation"]["Latitude"], "50.9231");
        assert_eq!(
            activities[1].0["MonitoredVehicleJourney"]["PublishedLineName"],
            "U2 & Uni"
        );
    }

    #[test]
    fn lone_activity_is_still_a_list() {
        let xml = "<Siri><ServiceDelivery><VehicleMonitoringDelivery>\
                   <VehicleActivity><VehicleRef>SO-1</VehicleRef></VehicleActivity>\
                   </VehicleMonitoringDelivery></ServiceDelivery></Siri>";
        let activities = project(decode_envelope(xml).unwrap()).unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].0["VehicleRef"], "SO-1");
    }

    #[test]
    fn empty_delivery_is_malformed_not_a_crash() {
        let xml = "<Siri><ServiceDelivery><VehicleMonitoringDelivery>\
                   <ResponseTimestamp>2024-05-01T08:10:00Z</ResponseTimestamp>\
                   </VehicleMonitoringDelivery></ServiceDelivery></Siri>";
        let err = project(decode_envelope(xml).unwrap()).unwrap_err();
        assert!(err.to_string().contains("VehicleActivity"));
    }

    #[test]
    fn namespace_prefixes_are_dropped() {
        let xml = r#"<siri:Siri xmlns:siri="http://www.siri.org.uk/siri"><siri:ServiceDelivery/></siri:Siri>"#;
        let tree = xml_to_value(xml).unwrap();
        assert_eq!(tree["Siri"]["ServiceDelivery"], "");
    }

    #[test]
    fn cdata_is_kept_as_text() {
        let tree = xml_to_value("<Note><![CDATA[a < b]]></Note>").unwrap();
        assert_eq!(tree["Note"], "a < b");
    }

    #[test]
    fn mismatched_tags_are_rejected() {
        assert!(xml_to_value("<Siri><ServiceDelivery></Siri>").is_err());
    }

    #[test]
    fn unclosed_document_is_rejected() {
        assert!(xml_to_value("<Siri><ServiceDelivery>").is_err());
    }

    #[test]
    fn non_xml_is_rejected() {
        assert!(xml_to_value("").is_err());
        assert!(decode_envelope("upstream is down").is_err());
    }
}
