// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inbound Hobby API envelopes.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;
use crate::properties::PropertyUpdate;
use crate::properties::lenient;
use crate::types::DeviceId;

/// A message received on the `rsp` or `evt` topic.
///
/// Device list responses and property events share this shape:
///
/// ```json
/// {"Method":"devices.status","Params":[{"Devices":[{"Uuid":"...","Properties":[{"AmbientTemperature":"21.5"}]}]}]}
/// ```
///
/// # Examples
///
/// ```
/// use nhc_hvac::message::Envelope;
/// use nhc_hvac::types::DeviceId;
///
/// let payload = br#"{"Method":"devices.status","Params":[{"Devices":[
///     {"Uuid":"a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8","Properties":[{"FanSpeed":"Low"}]}
/// ]}]}"#;
/// let envelope = Envelope::decode(payload).unwrap();
/// let id: DeviceId = "a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8".parse().unwrap();
///
/// assert_eq!(envelope.method(), Some("devices.status"));
/// assert!(envelope.find_device(&id).is_some());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(
        rename = "Method",
        default,
        deserialize_with = "lenient::deserialize_text"
    )]
    method: Option<String>,

    #[serde(
        rename = "Params",
        default,
        deserialize_with = "lenient::deserialize_objects"
    )]
    params: Vec<Params>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Params {
    #[serde(
        rename = "Devices",
        default,
        deserialize_with = "lenient::deserialize_objects"
    )]
    devices: Vec<DeviceEntry>,
}

/// One device inside an envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceEntry {
    #[serde(
        rename = "Uuid",
        default,
        deserialize_with = "lenient::deserialize_text"
    )]
    uuid: Option<String>,

    #[serde(
        rename = "Name",
        default,
        deserialize_with = "lenient::deserialize_text"
    )]
    name: Option<String>,

    #[serde(
        rename = "Model",
        default,
        deserialize_with = "lenient::deserialize_text"
    )]
    model: Option<String>,

    #[serde(rename = "Properties", default)]
    properties: Value,
}

impl Envelope {
    /// Decodes a raw payload.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if the payload is not JSON, or
    /// `ParseError::UnexpectedFormat` if it is not a JSON object. Inside the
    /// object, wrong-typed `Params` or `Devices` lists read as empty and
    /// entries that are not objects are skipped.
    pub fn decode(payload: &[u8]) -> Result<Self, ParseError> {
        let value: Value = serde_json::from_slice(payload)?;
        if !value.is_object() {
            return Err(ParseError::UnexpectedFormat(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        }
        Self::deserialize(&value).map_err(ParseError::Json)
    }

    /// Returns the API method named by the message, if any.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    /// Iterates over every device in every `Params` entry.
    pub fn devices(&self) -> impl Iterator<Item = &DeviceEntry> {
        self.params.iter().flat_map(|p| p.devices.iter())
    }

    /// Returns the first device whose UUID matches `id`.
    #[must_use]
    pub fn find_device(&self, id: &DeviceId) -> Option<&DeviceEntry> {
        self.devices()
            .find(|device| device.uuid.as_deref().is_some_and(|uuid| id.matches(uuid)))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl DeviceEntry {
    /// Returns the UUID string as received.
    #[must_use]
    pub fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    /// Returns the device name, present in device list responses.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the device model, present in device list responses.
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Parses the device's properties.
    #[must_use]
    pub fn property_update(&self) -> PropertyUpdate {
        PropertyUpdate::from_properties(&self.properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HVAC: &str = "a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8";

    fn hvac_id() -> DeviceId {
        HVAC.parse().unwrap()
    }

    #[test]
    fn decode_device_list_response() {
        let payload = format!(
            r#"{{
                "Method": "devices.list",
                "Params": [{{
                    "Devices": [
                        {{"Uuid": "00000000-0000-0000-0000-000000000001", "Name": "Kitchen light",
                          "Model": "light", "Properties": [{{"Status": "On"}}]}},
                        {{"Uuid": "{HVAC}", "Name": "Living room", "Model": "hvacthermostat",
                          "Properties": [{{"ThermostatOn": "On"}}, {{"AmbientTemperature": "21.0"}}]}}
                    ]
                }}]
            }}"#
        );

        let envelope = Envelope::decode(payload.as_bytes()).unwrap();
        assert_eq!(envelope.method(), Some("devices.list"));
        assert_eq!(envelope.devices().count(), 2);

        let device = envelope.find_device(&hvac_id()).unwrap();
        assert_eq!(device.name(), Some("Living room"));
        assert_eq!(device.model(), Some("hvacthermostat"));

        let update = device.property_update();
        assert_eq!(update.thermostat_on, Some(true));
        assert_eq!(update.ambient_temperature, Some(21.0));
    }

    #[test]
    fn find_device_scans_all_params() {
        let payload = format!(
            r#"{{"Params":[{{"Devices":[]}},{{"Devices":[{{"Uuid":"{HVAC}","Properties":[]}}]}}]}}"#
        );
        let envelope = Envelope::decode(payload.as_bytes()).unwrap();
        assert!(envelope.find_device(&hvac_id()).is_some());
    }

    #[test]
    fn other_device_is_not_found() {
        let payload = br#"{"Method":"devices.status","Params":[{"Devices":[
            {"Uuid":"00000000-0000-0000-0000-000000000001","Properties":[{"AmbientTemperature":"19"}]}
        ]}]}"#;
        let envelope = Envelope::decode(payload).unwrap();
        assert!(envelope.find_device(&hvac_id()).is_none());
    }

    #[test]
    fn missing_params_is_empty() {
        let envelope = Envelope::decode(br#"{"Method":"devices.control"}"#).unwrap();
        assert_eq!(envelope.devices().count(), 0);
    }

    #[test]
    fn wrong_typed_uuid_is_tolerated() {
        let payload = br#"{"Params":[{"Devices":[{"Uuid":42,"Properties":[]}]}]}"#;
        let envelope = Envelope::decode(payload).unwrap();
        assert_eq!(envelope.devices().next().unwrap().uuid(), None);
    }

    #[test]
    fn null_sibling_device_is_skipped() {
        let payload = format!(
            r#"{{"Params":[{{"Devices":[{{"Uuid":"{HVAC}","Properties":[{{"AmbientTemperature":"21"}}]}},null,"junk"]}}]}}"#
        );
        let envelope = Envelope::decode(payload.as_bytes()).unwrap();
        assert_eq!(envelope.devices().count(), 1);

        let update = envelope.find_device(&hvac_id()).unwrap().property_update();
        assert_eq!(update.ambient_temperature, Some(21.0));
    }

    #[test]
    fn null_devices_list_is_empty() {
        let payload = format!(
            r#"{{"Params":[{{"Devices":null}},{{"Devices":[{{"Uuid":"{HVAC}","Properties":[{{"AmbientTemperature":"21"}}]}}]}}]}}"#
        );
        let envelope = Envelope::decode(payload.as_bytes()).unwrap();
        let update = envelope.find_device(&hvac_id()).unwrap().property_update();
        assert_eq!(update.ambient_temperature, Some(21.0));
    }

    #[test]
    fn wrong_typed_params_are_empty() {
        for payload in [
            &br#"{"Method":"devices.status","Params":"nope"}"#[..],
            br#"{"Params":null}"#,
            br#"{"Params":[null,3,{"Devices":{"Uuid":"x"}}]}"#,
        ] {
            let envelope = Envelope::decode(payload).unwrap();
            assert_eq!(envelope.devices().count(), 0);
        }
    }

    #[test]
    fn malformed_payload_is_rejected() {
        assert!(matches!(
            Envelope::decode(b"not json"),
            Err(ParseError::Json(_))
        ));
        assert!(matches!(
            Envelope::decode(b"[1,2,3]"),
            Err(ParseError::UnexpectedFormat(_))
        ));
        assert!(matches!(
            Envelope::decode(b"null"),
            Err(ParseError::UnexpectedFormat(_))
        ));
    }
}
