// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound Hobby API commands.

use serde::Serialize;

use crate::error::ParseError;
use crate::types::{DeviceId, FanSpeed};

/// A request published on the `cmd` topic.
///
/// # Examples
///
/// ```
/// use nhc_hvac::message::DeviceCommand;
/// use nhc_hvac::types::FanSpeed;
///
/// let cmd = DeviceCommand::set_fan_speed(
///     "a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8".parse().unwrap(),
///     FanSpeed::High,
/// );
/// assert_eq!(cmd.method(), "devices.control");
/// assert_eq!(
///     cmd.encode().unwrap(),
///     r#"{"Method":"devices.control","Params":[{"Devices":[{"Properties":[{"FanSpeed":"High"}],"Uuid":"a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8"}]}]}"#
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    /// Ask the controller for every device and its full property list.
    ListDevices,

    /// Set the fan speed of an HVAC thermostat.
    SetFanSpeed {
        /// The thermostat to control.
        device: DeviceId,
        /// The requested speed.
        speed: FanSpeed,
    },
}

#[derive(Serialize)]
struct Request {
    #[serde(rename = "Method")]
    method: &'static str,
    #[serde(rename = "Params", skip_serializing_if = "Vec::is_empty")]
    params: Vec<ControlParams>,
}

#[derive(Serialize)]
struct ControlParams {
    #[serde(rename = "Devices")]
    devices: Vec<ControlDevice>,
}

#[derive(Serialize)]
struct ControlDevice {
    #[serde(rename = "Properties")]
    properties: Vec<FanSpeedProperty>,
    #[serde(rename = "Uuid")]
    uuid: DeviceId,
}

#[derive(Serialize)]
struct FanSpeedProperty {
    #[serde(rename = "FanSpeed")]
    fan_speed: FanSpeed,
}

impl DeviceCommand {
    /// Creates a fan speed command.
    #[must_use]
    pub fn set_fan_speed(device: DeviceId, speed: FanSpeed) -> Self {
        Self::SetFanSpeed { device, speed }
    }

    /// Returns the Hobby API method name.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::ListDevices => "devices.list",
            Self::SetFanSpeed { .. } => "devices.control",
        }
    }

    /// Serializes the command into its JSON payload.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if serialization fails.
    pub fn encode(&self) -> Result<String, ParseError> {
        let params = match *self {
            Self::ListDevices => Vec::new(),
            Self::SetFanSpeed { device, speed } => vec![ControlParams {
                devices: vec![ControlDevice {
                    properties: vec![FanSpeedProperty { fan_speed: speed }],
                    uuid: device,
                }],
            }],
        };

        let request = Request {
            method: self.method(),
            params,
        };
        serde_json::to_string(&request).map_err(ParseError::Json)
    }
}
