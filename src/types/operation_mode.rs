// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat operation mode.

use std::fmt;

/// Whether the HVAC unit is heating or cooling.
///
/// Any mode string the controller does not know maps to `Unknown`, which
/// never calls for active conditioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum OperationMode {
    /// The unit heats towards the setpoint.
    Heating,
    /// The unit cools towards the setpoint.
    Cooling,
    /// Any other reported mode.
    Unknown,
}

impl OperationMode {
    /// Maps a reported mode string, ignoring case.
    ///
    /// Returns `None` for an empty string, which carries no information.
    #[must_use]
    pub fn from_reported(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        Some(match s.to_lowercase().as_str() {
            "heating" => Self::Heating,
            "cooling" => Self::Cooling,
            _ => Self::Unknown,
        })
    }

    /// Returns the string used by the Hobby API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Heating => "Heating",
            Self::Cooling => "Cooling",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
