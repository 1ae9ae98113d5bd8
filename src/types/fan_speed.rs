// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan speed of an HVAC unit.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Discrete fan speed supported by the Niko HVAC thermostat.
///
/// `Low` is the rest state: the controller never switches the fan off.
///
/// # Examples
///
/// ```
/// use nhc_hvac::types::FanSpeed;
///
/// assert_eq!("medium".parse::<FanSpeed>().unwrap(), FanSpeed::Medium);
/// assert_eq!(FanSpeed::High.as_str(), "High");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum FanSpeed {
    /// Lowest speed, used once the setpoint is reached.
    Low,
    /// Intermediate speed.
    Medium,
    /// Full speed.
    High,
}

impl FanSpeed {
    /// Returns the string used by the Hobby API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FanSpeed {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ValueError::InvalidFanSpeed(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_case_insensitive() {
        assert_eq!("HIGH".parse::<FanSpeed>().unwrap(), FanSpeed::High);
        assert_eq!("Medium".parse::<FanSpeed>().unwrap(), FanSpeed::Medium);
        assert_eq!("low".parse::<FanSpeed>().unwrap(), FanSpeed::Low);
    }

    #[test]
    fn parse_unknown_fails() {
        assert!("off".parse::<FanSpeed>().is_err());
        assert!("".parse::<FanSpeed>().is_err());
    }

    #[test]
    fn display_matches_wire_format() {
        assert_eq!(FanSpeed::High.to_string(), "High");
        assert_eq!(FanSpeed::Medium.to_string(), "Medium");
        assert_eq!(FanSpeed::Low.to_string(), "Low");
    }

    #[test]
    fn ordering_follows_airflow() {
        assert!(FanSpeed::Low < FanSpeed::Medium);
        assert!(FanSpeed::Medium < FanSpeed::High);
    }
}
