// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device identifier type.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::error::ValueError;

/// Identifier of a Niko Home Control device.
///
/// The Hobby API addresses every device by a UUID. Comparing identifiers
/// as parsed UUIDs makes the match independent of letter case.
///
/// # Examples
///
/// ```
/// use nhc_hvac::types::DeviceId;
///
/// let id: DeviceId = "a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8".parse().unwrap();
/// assert!(id.matches("A1A2A3A4-B1B2-C1C2-D1D2-D3D4D5D6D7D8"));
/// assert!(!id.matches("not-a-uuid"));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DeviceId(Uuid);

impl DeviceId {
    /// Returns `true` if `raw` is a UUID equal to this identifier.
    ///
    /// Strings that do not parse as a UUID never match.
    #[must_use]
    pub fn matches(&self, raw: &str) -> bool {
        Uuid::parse_str(raw.trim()).is_ok_and(|uuid| uuid == self.0)
    }
}

impl fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Show only first 8 characters for readability
        let short = &self.0.to_string()[..8];
        write!(f, "DeviceId({short}...)")
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DeviceId {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| ValueError::InvalidDeviceId(s.to_string()))
    }
}
