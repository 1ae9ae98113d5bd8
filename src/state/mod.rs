// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state management types.
//!
//! [`DeviceProperties`] holds the last known value of every thermostat
//! property. Applying a [`PropertyUpdate`](crate::properties::PropertyUpdate)
//! returns a [`ChangeSet`] naming the properties whose value actually
//! changed.
//!
//! # Examples
//!
//! ```
//! use nhc_hvac::properties::PropertyUpdate;
//! use nhc_hvac::state::{Device, Field};
//!
//! let uuid = "a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8";
//! let mut device = Device::new(uuid.parse().unwrap());
//!
//! let update = PropertyUpdate {
//!     thermostat_on: Some(true),
//!     ..PropertyUpdate::default()
//! };
//! let changes = device.apply(uuid, &update);
//!
//! assert!(changes.contains(Field::ThermostatOn));
//! ```

mod change_set;
mod device;
mod device_properties;

pub use change_set::{ChangeSet, Field};
pub use device::Device;
pub use device_properties::DeviceProperties;
