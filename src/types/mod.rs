// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for HVAC thermostat control.
//!
//! # Types
//!
//! - [`FanSpeed`] - Low/Medium/High fan speed
//! - [`OperationMode`] - Heating/Cooling/Unknown
//! - [`DeviceId`] - UUID of a Niko Home Control device

mod device_id;
mod fan_speed;
mod operation_mode;

pub use device_id::DeviceId;
pub use fan_speed::FanSpeed;
pub use operation_mode::OperationMode;
