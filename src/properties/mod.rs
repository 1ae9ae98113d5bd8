// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property parsing for Hobby API device messages.
//!
//! Devices report their state as a list of property objects. This module
//! turns such a list into a [`PropertyUpdate`], a typed delta where every
//! field is optional. Parsing is lenient: a single property that cannot be
//! understood reads as absent and never fails the rest of the update.
//!
//! | Property | Accepted values |
//! |----------|-----------------|
//! | `ThermostatOn`, `HvacOn`, `OverruleActive` | `true`/`false`, `1`/`0`, `on`/`off` (any case) |
//! | `AmbientTemperature`, `SetpointTemperature`, `OverruleSetpoint` | number or numeric string |
//! | `Program`, `OverruleTime` | non-empty string |
//! | `OperationMode` | `Heating`, `Cooling`, anything else is `Unknown` |
//! | `FanSpeed` | `High`, `Medium`, `Low` (any case) |

pub mod lenient;
mod update;

pub use update::PropertyUpdate;
