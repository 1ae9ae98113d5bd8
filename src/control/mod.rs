// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan speed decisions.
//!
//! - [`FanController`] maps the thermostat snapshot to a target speed and
//!   decides whether the last update warrants a command.
//! - [`HysteresisGate`] keeps non-forced commands a minimum interval apart.
//!
//! Changes to the setpoint, mode, program, overrule or thermostat power are
//! forcing and bypass the interval. A change of the ambient temperature
//! alone is not.

mod fan_control;
mod hysteresis;

pub use fan_control::{Decision, FanController, FanThresholds};
pub use hysteresis::{GatePhase, HysteresisGate, should_emit};
