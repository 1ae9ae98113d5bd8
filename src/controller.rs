// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The update pipeline for one thermostat.
//!
//! [`Controller`] owns the device snapshot, the fan rule and the hysteresis
//! gate. Every inbound message runs through it synchronously:
//!
//! 1. find the tracked device in the envelope
//! 2. parse its properties and merge them into the snapshot
//! 3. evaluate the fan rule on the changed properties
//! 4. pass the result through the hysteresis gate
//!
//! The controller never sends anything itself. It returns a
//! [`Verdict`] and the caller reports a successful send back with
//! [`Controller::record_emit`].

use chrono::{DateTime, Utc};

use crate::control::{FanController, HysteresisGate};
use crate::error::ParseError;
use crate::message::{DeviceCommand, Envelope};
use crate::properties::PropertyUpdate;
use crate::state::{ChangeSet, Device, DeviceProperties};
use crate::types::{DeviceId, FanSpeed};

/// What the controller concluded from one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The message does not concern the tracked device.
    Ignored,
    /// The device was found but nothing relevant changed, or the thermostat
    /// is not on.
    NoAction {
        /// The properties that changed.
        changes: ChangeSet,
    },
    /// A new speed is due but the hysteresis interval has not elapsed.
    Suppressed {
        /// The properties that changed.
        changes: ChangeSet,
        /// The speed that would have been sent.
        target: FanSpeed,
    },
    /// A command should be sent now.
    Emit {
        /// The properties that changed.
        changes: ChangeSet,
        /// Whether the command bypassed the hysteresis interval.
        forced: bool,
        /// The command to publish.
        command: DeviceCommand,
    },
}

impl Verdict {
    /// Returns the command to publish, if any.
    #[must_use]
    pub fn command(&self) -> Option<&DeviceCommand> {
        match self {
            Self::Emit { command, .. } => Some(command),
            _ => None,
        }
    }

    /// Returns the properties that changed, empty when ignored.
    #[must_use]
    pub fn changes(&self) -> ChangeSet {
        match self {
            Self::Ignored => ChangeSet::new(),
            Self::NoAction { changes }
            | Self::Suppressed { changes, .. }
            | Self::Emit { changes, .. } => *changes,
        }
    }
}

/// Single-writer owner of the thermostat state.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use nhc_hvac::control::{FanController, FanThresholds, HysteresisGate};
/// use nhc_hvac::controller::Controller;
/// use nhc_hvac::types::FanSpeed;
///
/// let uuid = "a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8";
/// let mut controller = Controller::new(
///     uuid.parse().unwrap(),
///     FanController::new(FanThresholds::new(1.0, 2.5).unwrap()),
///     HysteresisGate::from_minutes(5),
/// );
///
/// let payload = format!(r#"{{"Params":[{{"Devices":[{{"Uuid":"{uuid}","Properties":[
///     {{"ThermostatOn":"On"}},{{"OperationMode":"Cooling"}},
///     {{"AmbientTemperature":"24.0"}},{{"SetpointTemperature":"22.0"}}]}}]}}]}}"#);
///
/// let verdict = controller.handle_payload(payload.as_bytes(), Utc::now()).unwrap();
/// assert_eq!(
///     verdict.command(),
///     Some(&nhc_hvac::message::DeviceCommand::set_fan_speed(uuid.parse().unwrap(), FanSpeed::Medium))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Controller {
    device: Device,
    fan: FanController,
    gate: HysteresisGate,
}

impl Controller {
    /// Creates a controller for the thermostat `id`.
    #[must_use]
    pub fn new(id: DeviceId, fan: FanController, gate: HysteresisGate) -> Self {
        Self {
            device: Device::new(id),
            fan,
            gate,
        }
    }

    /// Returns the tracked device.
    #[must_use]
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn properties(&self) -> &DeviceProperties {
        self.device.properties()
    }

    /// Returns the hysteresis gate.
    #[must_use]
    pub fn gate(&self) -> &HysteresisGate {
        &self.gate
    }

    /// Decodes and processes a raw `rsp`/`evt` payload.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the payload is not a valid envelope. The
    /// snapshot is left untouched in that case.
    pub fn handle_payload(
        &mut self,
        payload: &[u8],
        now: DateTime<Utc>,
    ) -> Result<Verdict, ParseError> {
        let envelope = Envelope::decode(payload)?;
        Ok(self.handle_envelope(&envelope, now))
    }

    /// Processes a decoded envelope.
    pub fn handle_envelope(&mut self, envelope: &Envelope, now: DateTime<Utc>) -> Verdict {
        let id = self.device.id();
        let Some(entry) = envelope.find_device(&id) else {
            return Verdict::Ignored;
        };

        tracing::debug!(
            device = %id,
            method = envelope.method().unwrap_or("-"),
            "Thermostat update received"
        );

        // find_device only returns entries with a matching uuid
        let uuid = entry.uuid().unwrap_or_default();
        self.handle_update(uuid, &entry.property_update(), now)
    }

    /// Applies a parsed update addressed to `uuid` and decides on the fan.
    pub fn handle_update(
        &mut self,
        uuid: &str,
        update: &PropertyUpdate,
        now: DateTime<Utc>,
    ) -> Verdict {
        if !self.device.id().matches(uuid) {
            return Verdict::Ignored;
        }

        let changes = self.device.apply(uuid, update);
        let decision = self.fan.evaluate(self.device.properties(), &changes);

        if !decision.should_evaluate {
            return Verdict::NoAction { changes };
        }

        if !self.gate.should_emit(decision.forced, now) {
            tracing::debug!(
                target_speed = %decision.target,
                changes = %changes,
                phase = ?self.gate.phase(now),
                "Hysteresis not reached, skipping fan speed update"
            );
            return Verdict::Suppressed {
                changes,
                target: decision.target,
            };
        }

        Verdict::Emit {
            changes,
            forced: decision.forced,
            command: DeviceCommand::set_fan_speed(self.device.id(), decision.target),
        }
    }

    /// Records that a command was sent at `now`.
    ///
    /// Call this only after the command was handed to the broker, so a
    /// failed publish does not delay the next attempt.
    pub fn record_emit(&mut self, now: DateTime<Utc>) {
        self.gate.record_emit(now);
    }
}
