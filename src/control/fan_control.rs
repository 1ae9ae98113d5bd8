// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan speed decision rule.

use crate::error::ValueError;
use crate::state::{ChangeSet, DeviceProperties};
use crate::types::{FanSpeed, OperationMode};

/// Temperature deltas separating the three fan speeds.
///
/// A gap to the setpoint up to `small` runs the fan at `Low`, up to
/// `moderate` at `Medium`, and anything larger at `High`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FanThresholds {
    small: f64,
    moderate: f64,
}

impl FanThresholds {
    /// Creates thresholds.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidThresholds` unless both deltas are finite
    /// and `0 <= small < moderate`.
    pub fn new(small: f64, moderate: f64) -> Result<Self, ValueError> {
        if !small.is_finite() || !moderate.is_finite() || small < 0.0 || small >= moderate {
            return Err(ValueError::InvalidThresholds { small, moderate });
        }
        Ok(Self { small, moderate })
    }

    /// The largest gap still served by `Low`.
    #[must_use]
    pub fn small(&self) -> f64 {
        self.small
    }

    /// The largest gap still served by `Medium`.
    #[must_use]
    pub fn moderate(&self) -> f64 {
        self.moderate
    }

    /// Maps a temperature gap to a fan speed.
    #[must_use]
    pub fn speed_for_gap(&self, gap: f64) -> FanSpeed {
        if gap <= self.small {
            FanSpeed::Low
        } else if gap <= self.moderate {
            FanSpeed::Medium
        } else {
            FanSpeed::High
        }
    }
}

/// Outcome of evaluating one applied update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Whether a fan command is warranted at all.
    pub should_evaluate: bool,
    /// Whether the command may bypass the hysteresis interval.
    pub forced: bool,
    /// The speed to command.
    pub target: FanSpeed,
}

/// Computes the fan speed for the thermostat.
///
/// # Examples
///
/// ```
/// use nhc_hvac::control::{FanController, FanThresholds};
/// use nhc_hvac::types::{FanSpeed, OperationMode};
///
/// let fan = FanController::new(FanThresholds::new(1.0, 2.5).unwrap());
///
/// // Cooling, 2 degrees too warm
/// assert_eq!(
///     fan.speed_for(Some(OperationMode::Cooling), Some(24.0), Some(22.0)),
///     FanSpeed::Medium
/// );
/// // Setpoint reached: rest at Low
/// assert_eq!(
///     fan.speed_for(Some(OperationMode::Cooling), Some(20.0), Some(22.0)),
///     FanSpeed::Low
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FanController {
    thresholds: FanThresholds,
}

impl FanController {
    /// Creates a controller with the given thresholds.
    #[must_use]
    pub fn new(thresholds: FanThresholds) -> Self {
        Self { thresholds }
    }

    /// Returns the configured thresholds.
    #[must_use]
    pub fn thresholds(&self) -> &FanThresholds {
        &self.thresholds
    }

    /// Decides whether `changes` call for a fan command and which one.
    ///
    /// Nothing is commanded unless the thermostat is known to be on and a
    /// property changed.
    #[must_use]
    pub fn evaluate(&self, props: &DeviceProperties, changes: &ChangeSet) -> Decision {
        Decision {
            should_evaluate: props.thermostat_on() == Some(true) && !changes.is_empty(),
            forced: changes.is_forcing(),
            target: self.target_speed(props),
        }
    }

    /// The speed the snapshot calls for right now.
    #[must_use]
    pub fn target_speed(&self, props: &DeviceProperties) -> FanSpeed {
        self.speed_for(
            props.operation_mode(),
            props.ambient_temperature(),
            props.effective_setpoint(),
        )
    }

    /// The control law.
    ///
    /// The fan only runs faster than `Low` while the room is on the wrong
    /// side of the setpoint for the current mode. Unknown inputs count as
    /// "nothing to do".
    #[must_use]
    pub fn speed_for(
        &self,
        mode: Option<OperationMode>,
        ambient: Option<f64>,
        setpoint: Option<f64>,
    ) -> FanSpeed {
        let (Some(mode), Some(ambient), Some(setpoint)) = (mode, ambient, setpoint) else {
            return FanSpeed::Low;
        };

        let needs_conditioning = match mode {
            OperationMode::Cooling => ambient > setpoint,
            OperationMode::Heating => ambient < setpoint,
            OperationMode::Unknown => false,
        };

        if needs_conditioning {
            self.thresholds.speed_for_gap((setpoint - ambient).abs())
        } else {
            FanSpeed::Low
        }
    }
}
