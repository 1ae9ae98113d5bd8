// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Canonical thermostat snapshot.

use crate::properties::PropertyUpdate;
use crate::types::{FanSpeed, OperationMode};

use super::{ChangeSet, Field};

/// Last known properties of the HVAC thermostat.
///
/// All fields start unknown and are filled in by updates. A field never
/// goes back to unknown: an update that does not carry a property leaves
/// it as it was.
///
/// # Examples
///
/// ```
/// use nhc_hvac::properties::PropertyUpdate;
/// use nhc_hvac::state::{DeviceProperties, Field};
///
/// let mut props = DeviceProperties::new();
/// let update = PropertyUpdate {
///     ambient_temperature: Some(21.5),
///     ..PropertyUpdate::default()
/// };
///
/// let changes = props.apply(&update);
/// assert!(changes.contains(Field::AmbientTemperature));
/// assert_eq!(props.ambient_temperature(), Some(21.5));
///
/// // Same value again: nothing changes
/// assert!(props.apply(&update).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceProperties {
    thermostat_on: Option<bool>,
    hvac_on: Option<bool>,
    program: Option<String>,
    operation_mode: Option<OperationMode>,
    ambient_temperature: Option<f64>,
    setpoint_temperature: Option<f64>,
    fan_speed: Option<FanSpeed>,
    overrule_active: Option<bool>,
    overrule_setpoint: Option<f64>,
    overrule_time: Option<String>,
}

impl DeviceProperties {
    /// Creates a snapshot with every property unknown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the thermostat is switched on.
    #[must_use]
    pub fn thermostat_on(&self) -> Option<bool> {
        self.thermostat_on
    }

    /// Whether the HVAC unit is running.
    #[must_use]
    pub fn hvac_on(&self) -> Option<bool> {
        self.hvac_on
    }

    /// Active thermostat program.
    #[must_use]
    pub fn program(&self) -> Option<&str> {
        self.program.as_deref()
    }

    /// Heating or cooling.
    #[must_use]
    pub fn operation_mode(&self) -> Option<OperationMode> {
        self.operation_mode
    }

    /// Measured room temperature.
    #[must_use]
    pub fn ambient_temperature(&self) -> Option<f64> {
        self.ambient_temperature
    }

    /// Programmed setpoint.
    #[must_use]
    pub fn setpoint_temperature(&self) -> Option<f64> {
        self.setpoint_temperature
    }

    /// Fan speed last reported by the unit.
    #[must_use]
    pub fn fan_speed(&self) -> Option<FanSpeed> {
        self.fan_speed
    }

    /// Whether a manual overrule is active.
    #[must_use]
    pub fn overrule_active(&self) -> Option<bool> {
        self.overrule_active
    }

    /// Setpoint of the manual overrule.
    #[must_use]
    pub fn overrule_setpoint(&self) -> Option<f64> {
        self.overrule_setpoint
    }

    /// Remaining overrule duration, as reported.
    #[must_use]
    pub fn overrule_time(&self) -> Option<&str> {
        self.overrule_time.as_deref()
    }

    /// The setpoint the controller works towards.
    ///
    /// This is the overrule setpoint while an overrule is active, otherwise
    /// the programmed setpoint. An unknown overrule state counts as inactive.
    #[must_use]
    pub fn effective_setpoint(&self) -> Option<f64> {
        if self.overrule_active == Some(true) {
            self.overrule_setpoint
        } else {
            self.setpoint_temperature
        }
    }

    /// Renders the current value of `field` for logging.
    #[must_use]
    pub fn describe(&self, field: Field) -> String {
        fn show<T: ToString>(value: Option<T>) -> String {
            value.map_or_else(|| "unknown".to_string(), |v| v.to_string())
        }

        match field {
            Field::ThermostatOn => show(self.thermostat_on),
            Field::HvacOn => show(self.hvac_on),
            Field::Program => show(self.program.as_deref()),
            Field::OperationMode => show(self.operation_mode),
            Field::AmbientTemperature => show(self.ambient_temperature),
            Field::SetpointTemperature => show(self.setpoint_temperature),
            Field::FanSpeed => show(self.fan_speed),
            Field::OverruleActive => show(self.overrule_active),
            Field::OverruleSetpoint => show(self.overrule_setpoint),
            Field::OverruleTime => show(self.overrule_time.as_deref()),
        }
    }

    /// Merges `update` into the snapshot and reports what changed.
    ///
    /// A property is reported when the update carries a value that differs
    /// from the stored one, including when the stored one was unknown.
    pub fn apply(&mut self, update: &PropertyUpdate) -> ChangeSet {
        let mut changes = ChangeSet::new();

        macro_rules! merge {
            ($($field:ident => $tag:ident),* $(,)?) => {
                $(
                    if let Some(value) = &update.$field
                        && self.$field.as_ref() != Some(value)
                    {
                        self.$field = Some(value.clone());
                        changes.insert(Field::$tag);
                    }
                )*
            };
        }

        merge!(
            thermostat_on => ThermostatOn,
            hvac_on => HvacOn,
            program => Program,
            operation_mode => OperationMode,
            ambient_temperature => AmbientTemperature,
            setpoint_temperature => SetpointTemperature,
            fan_speed => FanSpeed,
            overrule_active => OverruleActive,
            overrule_setpoint => OverruleSetpoint,
            overrule_time => OverruleTime,
        );

        changes
    }
}
