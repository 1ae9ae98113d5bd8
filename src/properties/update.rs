// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed property delta for the HVAC thermostat.

use serde::Deserialize;
use serde_json::Value;

use super::lenient;
use crate::types::{FanSpeed, OperationMode};

/// Properties carried by one update for the thermostat.
///
/// Every field is optional: `None` means the update did not carry the
/// property, or carried a value that could not be understood. Neither case
/// ever clears the stored value.
///
/// # Examples
///
/// ```
/// use nhc_hvac::properties::PropertyUpdate;
/// use serde_json::json;
///
/// let update = PropertyUpdate::from_properties(&json!([
///     {"AmbientTemperature": "21.5"},
///     {"ThermostatOn": "maybe"},
/// ]));
///
/// assert_eq!(update.ambient_temperature, Some(21.5));
/// assert_eq!(update.thermostat_on, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PropertyUpdate {
    /// Whether the thermostat is switched on.
    #[serde(
        rename = "ThermostatOn",
        default,
        deserialize_with = "lenient::deserialize_flag"
    )]
    pub thermostat_on: Option<bool>,

    /// Whether the HVAC unit is running.
    #[serde(
        rename = "HvacOn",
        default,
        deserialize_with = "lenient::deserialize_flag"
    )]
    pub hvac_on: Option<bool>,

    /// Active thermostat program.
    #[serde(
        rename = "Program",
        default,
        deserialize_with = "lenient::deserialize_text"
    )]
    pub program: Option<String>,

    /// Heating or cooling.
    #[serde(
        rename = "OperationMode",
        default,
        deserialize_with = "lenient::deserialize_operation_mode"
    )]
    pub operation_mode: Option<OperationMode>,

    /// Measured room temperature.
    #[serde(
        rename = "AmbientTemperature",
        default,
        deserialize_with = "lenient::deserialize_number"
    )]
    pub ambient_temperature: Option<f64>,

    /// Programmed setpoint.
    #[serde(
        rename = "SetpointTemperature",
        default,
        deserialize_with = "lenient::deserialize_number"
    )]
    pub setpoint_temperature: Option<f64>,

    /// Fan speed currently reported by the unit.
    #[serde(
        rename = "FanSpeed",
        default,
        deserialize_with = "lenient::deserialize_fan_speed"
    )]
    pub fan_speed: Option<FanSpeed>,

    /// Whether a manual overrule is active.
    #[serde(
        rename = "OverruleActive",
        default,
        deserialize_with = "lenient::deserialize_flag"
    )]
    pub overrule_active: Option<bool>,

    /// Setpoint of the manual overrule.
    #[serde(
        rename = "OverruleSetpoint",
        default,
        deserialize_with = "lenient::deserialize_number"
    )]
    pub overrule_setpoint: Option<f64>,

    /// Remaining duration of the manual overrule, as reported.
    #[serde(
        rename = "OverruleTime",
        default,
        deserialize_with = "lenient::deserialize_text"
    )]
    pub overrule_time: Option<String>,
}

impl PropertyUpdate {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes the `Properties` value of a device entry.
    ///
    /// The Hobby API sends an array of objects, usually one key each. The
    /// objects are merged in order so a later value for the same key wins.
    /// A bare object is accepted as well; anything else yields an empty
    /// update.
    #[must_use]
    pub fn from_properties(value: &Value) -> Self {
        match value {
            Value::Array(items) => items.iter().fold(Self::new(), |mut acc, item| {
                if let Some(update) = Self::from_object(item) {
                    acc.merge(update);
                }
                acc
            }),
            Value::Object(_) => Self::from_object(value).unwrap_or_default(),
            _ => Self::new(),
        }
    }

    /// Decodes a single property object, or `None` if `value` is not an object.
    fn from_object(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        // Every field goes through a lenient deserializer, so the only way
        // this fails is a non-object, which was excluded above.
        Self::deserialize(value).ok()
    }

    /// Overlays the values supplied by `other` onto `self`.
    pub fn merge(&mut self, other: PropertyUpdate) {
        macro_rules! overlay {
            ($($field:ident),* $(,)?) => {
                $(
                    if other.$field.is_some() {
                        self.$field = other.$field;
                    }
                )*
            };
        }

        overlay!(
            thermostat_on,
            hvac_on,
            program,
            operation_mode,
            ambient_temperature,
            setpoint_temperature,
            fan_speed,
            overrule_active,
            overrule_setpoint,
            overrule_time,
        );
    }

    /// Returns `true` if the update carries no usable property.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
