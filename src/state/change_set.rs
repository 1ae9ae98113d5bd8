// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat property names and sets of changed properties.

use std::fmt;

/// A property tracked for the HVAC thermostat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// `ThermostatOn`
    ThermostatOn,
    /// `HvacOn`
    HvacOn,
    /// `Program`
    Program,
    /// `OperationMode`
    OperationMode,
    /// `AmbientTemperature`
    AmbientTemperature,
    /// `SetpointTemperature`
    SetpointTemperature,
    /// `FanSpeed`
    FanSpeed,
    /// `OverruleActive`
    OverruleActive,
    /// `OverruleSetpoint`
    OverruleSetpoint,
    /// `OverruleTime`
    OverruleTime,
}

impl Field {
    /// Every tracked property, in wire order.
    pub const ALL: [Field; 10] = [
        Field::ThermostatOn,
        Field::HvacOn,
        Field::Program,
        Field::OperationMode,
        Field::AmbientTemperature,
        Field::SetpointTemperature,
        Field::FanSpeed,
        Field::OverruleActive,
        Field::OverruleSetpoint,
        Field::OverruleTime,
    ];

    /// Returns the property key used by the Hobby API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ThermostatOn => "ThermostatOn",
            Self::HvacOn => "HvacOn",
            Self::Program => "Program",
            Self::OperationMode => "OperationMode",
            Self::AmbientTemperature => "AmbientTemperature",
            Self::SetpointTemperature => "SetpointTemperature",
            Self::FanSpeed => "FanSpeed",
            Self::OverruleActive => "OverruleActive",
            Self::OverruleSetpoint => "OverruleSetpoint",
            Self::OverruleTime => "OverruleTime",
        }
    }

    /// Returns `true` if a change of this property bypasses the hysteresis
    /// interval.
    #[must_use]
    pub const fn is_forcing(&self) -> bool {
        matches!(
            self,
            Self::SetpointTemperature
                | Self::OperationMode
                | Self::Program
                | Self::OverruleActive
                | Self::OverruleSetpoint
                | Self::OverruleTime
                | Self::ThermostatOn
        )
    }

    const fn bit(self) -> u16 {
        1 << self as u16
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The properties that changed while applying one update.
///
/// # Examples
///
/// ```
/// use nhc_hvac::state::{ChangeSet, Field};
///
/// let changes: ChangeSet = [Field::AmbientTemperature].into_iter().collect();
/// assert!(changes.contains(Field::AmbientTemperature));
/// assert!(!changes.is_forcing());
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChangeSet(u16);

impl ChangeSet {
    /// Creates an empty change set.
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Marks `field` as changed.
    pub fn insert(&mut self, field: Field) {
        self.0 |= field.bit();
    }

    /// Returns `true` if `field` changed.
    #[must_use]
    pub const fn contains(&self, field: Field) -> bool {
        self.0 & field.bit() != 0
    }

    /// Returns `true` if nothing changed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns the number of changed properties.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates over the changed properties in wire order.
    pub fn iter(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL.into_iter().filter(|field| self.contains(*field))
    }

    /// Returns `true` if any changed property is a forcing one.
    #[must_use]
    pub fn is_forcing(&self) -> bool {
        self.iter().any(|field| field.is_forcing())
    }
}

impl FromIterator<Field> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        let mut set = Self::new();
        for field in iter {
            set.insert(field);
        }
        set
    }
}

impl fmt::Debug for ChangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for ChangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for field in self.iter() {
            if !first {
                f.write_str(",")?;
            }
            first = false;
            f.write_str(field.as_str())?;
        }
        Ok(())
    }
}
