// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Minimum spacing between fan commands.

use chrono::{DateTime, TimeDelta, Utc};

/// Whether a non-forced command may be sent right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    /// The interval since the last command has not yet elapsed.
    Cooldown,
    /// A command may be sent.
    Ready,
}

/// Returns `true` if a command may be sent at `now`.
///
/// Forced commands always pass. Other commands pass once strictly more than
/// `interval` has elapsed since `last_emit`, or if nothing was sent yet.
#[must_use]
pub fn should_emit(
    forced: bool,
    last_emit: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    interval: TimeDelta,
) -> bool {
    if forced {
        return true;
    }
    last_emit.is_none_or(|last| now - last > interval)
}

/// Tracks the time of the last fan command.
///
/// # Examples
///
/// ```
/// use chrono::{TimeDelta, Utc};
/// use nhc_hvac::control::HysteresisGate;
///
/// let mut gate = HysteresisGate::from_minutes(5);
/// let t0 = Utc::now();
///
/// assert!(gate.should_emit(false, t0));
/// gate.record_emit(t0);
///
/// assert!(!gate.should_emit(false, t0 + TimeDelta::minutes(5)));
/// assert!(gate.should_emit(true, t0 + TimeDelta::minutes(1)));
/// assert!(gate.should_emit(false, t0 + TimeDelta::minutes(5) + TimeDelta::seconds(1)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HysteresisGate {
    interval: TimeDelta,
    last_emit: Option<DateTime<Utc>>,
}

impl HysteresisGate {
    /// Creates a gate with the given interval and no command sent yet.
    #[must_use]
    pub fn new(interval: TimeDelta) -> Self {
        Self {
            interval,
            last_emit: None,
        }
    }

    /// Creates a gate with an interval in whole minutes.
    #[must_use]
    pub fn from_minutes(minutes: u32) -> Self {
        Self::new(TimeDelta::minutes(i64::from(minutes)))
    }

    /// Returns the minimum spacing between non-forced commands.
    #[must_use]
    pub fn interval(&self) -> TimeDelta {
        self.interval
    }

    /// Returns when the last command was sent.
    #[must_use]
    pub fn last_emit(&self) -> Option<DateTime<Utc>> {
        self.last_emit
    }

    /// Returns `true` if a command may be sent at `now`.
    #[must_use]
    pub fn should_emit(&self, forced: bool, now: DateTime<Utc>) -> bool {
        should_emit(forced, self.last_emit, now, self.interval)
    }

    /// Returns the phase for non-forced commands at `now`.
    #[must_use]
    pub fn phase(&self, now: DateTime<Utc>) -> GatePhase {
        if self.should_emit(false, now) {
            GatePhase::Ready
        } else {
            GatePhase::Cooldown
        }
    }

    /// Records a command sent at `now`.
    pub fn record_emit(&mut self, now: DateTime<Utc>) {
        self.last_emit = Some(now);
    }
}
