// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The tracked thermostat.

use crate::properties::PropertyUpdate;
use crate::types::DeviceId;

use super::{ChangeSet, DeviceProperties};

/// The single thermostat this process mirrors.
#[derive(Debug, Clone)]
pub struct Device {
    id: DeviceId,
    properties: DeviceProperties,
}

impl Device {
    /// Creates a device with every property unknown.
    #[must_use]
    pub fn new(id: DeviceId) -> Self {
        Self {
            id,
            properties: DeviceProperties::new(),
        }
    }

    /// Returns the device identifier.
    #[must_use]
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn properties(&self) -> &DeviceProperties {
        &self.properties
    }

    /// Applies an update addressed to `uuid`.
    ///
    /// Updates for any other device are ignored and yield an empty change
    /// set.
    pub fn apply(&mut self, uuid: &str, update: &PropertyUpdate) -> ChangeSet {
        if !self.id.matches(uuid) {
            return ChangeSet::new();
        }

        let changes = self.properties.apply(update);
        for field in changes.iter() {
            tracing::debug!(
                device = %self.id,
                property = %field,
                value = %self.properties.describe(field),
                "Property changed"
            );
        }
        tracing::trace!(device = %self.id, snapshot = ?self.properties, "Snapshot updated");
        changes
    }
}
