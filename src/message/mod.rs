// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hobby API message envelopes.
//!
//! - [`Envelope`] decodes device list responses and property events.
//! - [`DeviceCommand`] encodes requests for the `cmd` topic.

mod inbound;
mod outbound;

pub use inbound::{DeviceEntry, Envelope};
pub use outbound::DeviceCommand;
