// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT transport for the Niko Home Control Hobby API.
//!
//! The controller listens on the device event, response and error topics
//! and publishes commands on a single command topic:
//!
//! | Topic | Direction | Content |
//! |-------|-----------|---------|
//! | `hobby/control/devices/evt` | inbound | property changes |
//! | `hobby/control/devices/rsp` | inbound | replies such as `devices.list` |
//! | `hobby/control/devices/err` | inbound | request failures |
//! | `hobby/control/devices/cmd` | outbound | `devices.list`, `devices.control` |
//!
//! [`NhcBroker`] is the rumqttc-backed connection. Anything implementing
//! [`CommandSink`] can stand in for it, which is how the control loop is
//! tested without a broker.

mod address;
#[cfg(feature = "mqtt")]
mod broker;

pub use address::{BrokerAddress, DEFAULT_PORT, DEFAULT_TLS_PORT};
#[cfg(feature = "mqtt")]
pub use broker::{NhcBroker, NhcBrokerBuilder, NhcBrokerConfig};

use crate::error::ProtocolError;
use crate::message::DeviceCommand;

/// Topic carrying device events.
pub const EVENT_TOPIC: &str = "hobby/control/devices/evt";

/// Topic carrying replies to commands.
pub const RESPONSE_TOPIC: &str = "hobby/control/devices/rsp";

/// Topic carrying request failures.
pub const ERROR_TOPIC: &str = "hobby/control/devices/err";

/// Topic commands are published on.
pub const COMMAND_TOPIC: &str = "hobby/control/devices/cmd";

/// Topics subscribed on every connection.
pub const SUBSCRIBED_TOPICS: [&str; 3] = [EVENT_TOPIC, RESPONSE_TOPIC, ERROR_TOPIC];

/// Classification of an inbound topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicKind {
    /// Device event.
    Event,
    /// Command response.
    Response,
    /// Request failure reported by the controller.
    Error,
    /// Any other topic.
    Other,
}

impl TopicKind {
    /// Classifies a topic name.
    #[must_use]
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            EVENT_TOPIC => Self::Event,
            RESPONSE_TOPIC => Self::Response,
            ERROR_TOPIC => Self::Error,
            _ => Self::Other,
        }
    }

    /// Returns `true` for topics whose payload may carry device properties.
    #[must_use]
    pub fn carries_properties(self) -> bool {
        matches!(self, Self::Event | Self::Response)
    }
}

/// A message received from the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// The topic the message arrived on.
    pub topic: String,
    /// The raw payload.
    pub payload: Vec<u8>,
}

impl InboundMessage {
    /// Creates an inbound message.
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }

    /// Returns the kind of topic this message arrived on.
    #[must_use]
    pub fn kind(&self) -> TopicKind {
        TopicKind::from_topic(&self.topic)
    }

    /// Returns the payload as text, replacing invalid UTF-8.
    #[must_use]
    pub fn payload_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
}

/// Destination for outbound device commands.
#[allow(async_fn_in_trait)]
pub trait CommandSink {
    /// Publishes a command.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command cannot be sent.
    async fn send(&self, command: &DeviceCommand) -> Result<(), ProtocolError>;
}
