// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `nhc_hvac` - Fan-speed control for Niko Home Control HVAC thermostats.
//!
//! The crate mirrors one thermostat's properties from the Niko Hobby MQTT API
//! and picks its fan speed from the gap between room temperature and
//! setpoint:
//!
//! - **Property parsing**: lenient decoding of `Properties` payloads
//! - **State store**: a snapshot of the thermostat plus the set of fields
//!   each update changed
//! - **Fan rule**: `Low`, `Medium` or `High` from two temperature deltas
//! - **Hysteresis**: a minimum interval between commands, bypassed when the
//!   user changes a setting
//!
//! # Quick Start
//!
//! ```no_run
//! use nhc_hvac::{Config, service};
//! use tokio::sync::watch;
//!
//! #[tokio::main]
//! async fn main() -> nhc_hvac::Result<()> {
//!     let config = Config::load("config.json")?;
//!     let controller = config.controller()?;
//!     let (broker, inbound) = config.broker_builder()?.build().await?;
//!
//!     let (_shutdown_tx, shutdown_rx) = watch::channel(false);
//!     service::run(controller, inbound, &broker, shutdown_rx).await;
//!
//!     broker.disconnect().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Without a broker
//!
//! [`Controller`] is synchronous and can be driven directly:
//!
//! ```
//! use chrono::Utc;
//! use nhc_hvac::{Controller, Verdict};
//! use nhc_hvac::control::{FanController, FanThresholds, HysteresisGate};
//!
//! let mut controller = Controller::new(
//!     "a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8".parse().unwrap(),
//!     FanController::new(FanThresholds::new(1.0, 2.5).unwrap()),
//!     HysteresisGate::from_minutes(5),
//! );
//!
//! let verdict = controller
//!     .handle_payload(br#"{"Method":"devices.status"}"#, Utc::now())
//!     .unwrap();
//! assert_eq!(verdict, Verdict::Ignored);
//! ```

pub mod config;
pub mod control;
pub mod controller;
pub mod error;
pub mod message;
pub mod properties;
pub mod protocol;
pub mod service;
pub mod state;
pub mod types;

pub use config::Config;
pub use controller::{Controller, Verdict};
pub use error::{ConfigError, Error, ParseError, ProtocolError, Result, ValueError};
pub use message::{DeviceCommand, Envelope};
pub use properties::PropertyUpdate;
#[cfg(feature = "mqtt")]
pub use protocol::{NhcBroker, NhcBrokerBuilder};
pub use protocol::{CommandSink, InboundMessage, TopicKind};
pub use state::{ChangeSet, Device, DeviceProperties, Field};
pub use types::{DeviceId, FanSpeed, OperationMode};
