// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `nhc_hvac` crate.
//!
//! Only whole-message and transport failures are errors. A single property
//! that cannot be parsed is not an error: it simply reads as absent. An update
//! for another device is not an error either: it is ignored.

use thiserror::Error;

/// The main error type for this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while talking to the broker.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while decoding a message.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred while loading the configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// An unknown fan speed string was provided.
    #[error("invalid fan speed: {0}")]
    InvalidFanSpeed(String),

    /// Temperature deltas must satisfy `0 <= small < moderate`.
    #[error("invalid temperature deltas: small {small}, moderate {moderate}")]
    InvalidThresholds {
        /// The small temperature delta.
        small: f64,
        /// The moderate temperature delta.
        moderate: f64,
    },

    /// A device identifier is not a valid UUID.
    #[error("invalid device uuid: {0}")]
    InvalidDeviceId(String),
}

/// Errors related to the MQTT transport.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// MQTT client request failed.
    #[cfg(feature = "mqtt")]
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// Connection to the broker failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid broker address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The broker connection is not up.
    #[error("broker is not connected")]
    NotConnected,

    /// A command could not be serialized.
    #[error("failed to encode command: {0}")]
    Encode(#[from] ParseError),

    /// Failed to read TLS material.
    #[error("failed to read TLS certificate: {0}")]
    Tls(#[from] std::io::Error),
}

/// Errors related to decoding Hobby API messages.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Payload is valid JSON but not a Hobby API envelope.
    #[error("unexpected message format: {0}")]
    UnexpectedFormat(String),
}

/// Errors raised while loading the service configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// The path that was being read.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for the expected schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A configuration value is out of range or missing.
    #[error("invalid config: {0}")]
    Validation(String),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::InvalidThresholds {
            small: 2.0,
            moderate: 1.0,
        };
        assert_eq!(
            err.to_string(),
            "invalid temperature deltas: small 2, moderate 1"
        );
    }

    #[test]
    fn error_from_value_error() {
        let value_err = ValueError::InvalidFanSpeed("turbo".to_string());
        let err: Error = value_err.into();
        assert!(matches!(err, Error::Value(ValueError::InvalidFanSpeed(_))));
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::UnexpectedFormat("missing Params".to_string());
        assert_eq!(err.to_string(), "unexpected message format: missing Params");
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::Validation("hysteresis must be >= 0".to_string());
        assert_eq!(err.to_string(), "invalid config: hysteresis must be >= 0");
    }
}
