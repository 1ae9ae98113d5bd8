// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Service configuration: a JSON file with environment variable overrides.
//!
//! ```json
//! {
//!   "broker": "mqtts://192.168.1.50:8884",
//!   "username": "hobby",
//!   "password": "<jwt>",
//!   "HVAC-TH-Uuid": "a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8",
//!   "smallTempDelta": 1.0,
//!   "moderateTempDelta": 2.5,
//!   "hysteresis": 5,
//!   "caFile": "niko-ca.pem"
//! }
//! ```
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `NHC_HVAC_BROKER` | `broker` |
//! | `NHC_HVAC_USERNAME` | `username` |
//! | `NHC_HVAC_PASSWORD` | `password` |
//! | `NHC_HVAC_DEVICE_UUID` | `HVAC-TH-Uuid` |

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::control::{FanController, FanThresholds, HysteresisGate};
use crate::controller::Controller;
use crate::error::ConfigError;
use crate::protocol::BrokerAddress;
use crate::types::DeviceId;

/// Log filter used when neither `RUST_LOG` nor `logFilter` is set.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Top-level configuration.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Broker address (`mqtts://host:port`, `host[:port]`, ...).
    pub broker: String,
    /// Broker user name. Empty means anonymous.
    #[serde(default)]
    pub username: String,
    /// Broker password (the Hobby API token).
    #[serde(default)]
    pub password: String,
    /// UUID of the thermostat to control.
    #[serde(rename = "HVAC-TH-Uuid")]
    pub device_uuid: String,
    /// Largest temperature gap served by the low fan speed.
    pub small_temp_delta: f64,
    /// Largest temperature gap served by the medium fan speed.
    pub moderate_temp_delta: f64,
    /// Minimum minutes between two non-forced fan commands.
    pub hysteresis: i64,
    /// MQTT client identifier.
    #[serde(default = "default_client_id")]
    pub client_id: String,
    /// PEM CA certificate trusted for TLS connections.
    #[serde(default)]
    pub ca_file: Option<PathBuf>,
    /// Filter directive (`RUST_LOG` syntax).
    #[serde(default)]
    pub log_filter: Option<String>,
}

fn default_client_id() -> String {
    "nhc-hvac".to_string()
}

impl Config {
    /// Loads the file at `path`, applies environment overrides and validates
    /// the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or holds
    /// invalid values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut config = Self::from_json_str(&content)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parses a configuration without validating it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the JSON does not match the schema.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(ConfigError::Parse)
    }

    /// Applies overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("NHC_HVAC_BROKER") {
            self.broker = val;
        }
        if let Some(val) = lookup("NHC_HVAC_USERNAME") {
            self.username = val;
        }
        if let Some(val) = lookup("NHC_HVAC_PASSWORD") {
            self.password = val;
        }
        if let Some(val) = lookup("NHC_HVAC_DEVICE_UUID") {
            self.device_uuid = val;
        }
    }

    /// Checks every value the service depends on.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let address = self.broker_address()?;
        if address.is_tls() && self.ca_file.is_none() {
            return Err(ConfigError::Validation(format!(
                "broker: {address} uses TLS, caFile is required"
            )));
        }
        if self.client_id.is_empty() {
            return Err(ConfigError::Validation(
                "clientId: must not be empty".to_string(),
            ));
        }
        self.device_id()?;
        self.thresholds()?;
        self.hysteresis_minutes()?;
        Ok(())
    }

    /// Returns the parsed broker address.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `broker` is empty or malformed.
    pub fn broker_address(&self) -> Result<BrokerAddress, ConfigError> {
        if self.broker.trim().is_empty() {
            return Err(ConfigError::Validation("broker: must not be empty".to_string()));
        }
        self.broker
            .parse()
            .map_err(|e| ConfigError::Validation(format!("broker: {e}")))
    }

    /// Returns the tracked thermostat identifier.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `HVAC-TH-Uuid` is not a UUID.
    pub fn device_id(&self) -> Result<DeviceId, ConfigError> {
        self.device_uuid
            .parse()
            .map_err(|e| ConfigError::Validation(format!("HVAC-TH-Uuid: {e}")))
    }

    /// Returns the fan speed thresholds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` unless
    /// `0 <= smallTempDelta < moderateTempDelta`.
    pub fn thresholds(&self) -> Result<FanThresholds, ConfigError> {
        FanThresholds::new(self.small_temp_delta, self.moderate_temp_delta).map_err(|e| {
            ConfigError::Validation(format!("smallTempDelta/moderateTempDelta: {e}"))
        })
    }

    /// Returns the hysteresis interval in minutes.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `hysteresis` is negative or too
    /// large.
    pub fn hysteresis_minutes(&self) -> Result<u32, ConfigError> {
        u32::try_from(self.hysteresis).map_err(|_| {
            ConfigError::Validation(format!(
                "hysteresis: {} is not a valid number of minutes",
                self.hysteresis
            ))
        })
    }

    /// Returns the broker credentials, if a user name is set.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        if self.username.is_empty() {
            None
        } else {
            Some((&self.username, &self.password))
        }
    }

    /// Returns the configured log filter, or [`DEFAULT_LOG_FILTER`].
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    /// Builds the controller for the configured thermostat.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a controller setting is invalid.
    pub fn controller(&self) -> Result<Controller, ConfigError> {
        Ok(Controller::new(
            self.device_id()?,
            FanController::new(self.thresholds()?),
            HysteresisGate::from_minutes(self.hysteresis_minutes()?),
        ))
    }

    /// Returns a broker builder preconfigured with the connection settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the broker address is invalid.
    #[cfg(feature = "mqtt")]
    pub fn broker_builder(&self) -> Result<crate::protocol::NhcBrokerBuilder, ConfigError> {
        let mut builder = crate::protocol::NhcBroker::builder()
            .address(self.broker_address()?)
            .client_id(&self.client_id);

        if let Some((username, password)) = self.credentials() {
            builder = builder.credentials(username, password);
        }
        if let Some(ref ca_file) = self.ca_file {
            builder = builder.tls_ca(ca_file);
        }
        Ok(builder)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("broker", &self.broker)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("device_uuid", &self.device_uuid)
            .field("small_temp_delta", &self.small_temp_delta)
            .field("moderate_temp_delta", &self.moderate_temp_delta)
            .field("hysteresis", &self.hysteresis)
            .field("client_id", &self.client_id)
            .field("ca_file", &self.ca_file)
            .field("log_filter", &self.log_filter)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const SAMPLE: &str = r#"{
        "broker": "mqtts://192.168.1.50",
        "username": "hobby",
        "password": "secret-token",
        "HVAC-TH-Uuid": "a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8",
        "smallTempDelta": 1.0,
        "moderateTempDelta": 2.5,
        "hysteresis": 5,
        "caFile": "/etc/nhc/ca.pem"
    }"#;

    fn sample() -> Config {
        Config::from_json_str(SAMPLE).unwrap()
    }

    #[test]
    fn parses_sample() {
        let config = sample();
        config.validate().unwrap();

        assert_eq!(
            config.broker_address().unwrap(),
            BrokerAddress::new("192.168.1.50", 8884, true)
        );
        assert_eq!(config.credentials(), Some(("hobby", "secret-token")));
        assert_eq!(config.hysteresis_minutes().unwrap(), 5);
        assert_eq!(config.client_id, "nhc-hvac");
        assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
        assert_eq!(config.thresholds().unwrap().moderate(), 2.5);
    }

    #[test]
    fn missing_required_key_fails() {
        let result = Config::from_json_str(r#"{"broker": "localhost"}"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn overrides_replace_file_values() {
        let env: HashMap<&str, &str> = [
            ("NHC_HVAC_BROKER", "mqtt://10.0.0.2:1884"),
            ("NHC_HVAC_DEVICE_UUID", "00000000-0000-0000-0000-000000000001"),
        ]
        .into_iter()
        .collect();

        let mut config = sample();
        config.apply_overrides(|key| env.get(key).map(ToString::to_string));

        assert_eq!(config.broker, "mqtt://10.0.0.2:1884");
        assert_eq!(config.username, "hobby");
        assert_eq!(
            config.device_id().unwrap().to_string(),
            "00000000-0000-0000-0000-000000000001"
        );
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let mut config = sample();
        config.small_temp_delta = 3.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("smallTempDelta"));
    }

    #[test]
    fn rejects_negative_delta_and_hysteresis() {
        let mut config = sample();
        config.small_temp_delta = -0.5;
        assert!(config.validate().is_err());

        let mut config = sample();
        config.hysteresis = -1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("hysteresis"));
    }

    #[test]
    fn rejects_bad_uuid_and_empty_broker() {
        let mut config = sample();
        config.device_uuid = "thermostat".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("HVAC-TH-Uuid"));

        let mut config = sample();
        config.broker = "  ".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("broker"));
    }

    #[test]
    fn tls_requires_ca_file() {
        let mut config = sample();
        config.ca_file = None;
        assert!(config.validate().unwrap_err().to_string().contains("caFile"));

        config.broker = "192.168.1.50:1883".to_string();
        config.validate().unwrap();
    }

    #[test]
    fn empty_username_means_anonymous() {
        let mut config = sample();
        config.username = String::new();
        assert_eq!(config.credentials(), None);
    }

    #[test]
    fn debug_redacts_password() {
        let debug = format!("{:?}", sample());
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load("/nonexistent/nhc-hvac/config.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn builds_controller() {
        let controller = sample().controller().unwrap();
        assert_eq!(
            controller.gate().interval(),
            chrono::TimeDelta::minutes(5)
        );
    }
}
