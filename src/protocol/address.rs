// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broker address parsing.

use std::fmt;
use std::str::FromStr;

use crate::error::ProtocolError;

/// Default port for plain MQTT.
pub const DEFAULT_PORT: u16 = 1883;

/// Port of the Niko Hobby API, which only accepts TLS.
pub const DEFAULT_TLS_PORT: u16 = 8884;

/// Host, port and transport security of an MQTT broker.
///
/// # Examples
///
/// ```
/// use nhc_hvac::protocol::BrokerAddress;
///
/// let addr: BrokerAddress = "mqtts://192.168.1.50".parse().unwrap();
/// assert_eq!(addr.host(), "192.168.1.50");
/// assert_eq!(addr.port(), 8884);
/// assert!(addr.is_tls());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerAddress {
    host: String,
    port: u16,
    tls: bool,
}

impl BrokerAddress {
    /// Creates an address from its parts.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16, tls: bool) -> Self {
        Self {
            host: host.into(),
            port,
            tls,
        }
    }

    /// Returns the broker host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the broker port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns `true` if the connection must use TLS.
    #[must_use]
    pub fn is_tls(&self) -> bool {
        self.tls
    }
}

impl fmt::Display for BrokerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = if self.tls { "mqtts" } else { "mqtt" };
        write!(f, "{scheme}://{}:{}", self.host, self.port)
    }
}

impl FromStr for BrokerAddress {
    type Err = ProtocolError;

    fn from_str(url: &str) -> Result<Self, Self::Err> {
        let url = url.trim();
        let (rest, tls) = if let Some(rest) = url
            .strip_prefix("mqtts://")
            .or_else(|| url.strip_prefix("ssl://"))
        {
            (rest, true)
        } else if let Some(rest) = url
            .strip_prefix("mqtt://")
            .or_else(|| url.strip_prefix("tcp://"))
        {
            (rest, false)
        } else {
            (url, false)
        };
        let rest = rest.trim_end_matches('/');

        let (host, port) = if let Some((h, p)) = rest.rsplit_once(':') {
            let port = p
                .parse()
                .map_err(|_| ProtocolError::InvalidAddress(format!("Invalid port: {p}")))?;
            (h, port)
        } else if tls {
            (rest, DEFAULT_TLS_PORT)
        } else {
            (rest, DEFAULT_PORT)
        };

        if host.is_empty() {
            return Err(ProtocolError::InvalidAddress(format!(
                "Missing host in {url:?}"
            )));
        }

        Ok(Self::new(host, port, tls))
    }
}
