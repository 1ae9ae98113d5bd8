// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT connection to the Niko Hobby API.
//!
//! # Examples
//!
//! ```no_run
//! use nhc_hvac::protocol::NhcBroker;
//!
//! # async fn example() -> Result<(), nhc_hvac::error::ProtocolError> {
//! let (broker, mut inbound) = NhcBroker::builder()
//!     .host("192.168.1.50")
//!     .port(8884)
//!     .credentials("hobby", "token")
//!     .tls_ca("niko-ca.pem")
//!     .build()
//!     .await?;
//!
//! while let Some(message) = inbound.recv().await {
//!     println!("{}: {} bytes", message.topic, message.payload.len());
//! }
//!
//! broker.disconnect().await?;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rumqttc::{AsyncClient, EventLoop, MqttOptions, QoS, Transport};
use tokio::sync::{mpsc, oneshot};

use super::{
    BrokerAddress, COMMAND_TOPIC, CommandSink, DEFAULT_PORT, InboundMessage, SUBSCRIBED_TOPICS,
};
use crate::error::ProtocolError;
use crate::message::DeviceCommand;

/// Delay before polling again after a connection error.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Configuration for a Hobby API broker connection.
#[derive(Debug, Clone)]
pub struct NhcBrokerConfig {
    address: BrokerAddress,
    credentials: Option<(String, String)>,
    client_id: String,
    ca_certificate: Option<PathBuf>,
    keep_alive: Duration,
    connection_timeout: Duration,
    queue_capacity: usize,
}

impl Default for NhcBrokerConfig {
    fn default() -> Self {
        Self {
            address: BrokerAddress::new("", DEFAULT_PORT, false),
            credentials: None,
            client_id: "nhc-hvac".to_string(),
            ca_certificate: None,
            keep_alive: Duration::from_secs(30),
            connection_timeout: Duration::from_secs(10),
            queue_capacity: 64,
        }
    }
}

/// A connection to the Hobby API broker.
///
/// Cheaply cloneable. Inbound messages are delivered through the receiver
/// returned by [`NhcBrokerBuilder::build`]; commands go out through the
/// [`CommandSink`] implementation.
#[derive(Clone)]
pub struct NhcBroker {
    inner: Arc<NhcBrokerInner>,
}

struct NhcBrokerInner {
    client: AsyncClient,
    config: NhcBrokerConfig,
    connected: AtomicBool,
    closing: AtomicBool,
}

impl NhcBroker {
    /// Creates a new builder for configuring a broker connection.
    #[must_use]
    pub fn builder() -> NhcBrokerBuilder {
        NhcBrokerBuilder::default()
    }

    /// Returns whether the broker is currently connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::Acquire)
    }

    /// Returns the broker address.
    #[must_use]
    pub fn address(&self) -> &BrokerAddress {
        &self.inner.config.address
    }

    /// Publishes a raw payload on the command topic.
    async fn publish(&self, payload: String) -> Result<(), ProtocolError> {
        if !self.is_connected() {
            return Err(ProtocolError::NotConnected);
        }

        tracing::debug!(topic = COMMAND_TOPIC, payload = %payload, "Publishing MQTT command");

        self.inner
            .client
            .publish(COMMAND_TOPIC, QoS::AtMostOnce, false, payload)
            .await
            .map_err(ProtocolError::Mqtt)
    }

    /// Disconnects from the broker.
    ///
    /// The event loop stops once the disconnect is sent, which closes the
    /// inbound channel.
    ///
    /// # Errors
    ///
    /// Returns error if the disconnect request cannot be queued.
    pub async fn disconnect(&self) -> Result<(), ProtocolError> {
        tracing::info!(address = %self.inner.config.address, "Disconnecting from MQTT broker");

        self.inner.closing.store(true, Ordering::Release);
        self.inner
            .client
            .disconnect()
            .await
            .map_err(ProtocolError::Mqtt)?;

        self.inner.connected.store(false, Ordering::Release);
        Ok(())
    }
}

impl CommandSink for NhcBroker {
    async fn send(&self, command: &DeviceCommand) -> Result<(), ProtocolError> {
        let payload = command.encode()?;
        self.publish(payload).await
    }
}

impl std::fmt::Debug for NhcBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NhcBroker")
            .field("address", &self.inner.config.address)
            .field("client_id", &self.inner.config.client_id)
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Builder for an [`NhcBroker`].
#[derive(Debug, Default)]
pub struct NhcBrokerBuilder {
    config: NhcBrokerConfig,
}

impl NhcBrokerBuilder {
    /// Sets the full broker address.
    #[must_use]
    pub fn address(mut self, address: BrokerAddress) -> Self {
        self.config.address = address;
        self
    }

    /// Sets the broker host address.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        let address = &self.config.address;
        self.config.address = BrokerAddress::new(host, address.port(), address.is_tls());
        self
    }

    /// Sets the broker port (default: 1883).
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        let address = &self.config.address;
        self.config.address = BrokerAddress::new(address.host(), port, address.is_tls());
        self
    }

    /// Sets authentication credentials.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets the MQTT client identifier (default: `nhc-hvac`).
    #[must_use]
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.config.client_id = client_id.into();
        self
    }

    /// Enables TLS, trusting the PEM CA certificate at `path`.
    #[must_use]
    pub fn tls_ca(mut self, path: impl Into<PathBuf>) -> Self {
        let address = &self.config.address;
        self.config.address = BrokerAddress::new(address.host(), address.port(), true);
        self.config.ca_certificate = Some(path.into());
        self
    }

    /// Sets the keep-alive interval (default: 30 seconds).
    #[must_use]
    pub fn keep_alive(mut self, duration: Duration) -> Self {
        self.config.keep_alive = duration;
        self
    }

    /// Sets the connection timeout (default: 10 seconds).
    #[must_use]
    pub fn connection_timeout(mut self, duration: Duration) -> Self {
        self.config.connection_timeout = duration;
        self
    }

    /// Sets the capacity of the inbound message queue (default: 64).
    #[must_use]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity.max(1);
        self
    }

    /// Connects to the broker.
    ///
    /// On every (re)connection the Hobby API topics are subscribed and a
    /// device list is requested, so the first inbound messages carry a full
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Host is not set
    /// - TLS is requested without a readable CA certificate
    /// - Connection fails or times out
    pub async fn build(self) -> Result<(NhcBroker, mpsc::Receiver<InboundMessage>), ProtocolError> {
        let address = &self.config.address;
        if address.host().is_empty() {
            return Err(ProtocolError::InvalidAddress(
                "MQTT broker host is required".to_string(),
            ));
        }

        let mut mqtt_options =
            MqttOptions::new(&self.config.client_id, address.host(), address.port());
        mqtt_options.set_keep_alive(self.config.keep_alive);
        mqtt_options.set_clean_session(true);

        if let Some((ref username, ref password)) = self.config.credentials {
            mqtt_options.set_credentials(username, password);
        }

        if address.is_tls() {
            let Some(ref ca_path) = self.config.ca_certificate else {
                return Err(ProtocolError::InvalidAddress(format!(
                    "{address} uses TLS but no CA certificate is configured"
                )));
            };
            let ca = std::fs::read(ca_path)?;
            mqtt_options.set_transport(Transport::tls(ca, None, None));
        }

        let (client, event_loop) = AsyncClient::new(mqtt_options, 10);
        let (inbound_tx, inbound_rx) = mpsc::channel(self.config.queue_capacity);

        let broker = NhcBroker {
            inner: Arc::new(NhcBrokerInner {
                client,
                config: self.config.clone(),
                connected: AtomicBool::new(false),
                closing: AtomicBool::new(false),
            }),
        };

        let (connack_tx, connack_rx) = oneshot::channel();

        let broker_clone = broker.clone();
        tokio::spawn(async move {
            handle_broker_events(event_loop, broker_clone, inbound_tx, Some(connack_tx)).await;
        });

        let timeout = self.config.connection_timeout;
        match tokio::time::timeout(timeout, connack_rx).await {
            Ok(Ok(())) => {
                tracing::info!(address = %self.config.address, "Connected to MQTT broker");
            }
            Ok(Err(_)) => {
                return Err(ProtocolError::ConnectionFailed(
                    "MQTT event loop terminated unexpectedly".to_string(),
                ));
            }
            Err(_) => {
                return Err(ProtocolError::ConnectionFailed(format!(
                    "MQTT connection timeout after {}s",
                    timeout.as_secs()
                )));
            }
        }

        Ok((broker, inbound_rx))
    }
}

/// Subscribes to the Hobby API topics and requests the device list.
///
/// Runs inside the event loop task, so requests are queued without waiting.
fn on_connected(broker: &NhcBroker) {
    let client = &broker.inner.client;

    for topic in SUBSCRIBED_TOPICS {
        match client.try_subscribe(topic, QoS::AtMostOnce) {
            Ok(()) => tracing::debug!(topic, "Subscribed to topic"),
            Err(e) => tracing::warn!(topic, error = %e, "Failed to subscribe"),
        }
    }

    match DeviceCommand::ListDevices.encode() {
        Ok(payload) => {
            if let Err(e) = client.try_publish(COMMAND_TOPIC, QoS::AtMostOnce, false, payload) {
                tracing::warn!(error = %e, "Failed to request device list");
            }
        }
        Err(e) => tracing::warn!(error = %e, "Failed to encode device list request"),
    }
}

/// Drives the MQTT event loop and forwards publishes to the inbound queue.
async fn handle_broker_events(
    mut event_loop: EventLoop,
    broker: NhcBroker,
    inbound_tx: mpsc::Sender<InboundMessage>,
    connack_tx: Option<oneshot::Sender<()>>,
) {
    use rumqttc::{Event, Outgoing, Packet};

    let mut connack_tx = connack_tx;

    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(connack))) => {
                tracing::debug!(?connack, "MQTT broker connected");
                broker.inner.connected.store(true, Ordering::Release);
                on_connected(&broker);
                if let Some(tx) = connack_tx.take() {
                    let _ = tx.send(());
                }
            }
            Ok(Event::Incoming(Packet::SubAck(suback))) => {
                tracing::debug!(?suback, "MQTT subscription acknowledged");
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                tracing::debug!(
                    topic = %publish.topic,
                    bytes = publish.payload.len(),
                    "MQTT message received"
                );
                let message = InboundMessage::new(publish.topic, publish.payload.to_vec());
                if inbound_tx.send(message).await.is_err() {
                    tracing::debug!("Inbound queue closed, stopping MQTT event loop");
                    break;
                }
            }
            Ok(Event::Incoming(Packet::Disconnect) | Event::Outgoing(Outgoing::Disconnect)) => {
                tracing::info!("MQTT broker disconnected");
                broker.inner.connected.store(false, Ordering::Release);
                break;
            }
            Ok(_) => {}
            Err(e) => {
                broker.inner.connected.store(false, Ordering::Release);
                if connack_tx.is_none() && !broker.inner.closing.load(Ordering::Acquire) {
                    tracing::error!(error = %e, "MQTT broker event loop error, reconnecting");
                    tokio::time::sleep(RECONNECT_DELAY).await;
                    continue;
                }
                tracing::error!(error = %e, "MQTT broker event loop error");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_default_values() {
        let builder = NhcBrokerBuilder::default();
        assert_eq!(builder.config.address.port(), 1883);
        assert!(builder.config.address.host().is_empty());
        assert!(!builder.config.address.is_tls());
        assert!(builder.config.credentials.is_none());
        assert_eq!(builder.config.client_id, "nhc-hvac");
        assert_eq!(builder.config.keep_alive, Duration::from_secs(30));
        assert_eq!(builder.config.connection_timeout, Duration::from_secs(10));
        assert_eq!(builder.config.queue_capacity, 64);
    }

    #[test]
    fn builder_chain() {
        let builder = NhcBrokerBuilder::default()
            .host("192.168.1.50")
            .port(8884)
            .credentials("hobby", "secret")
            .client_id("living-room")
            .tls_ca("/etc/nhc/ca.pem")
            .keep_alive(Duration::from_secs(45))
            .connection_timeout(Duration::from_secs(15))
            .queue_capacity(0);

        assert_eq!(
            builder.config.address,
            BrokerAddress::new("192.168.1.50", 8884, true)
        );
        assert_eq!(
            builder.config.credentials,
            Some(("hobby".to_string(), "secret".to_string()))
        );
        assert_eq!(builder.config.client_id, "living-room");
        assert_eq!(
            builder.config.ca_certificate,
            Some(PathBuf::from("/etc/nhc/ca.pem"))
        );
        assert_eq!(builder.config.keep_alive, Duration::from_secs(45));
        assert_eq!(builder.config.connection_timeout, Duration::from_secs(15));
        assert_eq!(builder.config.queue_capacity, 1);
    }

    #[tokio::test]
    async fn builder_missing_host_fails() {
        let result = NhcBrokerBuilder::default().build().await;
        assert!(matches!(result, Err(ProtocolError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn tls_without_ca_fails() {
        let result = NhcBroker::builder()
            .address(BrokerAddress::new("hobby.local", 8884, true))
            .build()
            .await;
        assert!(matches!(result, Err(ProtocolError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn unreadable_ca_fails() {
        let result = NhcBroker::builder()
            .host("hobby.local")
            .tls_ca("/nonexistent/nhc-hvac/ca.pem")
            .build()
            .await;
        assert!(matches!(result, Err(ProtocolError::Tls(_))));
    }
}
