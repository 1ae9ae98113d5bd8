// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The long-running control loop.
//!
//! [`run`] drains the inbound queue one message at a time, so the snapshot
//! and the hysteresis gate only ever have a single writer. A rejected
//! publish is logged and dropped; the gate is only advanced once the sink
//! accepted the command.

use chrono::Utc;
use tokio::sync::{mpsc, watch};

use crate::controller::{Controller, Verdict};
use crate::protocol::{CommandSink, InboundMessage, TopicKind};

/// Runs the control loop until `shutdown` flips to `true` or the inbound
/// queue closes.
///
/// Messages still queued when shutdown is signalled are discarded.
/// Returns the controller so callers can inspect the final state.
pub async fn run<S: CommandSink>(
    mut controller: Controller,
    mut inbound: mpsc::Receiver<InboundMessage>,
    sink: &S,
    mut shutdown: watch::Receiver<bool>,
) -> Controller {
    tracing::info!(device = %controller.device().id(), "Thermostat control loop started");

    loop {
        if *shutdown.borrow_and_update() {
            break;
        }

        tokio::select! {
            biased;

            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            message = inbound.recv() => {
                let Some(message) = message else {
                    tracing::info!("Inbound queue closed");
                    break;
                };
                handle_message(&mut controller, &message, sink).await;
            }
        }
    }

    inbound.close();
    tracing::info!("Thermostat control loop stopped");
    controller
}

/// Processes one inbound message.
pub async fn handle_message<S: CommandSink>(
    controller: &mut Controller,
    message: &InboundMessage,
    sink: &S,
) {
    match message.kind() {
        TopicKind::Error => {
            tracing::warn!(
                topic = %message.topic,
                payload = %message.payload_text(),
                "Hobby API reported an error"
            );
        }
        kind if kind.carries_properties() => {
            let verdict = match controller.handle_payload(&message.payload, Utc::now()) {
                Ok(verdict) => verdict,
                Err(e) => {
                    tracing::warn!(topic = %message.topic, error = %e, "Failed to decode message");
                    return;
                }
            };

            if let Verdict::Emit {
                command, forced, ..
            } = verdict
            {
                match sink.send(&command).await {
                    Ok(()) => {
                        controller.record_emit(Utc::now());
                        tracing::info!(
                            command = ?command,
                            forced,
                            "Fan speed update sent"
                        );
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to send fan speed update");
                    }
                }
            }
        }
        _ => {
            tracing::debug!(topic = %message.topic, "Ignoring message on unexpected topic");
        }
    }
}
