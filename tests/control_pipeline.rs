// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end tests of the thermostat pipeline through the public API.

use std::sync::Mutex;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use nhc_hvac::control::{FanController, FanThresholds, HysteresisGate};
use nhc_hvac::protocol::{EVENT_TOPIC, RESPONSE_TOPIC};
use nhc_hvac::{
    CommandSink, Controller, DeviceCommand, FanSpeed, Field, InboundMessage, OperationMode,
    ProtocolError, Verdict, service,
};
use serde_json::json;
use tokio::sync::{mpsc, watch};

const HVAC: &str = "a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8";
const LIGHT: &str = "0f0e0d0c-0b0a-0908-0706-050403020100";

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 1, 14, 0, 0).unwrap()
}

fn controller() -> Controller {
    Controller::new(
        HVAC.parse().unwrap(),
        FanController::new(FanThresholds::new(1.0, 2.5).unwrap()),
        HysteresisGate::from_minutes(5),
    )
}

fn device_list() -> String {
    json!({
        "Method": "devices.list",
        "Params": [{
            "Devices": [
                {
                    "Uuid": LIGHT,
                    "Name": "Kitchen",
                    "Model": "light",
                    "Properties": [{"Status": "On"}, {"Brightness": "40"}]
                },
                {
                    "Uuid": HVAC,
                    "Name": "Living room",
                    "Model": "hvacthermostat",
                    "Properties": [
                        {"ThermostatOn": "On"},
                        {"HvacOn": "True"},
                        {"Program": "Day"},
                        {"OperationMode": "Cooling"},
                        {"AmbientTemperature": "24.0"},
                        {"SetpointTemperature": "22.0"},
                        {"FanSpeed": "Low"},
                        {"OverruleActive": "False"},
                        {"OverruleSetpoint": "0.0"},
                        {"OverruleTime": "00:00"}
                    ]
                }
            ]
        }]
    })
    .to_string()
}

fn status(uuid: &str, properties: &serde_json::Value) -> String {
    json!({
        "Method": "devices.status",
        "Params": [{"Devices": [{"Uuid": uuid, "Properties": properties}]}]
    })
    .to_string()
}

mod pipeline {
    use super::*;

    #[test]
    fn device_list_snapshot_emits_medium() {
        let mut controller = controller();

        let verdict = controller
            .handle_payload(device_list().as_bytes(), t0())
            .unwrap();

        let Verdict::Emit {
            forced, command, ..
        } = verdict
        else {
            panic!("expected an emit, got {verdict:?}");
        };
        assert!(forced);
        assert_eq!(
            command,
            DeviceCommand::set_fan_speed(HVAC.parse().unwrap(), FanSpeed::Medium)
        );

        let props = controller.properties();
        assert_eq!(props.operation_mode(), Some(OperationMode::Cooling));
        assert_eq!(props.program(), Some("Day"));
        assert_eq!(props.overrule_active(), Some(false));
    }

    #[test]
    fn other_devices_are_ignored() {
        let mut controller = controller();
        let payload = status(LIGHT, &json!([{"ThermostatOn": "On"}]));

        let verdict = controller.handle_payload(payload.as_bytes(), t0()).unwrap();

        assert_eq!(verdict, Verdict::Ignored);
        assert!(controller.properties().thermostat_on().is_none());
    }

    #[test]
    fn hysteresis_suppresses_drift_but_not_user_changes() {
        let mut controller = controller();
        controller
            .handle_payload(device_list().as_bytes(), t0())
            .unwrap();
        controller.record_emit(t0());

        // Room warms up one minute later: High is due but the gate is closed
        let warmer = status(HVAC, &json!([{"AmbientTemperature": "25.0"}]));
        let later = t0() + TimeDelta::minutes(1);
        let verdict = controller.handle_payload(warmer.as_bytes(), later).unwrap();
        assert_eq!(
            verdict,
            Verdict::Suppressed {
                changes: [Field::AmbientTemperature].into_iter().collect(),
                target: FanSpeed::High,
            }
        );

        // User lowers the setpoint: forced through immediately
        let setpoint = status(HVAC, &json!([{"SetpointTemperature": "21.0"}]));
        let verdict = controller
            .handle_payload(setpoint.as_bytes(), later + TimeDelta::seconds(10))
            .unwrap();
        assert_eq!(
            verdict.command(),
            Some(&DeviceCommand::set_fan_speed(
                HVAC.parse().unwrap(),
                FanSpeed::High
            ))
        );
    }

    #[test]
    fn drift_emits_once_interval_has_passed() {
        let mut controller = controller();
        controller
            .handle_payload(device_list().as_bytes(), t0())
            .unwrap();
        controller.record_emit(t0());

        let warmer = status(HVAC, &json!([{"AmbientTemperature": "25.0"}]));
        let exactly = t0() + TimeDelta::minutes(5);
        let verdict = controller.handle_payload(warmer.as_bytes(), exactly).unwrap();
        assert!(matches!(verdict, Verdict::Suppressed { .. }));

        let warmest = status(HVAC, &json!([{"AmbientTemperature": "25.5"}]));
        let after = exactly + TimeDelta::seconds(1);
        let verdict = controller.handle_payload(warmest.as_bytes(), after).unwrap();
        assert!(matches!(verdict, Verdict::Emit { forced: false, .. }));
    }

    #[test]
    fn thermostat_off_never_emits() {
        let mut controller = controller();
        controller
            .handle_payload(device_list().as_bytes(), t0())
            .unwrap();

        let off = status(
            HVAC,
            &json!([{"ThermostatOn": "Off"}, {"SetpointTemperature": "18.0"}]),
        );
        let verdict = controller.handle_payload(off.as_bytes(), t0()).unwrap();

        assert!(matches!(verdict, Verdict::NoAction { .. }));
        assert!(verdict.changes().contains(Field::ThermostatOn));
    }

    #[test]
    fn unparseable_field_is_dropped_alone() {
        let mut controller = controller();
        controller
            .handle_payload(device_list().as_bytes(), t0())
            .unwrap();

        let mixed = status(
            HVAC,
            &json!([{"ThermostatOn": "maybe"}, {"AmbientTemperature": "23.0"}]),
        );
        let verdict = controller.handle_payload(mixed.as_bytes(), t0()).unwrap();

        assert!(!verdict.changes().contains(Field::ThermostatOn));
        assert!(verdict.changes().contains(Field::AmbientTemperature));
        assert_eq!(controller.properties().thermostat_on(), Some(true));
    }

    #[test]
    fn malformed_siblings_do_not_hide_thermostat() {
        let mut controller = controller();
        let payload = json!({
            "Method": "devices.status",
            "Params": [
                {"Devices": null},
                {"Devices": [
                    null,
                    {"Uuid": HVAC, "Properties": [{"AmbientTemperature": "21"}]}
                ]}
            ]
        })
        .to_string();

        let verdict = controller.handle_payload(payload.as_bytes(), t0()).unwrap();

        assert!(verdict.changes().contains(Field::AmbientTemperature));
        assert_eq!(controller.properties().ambient_temperature(), Some(21.0));
    }

    #[test]
    fn malformed_payload_leaves_state_untouched() {
        let mut controller = controller();
        controller
            .handle_payload(device_list().as_bytes(), t0())
            .unwrap();
        let before = controller.properties().clone();

        assert!(controller.handle_payload(b"{\"Params\":", t0()).is_err());
        assert_eq!(controller.properties(), &before);
    }

    #[test]
    fn command_wire_format() {
        let command = DeviceCommand::set_fan_speed(HVAC.parse().unwrap(), FanSpeed::Low);
        let encoded: serde_json::Value = serde_json::from_str(&command.encode().unwrap()).unwrap();

        assert_eq!(
            encoded,
            json!({
                "Method": "devices.control",
                "Params": [{
                    "Devices": [{
                        "Properties": [{"FanSpeed": "Low"}],
                        "Uuid": HVAC
                    }]
                }]
            })
        );
    }
}

// ============================================================================
// Service loop
// ============================================================================

#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<DeviceCommand>>,
}

impl CommandSink for RecordingSink {
    async fn send(&self, command: &DeviceCommand) -> Result<(), ProtocolError> {
        self.sent.lock().unwrap().push(*command);
        Ok(())
    }
}

struct FailingSink;

impl CommandSink for FailingSink {
    async fn send(&self, _command: &DeviceCommand) -> Result<(), ProtocolError> {
        Err(ProtocolError::ConnectionFailed("broker unreachable".to_string()))
    }
}

mod service_loop {
    use super::*;

    #[tokio::test]
    async fn snapshot_then_events_through_queue() {
        let sink = RecordingSink::default();
        let (tx, rx) = mpsc::channel(16);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        tx.send(InboundMessage::new(RESPONSE_TOPIC, device_list()))
            .await
            .unwrap();
        tx.send(InboundMessage::new(
            EVENT_TOPIC,
            status(HVAC, &json!([{"OperationMode": "Heating"}])),
        ))
        .await
        .unwrap();
        drop(tx);

        let controller = service::run(controller(), rx, &sink, shutdown_rx).await;

        // Cooling at 24/22 is Medium; heating with the room above setpoint is Low
        let id = HVAC.parse().unwrap();
        assert_eq!(
            sink.sent.lock().unwrap().as_slice(),
            &[
                DeviceCommand::set_fan_speed(id, FanSpeed::Medium),
                DeviceCommand::set_fan_speed(id, FanSpeed::Low),
            ]
        );
        assert_eq!(
            controller.properties().operation_mode(),
            Some(OperationMode::Heating)
        );
    }

    #[tokio::test]
    async fn failed_publish_keeps_loop_running() {
        let (tx, rx) = mpsc::channel(16);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        tx.send(InboundMessage::new(RESPONSE_TOPIC, device_list()))
            .await
            .unwrap();
        tx.send(InboundMessage::new(
            EVENT_TOPIC,
            status(HVAC, &json!([{"AmbientTemperature": "26.0"}])),
        ))
        .await
        .unwrap();
        drop(tx);

        let controller = service::run(controller(), rx, &FailingSink, shutdown_rx).await;

        assert!(controller.gate().last_emit().is_none());
        assert_eq!(controller.properties().ambient_temperature(), Some(26.0));
    }

    #[tokio::test]
    async fn shutdown_stops_waiting_loop() {
        let sink = RecordingSink::default();
        let (tx, rx) = mpsc::channel::<InboundMessage>(16);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let stop = async {
            tokio::task::yield_now().await;
            shutdown_tx.send(true).unwrap();
        };
        let (controller, ()) = tokio::join!(service::run(controller(), rx, &sink, shutdown_rx), stop);

        assert!(sink.sent.lock().unwrap().is_empty());
        assert!(controller.properties().thermostat_on().is_none());
        assert!(tx.is_closed());
    }
}
