// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value conversions that never fail.
//!
//! Each function maps a raw JSON value to `Some(typed)` or `None`. The
//! `deserialize_*` wrappers plug them into `#[serde(deserialize_with)]` so
//! that a wrong-typed key reads as missing instead of failing the message.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::types::{FanSpeed, OperationMode};

/// Parses a boolean flag.
///
/// Accepts JSON booleans, the numbers `0`/`1` and the strings
/// `true`/`false`, `1`/`0`, `on`/`off` in any letter case.
#[must_use]
pub fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_u64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "on" => Some(true),
            "false" | "0" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Parses a finite decimal number from a JSON number or numeric string.
#[must_use]
pub fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Returns a non-empty string.
#[must_use]
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Parses a fan speed string.
#[must_use]
pub fn fan_speed(value: &Value) -> Option<FanSpeed> {
    value.as_str().and_then(|s| s.parse().ok())
}

/// Parses an operation mode string.
#[must_use]
pub fn operation_mode(value: &Value) -> Option<OperationMode> {
    value.as_str().and_then(OperationMode::from_reported)
}

macro_rules! lenient_deserializer {
    ($name:ident, $parse:ident, $ty:ty) => {
        pub(crate) fn $name<'de, D>(deserializer: D) -> Result<Option<$ty>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Value::deserialize(deserializer).map(|value| $parse(&value))
        }
    };
}

lenient_deserializer!(deserialize_flag, flag, bool);
lenient_deserializer!(deserialize_number, number, f64);
lenient_deserializer!(deserialize_text, text, String);
lenient_deserializer!(deserialize_fan_speed, fan_speed, FanSpeed);
lenient_deserializer!(deserialize_operation_mode, operation_mode, OperationMode);

/// Decodes the objects of a JSON array that fit `T`.
///
/// Anything but an array is an empty list. Elements that are not objects,
/// or that do not decode as `T`, are skipped.
#[must_use]
pub fn objects<T: DeserializeOwned>(value: &Value) -> Vec<T> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter(|item| item.is_object())
        .filter_map(|item| T::deserialize(item).ok())
        .collect()
}

pub(crate) fn deserialize_objects<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Value::deserialize(deserializer).map(|value| objects(&value))
}
