//! Business-level response wrapper.
//!
//! Every JSON endpoint answers with an [`Envelope`]. The transport status says
//! whether the HTTP exchange worked; `code` says whether the operation did.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Envelope codes that mean the operation succeeded.
pub const SUCCESS_CODES: [i64; 2] = [200, 0];

pub const CODE_FIELD: &str = "code";
pub const DATA_FIELD: &str = "data";
pub const MESSAGE_FIELD: &str = "message";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(
        default,
        deserialize_with = "integral_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub code: Option<i64>,
    pub data: T,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl<T> Envelope<T> {
    /// Absent, `200` and `0` all count as success.
    pub fn is_business_success(&self) -> bool {
        self.code.is_none_or(|code| SUCCESS_CODES.contains(&code))
    }

    pub fn into_data(self) -> T {
        self.data
    }
}

/// Outcome of inspecting an untyped response body before it is decoded into `Envelope<T>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusinessStatus {
    Success,
    Failure {
        code: Option<i64>,
        message: Option<String>,
    },
}

/// Inspect the `code` of a raw body.
///
/// Only an absent code or a number equal to one of [`SUCCESS_CODES`] succeeds.
/// Numbers compare by value, so `200.0` is `200`. An explicit `null` or any
/// non-numeric code fails.
pub fn business_status(body: &Value) -> BusinessStatus {
    let message = body
        .get(MESSAGE_FIELD)
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string);

    let Some(code) = body.get(CODE_FIELD) else {
        return BusinessStatus::Success;
    };

    let is_success = code
        .as_f64()
        .is_some_and(|value| SUCCESS_CODES.iter().any(|&success| success as f64 == value));
    if is_success {
        BusinessStatus::Success
    } else {
        BusinessStatus::Failure {
            code: integral_value(code),
            message,
        }
    }
}

/// A JSON number with no fractional part, as `i64`.
fn integral_value(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|v| v.fract() == 0.0 && *v >= i64::MIN as f64 && *v <= i64::MAX as f64)
            .map(|v| v as i64)
    })
}

/// `code` accepts integral floats such as `200.0`.
fn integral_code<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => integral_value(&value).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("envelope code must be an integer, got {value}"))
        }),
    }
}

/// `null` decodes as the type's default, same as a missing field.
fn null_as_default<'de, D, V>(deserializer: D) -> Result<V, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de> + Default,
{
    Option::<V>::deserialize(deserializer).map(Option::unwrap_or_default)
}
