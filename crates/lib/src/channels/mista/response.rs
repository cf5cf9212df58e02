//! Provider send response to outcome.
//!
//! The provider has answered both `{"data":{"status":..,"uid":..}}` and the flattened
//! `{"status":..,"uid":..}`. `data` is used when it is an object; any other non-null `data`
//! is rejected.

use super::error::MistaError;
use serde::Deserialize;
use serde_json::Value;

const SUCCESS_STATUSES: &[&str] = &["Delivered", "Success"];

#[derive(Debug, Default, Deserialize)]
struct Receipt {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    uid: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(flatten)]
    flat: Receipt,
}

fn uid_string(uid: Option<Value>) -> Option<String> {
    match uid? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Interpret an HTTP response. `Ok` carries the provider external id (when one was returned).
pub fn interpret_response(status_code: u16, body: &str) -> Result<Option<String>, MistaError> {
    if !(200..300).contains(&status_code) {
        return Err(MistaError::ProviderRejected(format!(
            "SMS request failed with status code: {}",
            status_code
        )));
    }
    let value: Value = serde_json::from_str(body)
        .map_err(|e| MistaError::MalformedProviderResponse(e.to_string()))?;
    let parsed: SendResponse = serde_json::from_value(value).map_err(|e| {
        MistaError::ProviderRejected(format!("unexpected response shape: {}", e))
    })?;
    let receipt = match parsed.data {
        Some(data @ Value::Object(_)) => serde_json::from_value::<Receipt>(data).map_err(|e| {
            MistaError::ProviderRejected(format!("unexpected data shape: {}", e))
        })?,
        Some(Value::Null) | None => parsed.flat,
        Some(other) => {
            return Err(MistaError::ProviderRejected(format!(
                "data is not an object: {}",
                other
            )))
        }
    };
    match receipt.status.as_deref() {
        Some(s) if SUCCESS_STATUSES.contains(&s) => Ok(uid_string(receipt.uid)),
        Some(s) => Err(MistaError::ProviderRejected(format!("status '{}'", s))),
        None => Err(MistaError::ProviderRejected(
            "response has no status field".to_string(),
        )),
    }
}
