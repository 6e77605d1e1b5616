//! The node wraps every answer in `{"result": ..}` or `{"error": ..}`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::CallError;

/// Unwrap a response body into its `result`.
///
/// A body carrying `error` is a rejection whatever the status code. The error
/// may be `{"message": .., "data": ..}` or a bare string.
pub fn unwrap_result(status: u16, body: &str) -> Result<Value, CallError> {
    let json: Value = match serde_json::from_str(body) {
        Ok(json) => json,
        Err(e) if is_success(status) => {
            return Err(CallError::Invalid(format!("malformed JSON: {e}")));
        }
        Err(_) => {
            return Err(CallError::Rejected {
                status,
                message: body.trim().to_string(),
            });
        }
    };

    if let Some(error) = json.get("error") {
        return Err(CallError::Rejected {
            status,
            message: error_message(error),
        });
    }
    if !is_success(status) {
        return Err(CallError::Rejected {
            status,
            message: format!("HTTP {status}"),
        });
    }

    match json {
        Value::Object(mut map) => map
            .remove("result")
            .ok_or_else(|| CallError::Invalid("missing `result` field".into())),
        other => Err(CallError::Invalid(format!("expected an object, got {other}"))),
    }
}

/// Unwrap and deserialize the `result` into `T`.
pub fn decode_result<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, CallError> {
    let result = unwrap_result(status, body)?;
    serde_json::from_value(result).map_err(|e| CallError::Invalid(e.to_string()))
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn error_message(error: &Value) -> String {
    match error {
        Value::String(message) => message.clone(),
        Value::Object(fields) => match fields.get("message").and_then(Value::as_str) {
            Some(message) => message.to_string(),
            None => error.to_string(),
        },
        other => other.to_string(),
    }
}
