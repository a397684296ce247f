use crate::common::ApiError;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use serde_json::Value;

/// Whether the response declares a JSON body.
pub fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.to_ascii_lowercase().contains("application/json"))
}

/// Message used when the response carries nothing better.
pub fn default_message(status: StatusCode) -> String {
    format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or_default()
    )
    .trim_end()
    .to_string()
}

/// Builds the error for a non-success response.
///
/// A JSON body contributes its `detail` or `message` string and becomes the
/// error payload. Any other non-empty body is used verbatim as both message
/// and payload.
pub fn extract_api_error(status: StatusCode, json: bool, body: &str) -> ApiError {
    let code = status.as_u16();

    if json {
        return match serde_json::from_str::<Value>(body) {
            Ok(payload) => {
                let message = message_field(&payload, "detail")
                    .or_else(|| message_field(&payload, "message"))
                    .unwrap_or_else(|| default_message(status));
                ApiError::new(message, code, Some(payload))
            }
            Err(e) => {
                log::debug!("Error response declared JSON but did not parse: {e}");
                ApiError::new(default_message(status), code, None)
            }
        };
    }

    if body.is_empty() {
        ApiError::new(default_message(status), code, None)
    } else {
        ApiError::new(body, code, Some(Value::String(body.to_string())))
    }
}

fn message_field(payload: &Value, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

/// Decodes a success body. Only a non-blank JSON body yields a value.
pub fn parse_success(json: bool, body: &str) -> Result<Option<Value>, serde_json::Error> {
    if !json || body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(body).map(Some)
}
