//! Decoding of the `{ "success": bool, ... }` envelope shared by all endpoints.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// Pull a human-readable message out of an error body (`error`, then `details`)
fn error_message(body: &Value) -> Option<String> {
    let error = body.get("error").and_then(Value::as_str);
    let details = body.get("details").and_then(Value::as_str);
    match (error, details) {
        (Some(e), Some(d)) => Some(format!("{e}: {d}")),
        (Some(e), None) => Some(e.to_string()),
        (None, Some(d)) => Some(d.to_string()),
        (None, None) => None,
    }
}

/// Turn a non-2xx response into [`ApiError::HttpStatus`]
pub(crate) async fn status_error(response: Response) -> ApiError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .as_ref()
        .and_then(error_message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("API request failed")
                .to_string()
        });
    log::warn!("API returned {}: {}", status, message);
    ApiError::HttpStatus { status, message }
}

/// Decode an envelope body into `T`.
///
/// `success: false` becomes [`ApiError::Application`]. A missing flag is
/// tolerated as long as the payload has the expected shape.
pub(crate) fn decode_envelope<T: DeserializeOwned>(body: Value) -> ApiResult<T> {
    if !body.is_object() {
        return Err(ApiError::MissingField("success"));
    }
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let message = error_message(&body).unwrap_or_else(|| "Unknown error".to_string());
        log::warn!("API reported failure: {}", message);
        return Err(ApiError::Application(message));
    }
    Ok(serde_json::from_value(body)?)
}

/// Check the status, read the body and decode the envelope
pub(crate) async fn read_envelope<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    if !response.status().is_success() {
        return Err(status_error(response).await);
    }
    let text = response.text().await?;
    let body: Value = serde_json::from_str(&text)?;
    decode_envelope(body)
}

/// Like [`read_envelope`], but maps 404 to [`ApiError::UserNotFound`]
pub(crate) async fn read_user_envelope<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    if response.status() == StatusCode::NOT_FOUND {
        return Err(ApiError::UserNotFound);
    }
    read_envelope(response).await
}
