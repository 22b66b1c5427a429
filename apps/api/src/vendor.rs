//! Shared plumbing for outbound calls to third-party APIs.

use std::time::Duration;

use reqwest::{Client, Response};
use serde_json::Value;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum VendorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{vendor} API error (status {status}): {message}")]
    Api {
        vendor: &'static str,
        status: u16,
        message: String,
    },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0} returned empty content")]
    EmptyContent(&'static str),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),
}

/// Builds the HTTP client every vendor adapter uses.
pub fn http_client() -> Result<Client, VendorError> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// Passes successful responses through, turns anything else into `VendorError::Api`
/// carrying the vendor's own error text when it can be found.
pub async fn check_status(vendor: &'static str, response: Response) -> Result<Response, VendorError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!("{vendor} API returned {status}: {body}");

    Err(VendorError::Api {
        vendor,
        status: status.as_u16(),
        message: extract_error_message(&body).unwrap_or(body),
    })
}

/// Vendors disagree on the error shape:
/// `{"error":{"message":..}}`, `{"error":".."}` or `{"errors":[{"message":..}]}`.
fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let error = value.get("error");

    error
        .and_then(|e| e.get("message"))
        .or_else(|| error.filter(|e| e.is_string()))
        .or_else(|| {
            value
                .get("errors")
                .and_then(|e| e.get(0))
                .and_then(|e| e.get("message"))
        })
        .and_then(|m| m.as_str())
        .map(String::from)
}
