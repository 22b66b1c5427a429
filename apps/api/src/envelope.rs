//! The `{success, ...}` body every AI and user-data route answers with.
//!
//! Failures are reported in the body with HTTP 200; the client only looks at
//! `success`.

use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use crate::errors::AppError;

/// Wraps `result` as `{success:true, <key>: value}` or `{success:false, message}`.
pub fn respond<T: Serialize>(key: &str, result: Result<T, AppError>) -> Json<Value> {
    let result =
        result.and_then(|v| serde_json::to_value(v).map_err(|e| AppError::Internal(e.into())));

    match result {
        Ok(value) => {
            let mut body = json!({ "success": true });
            body[key] = value;
            Json(body)
        }
        Err(e) => {
            error!("{e}");
            Json(json!({ "success": false, "message": e.to_string() }))
        }
    }
}
