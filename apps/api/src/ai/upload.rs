use std::collections::HashMap;

use axum::extract::{multipart::MultipartRejection, Multipart};
use axum::http::StatusCode;
use bytes::Bytes;

use crate::errors::AppError;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

pub const BODY_TOO_LARGE: &str = "Request body is too large (16MB limit).";

/// A file part buffered in memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Bytes,
}

/// A fully buffered multipart body: file parts by field name plus plain text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    files: HashMap<String, UploadedFile>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    pub async fn read(multipart: Result<Multipart, MultipartRejection>) -> Result<Self, AppError> {
        let mut multipart =
            multipart.map_err(|e| rejected_body(e.status(), e.body_text()))?;
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if field.file_name().is_some() {
                let file_name = field.file_name().map(str::to_owned);
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_string();
                let bytes = field.bytes().await.map_err(malformed)?;
                form.files.insert(
                    name,
                    UploadedFile {
                        file_name,
                        content_type,
                        bytes,
                    },
                );
            } else {
                let text = field.text().await.map_err(malformed)?;
                form.fields.insert(name, text);
            }
        }

        Ok(form)
    }

    /// Removes and returns the file uploaded under `name`.
    pub fn take_file(&mut self, name: &str) -> Result<UploadedFile, AppError> {
        self.files
            .remove(name)
            .ok_or_else(|| AppError::Validation(format!("No {name} file was uploaded")))
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

fn malformed(e: axum::extract::multipart::MultipartError) -> AppError {
    rejected_body(e.status(), format!("Malformed upload: {}", e.body_text()))
}

/// Maps an extractor rejection to a validation failure. Length-limit rejections
/// get a fixed message instead of axum's plain 413.
pub fn rejected_body(status: StatusCode, text: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::Validation(BODY_TOO_LARGE.to_string());
    }
    AppError::Validation(text)
}

#[cfg(test)]
impl UploadForm {
    pub fn with_file(mut self, name: &str, content_type: &str, bytes: impl Into<Bytes>) -> Self {
        self.files.insert(
            name.to_string(),
            UploadedFile {
                file_name: Some(format!("{name}.bin")),
                content_type: content_type.to_string(),
                bytes: bytes.into(),
            },
        );
        self
    }

    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }
}
