use async_trait::async_trait;
use bytes::Bytes;

use crate::vendor::VendorError;

#[async_trait]
pub trait PdfReader: Send + Sync {
    async fn extract_text(&self, pdf: Bytes) -> Result<String, VendorError>;
}

/// `pdf-extract` backed reader. Parsing is CPU-bound, so it runs on the blocking pool.
#[derive(Clone, Default)]
pub struct PdfExtractReader;

#[async_trait]
impl PdfReader for PdfExtractReader {
    async fn extract_text(&self, pdf: Bytes) -> Result<String, VendorError> {
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf))
            .await
            .map_err(|e| VendorError::Pdf(e.to_string()))?
            .map_err(|e| VendorError::Pdf(e.to_string()))
    }
}
