use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{multipart::Form, Client};
use tracing::debug;

use crate::vendor::{check_status, http_client, VendorError};

const VENDOR: &str = "ClipDrop";

/// Text-to-image synthesis.
#[async_trait]
pub trait ImageSynthesizer: Send + Sync {
    /// Returns the raw PNG produced for `prompt`.
    async fn text_to_image(&self, prompt: &str) -> Result<Bytes, VendorError>;
}

#[derive(Clone)]
pub struct ClipdropClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ClipdropClient {
    pub fn new(api_key: String, base_url: String) -> Result<Self, VendorError> {
        Ok(Self {
            client: http_client()?,
            api_key,
            base_url,
        })
    }
}

#[async_trait]
impl ImageSynthesizer for ClipdropClient {
    async fn text_to_image(&self, prompt: &str) -> Result<Bytes, VendorError> {
        let form = Form::new().text("prompt", prompt.to_string());

        let response = self
            .client
            .post(format!("{}/text-to-image/v1", self.base_url))
            .header("x-api-key", &self.api_key)
            .multipart(form)
            .send()
            .await?;

        let image = check_status(VENDOR, response).await?.bytes().await?;
        if image.is_empty() {
            return Err(VendorError::EmptyContent(VENDOR));
        }

        debug!("ClipDrop returned {} bytes", image.len());
        Ok(image)
    }
}
