use async_trait::async_trait;
use reqwest::{multipart::Form, Client};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use tracing::debug;

use crate::config::CloudinaryConfig;
use crate::vendor::{check_status, http_client, VendorError};

const VENDOR: &str = "Cloudinary";
const DELIVERY_BASE_URL: &str = "https://res.cloudinary.com";

/// An asset stored on the image host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostedImage {
    pub public_id: String,
    pub secure_url: String,
}

/// Image hosting with server-side transformations.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Uploads an inline `data:` URL, optionally applying an incoming transformation
    /// (e.g. `e_background_removal`) before the asset is stored.
    async fn upload(
        &self,
        data_url: String,
        transformation: Option<&str>,
    ) -> Result<HostedImage, VendorError>;

    /// Delivery URL that applies `transformation` on the fly to a stored asset.
    fn transformed_url(&self, public_id: &str, transformation: &str) -> String;
}

#[derive(Clone)]
pub struct CloudinaryClient {
    client: Client,
    config: CloudinaryConfig,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Result<Self, VendorError> {
        Ok(Self {
            client: http_client()?,
            config,
        })
    }
}

#[async_trait]
impl ImageHost for CloudinaryClient {
    async fn upload(
        &self,
        data_url: String,
        transformation: Option<&str>,
    ) -> Result<HostedImage, VendorError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();

        let mut params = vec![("timestamp", timestamp.as_str())];
        if let Some(t) = transformation {
            params.push(("transformation", t));
        }
        let signature = sign(&params, &self.config.api_secret);

        let mut form = Form::new()
            .text("file", data_url)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature);
        for (key, value) in params {
            form = form.text(key, value.to_string());
        }

        let response = self
            .client
            .post(format!(
                "{}/v1_1/{}/image/upload",
                self.config.base_url, self.config.cloud_name
            ))
            .multipart(form)
            .send()
            .await?;

        let hosted: HostedImage = check_status(VENDOR, response).await?.json().await?;
        debug!("Uploaded {} to Cloudinary", hosted.public_id);
        Ok(hosted)
    }

    fn transformed_url(&self, public_id: &str, transformation: &str) -> String {
        format!(
            "{DELIVERY_BASE_URL}/{}/image/upload/{transformation}/{public_id}",
            self.config.cloud_name
        )
    }
}

/// Upload signature: SHA-1 hex of the alphabetically sorted `key=value` pairs joined
/// by `&`, immediately followed by the API secret.
fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!("{:x}", Sha1::digest(format!("{to_sign}{api_secret}").as_bytes()))
}
