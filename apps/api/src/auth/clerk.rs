use anyhow::Context;
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::auth::{AuthError, IdentityProvider, SessionClaims};
use crate::vendor::{check_status, http_client, VendorError};

const VENDOR: &str = "Clerk";

/// Clerk adapter: networkless session verification plus the Backend API for
/// user metadata.
#[derive(Clone)]
pub struct ClerkClient {
    client: Client,
    secret_key: String,
    api_url: String,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl ClerkClient {
    pub fn new(secret_key: String, jwt_public_key_pem: &str, api_url: String) -> anyhow::Result<Self> {
        let decoding_key = DecodingKey::from_rsa_pem(jwt_public_key_pem.as_bytes())
            .context("CLERK_JWT_KEY is not a valid RSA public key")?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_nbf = true;
        // Clerk session tokens carry no audience by default
        validation.validate_aud = false;

        Ok(Self {
            client: http_client()?,
            secret_key,
            api_url,
            decoding_key,
            validation,
        })
    }

    fn user_url(&self, user_id: &str) -> String {
        format!("{}/v1/users/{user_id}", self.api_url)
    }
}

#[async_trait]
impl IdentityProvider for ClerkClient {
    async fn verify_session(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        Ok(data.claims)
    }

    async fn free_usage(&self, user_id: &str) -> Result<u32, AuthError> {
        let response = self
            .client
            .get(self.user_url(user_id))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(VendorError::from)?;

        let user: Value = check_status(VENDOR, response)
            .await?
            .json()
            .await
            .map_err(VendorError::from)?;

        let free_usage = user
            .pointer("/private_metadata/free_usage")
            .and_then(Value::as_u64)
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
            .unwrap_or(0);

        debug!("User {user_id} free_usage={free_usage}");
        Ok(free_usage)
    }

    async fn set_free_usage(&self, user_id: &str, count: u32) -> Result<(), AuthError> {
        let response = self
            .client
            .patch(format!("{}/metadata", self.user_url(user_id)))
            .bearer_auth(&self.secret_key)
            .json(&json!({ "private_metadata": { "free_usage": count } }))
            .send()
            .await
            .map_err(VendorError::from)?;

        check_status(VENDOR, response).await?;
        Ok(())
    }
}
