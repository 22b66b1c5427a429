/// LLM client: the single point of entry for chat completions.
///
/// Talks to Gemini through its OpenAI-compatible endpoint. No other module
/// calls the model vendor directly; handlers depend on the `ChatModel` trait.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::vendor::{check_status, http_client, VendorError};

const VENDOR: &str = "Gemini";
/// The model used for all completions.
pub const MODEL: &str = "gemini-2.0-flash";
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

/// Single-turn text completion.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Sends `prompt` as one user message and returns the first choice's text.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, VendorError>;
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: String) -> Result<Self, VendorError> {
        Ok(Self {
            client: http_client()?,
            api_key,
            base_url,
        })
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, VendorError> {
        let request_body = ChatCompletionRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let response: ChatCompletionResponse = check_status(VENDOR, response).await?.json().await?;

        if let Some(usage) = &response.usage {
            debug!(
                "Chat completion succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(VendorError::EmptyContent(VENDOR))
    }
}
