//! Groq API vision provider.
//!
//! Uses reqwest against the OpenAI-compatible chat completions endpoint.
//! One request carries one text instruction and one inline image.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::VisionProvider;

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL: &str = "meta-llama/llama-4-maverick-17b-128e-instruct";

// Generation parameters are fixed configuration, not user-exposed.
const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.2;

/// Groq vision provider.
pub struct GroqVision {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GroqVision {
    /// Create a provider with the given API key and the default model.
    pub fn new(api_key: &str) -> Self {
        Self::with_client(reqwest::Client::new(), api_key, GROQ_API_URL)
    }

    /// Use a caller-configured client (timeouts, proxies) and endpoint.
    /// Any OpenAI-compatible chat completions server works.
    pub fn with_client(client: reqwest::Client, api_key: &str, base_url: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the model identifier.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }
}

#[async_trait]
impl VisionProvider for GroqVision {
    async fn describe_image(&self, prompt: &str, image_data_uri: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: prompt.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image_data_uri.to_string(),
                        },
                    },
                ],
            }],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Vision request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error: ApiError = response.json().await.unwrap_or_else(|_| ApiError {
                error: ApiErrorBody {
                    message: format!("HTTP {status}"),
                },
            });
            return Err(anyhow::anyhow!("Vision API error: {}", error.error.message));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .context("Failed to decode vision response")?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .context("Vision response contained no choices")?;

        Ok(choice.message.content.into_text())
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: MessageContent,
}

/// Reply content is usually a plain string, but some responses arrive as a
/// sequence of typed parts.
#[derive(Deserialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ResponsePart>),
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Text(String::new())
    }
}

impl MessageContent {
    /// Concatenate the text parts, space-separated.
    fn into_text(self) -> String {
        match self {
            MessageContent::Text(s) => s,
            MessageContent::Parts(parts) => parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}
