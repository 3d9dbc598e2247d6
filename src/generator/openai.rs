//! OpenAI-compatible chat-completions backend

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::config::OpenAiSettings;
use crate::extractor::Statement;

use super::descriptor::TestDescriptor;
use super::errors::{GenerationError, GenerationResult};
use super::generative::{parse_descriptors, render_prompt, GenerativeBackend, SYSTEM_MESSAGE};

const TEMPERATURE: f32 = 0.1;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Backend calling `{base_url}/chat/completions` with bearer auth.
pub struct OpenAiBackend {
    settings: OpenAiSettings,
    client: Client,
}

impl OpenAiBackend {
    /// Create a backend. Credentials are checked per call, not here.
    pub fn new(settings: OpenAiSettings) -> Self {
        Self {
            settings,
            client: Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.settings.base_url)
    }
}

impl GenerativeBackend for OpenAiBackend {
    fn name(&self) -> &str {
        &self.settings.model
    }

    fn generate_batch(&self, statements: &[Statement]) -> GenerationResult<Vec<TestDescriptor>> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredentials)?;

        let prompt = render_prompt(statements);
        let request = ChatRequest {
            model: &self.settings.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_MESSAGE,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text()?;
        let content = message_content(&body)?;
        parse_descriptors(&content)
    }
}

/// First choice's message content from a chat-completions response body.
fn message_content(body: &str) -> GenerationResult<String> {
    let response: ChatResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(GenerationError::EmptyResponse)
}
