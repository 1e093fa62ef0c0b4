//! YandexGPT completion client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

const COMPLETION_URL: &str = "https://llm.api.cloud.yandex.net/foundationModels/v1/completion";

/// Outcome of one completion call.
///
/// The conversation loop consumes this instead of an error type: `Empty` and
/// `Failed` each map to a fixed user-facing fallback string, and raw error
/// detail never crosses this boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The model produced usable text.
    Answer(String),
    /// The call succeeded but no text came back.
    Empty,
    /// Transport error, non-ok status, or malformed response.
    Failed,
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        system_text: &str,
        user_text: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Completion;
}

pub struct YandexGpt {
    folder_id: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct CompletionRequest {
    #[serde(rename = "modelUri")]
    model_uri: String,
    #[serde(rename = "completionOptions")]
    completion_options: CompletionOptions,
    messages: Vec<PromptMessage>,
}

#[derive(Serialize)]
struct CompletionOptions {
    stream: bool,
    temperature: f32,
    #[serde(rename = "maxTokens")]
    max_tokens: u32,
}

#[derive(Serialize)]
struct PromptMessage {
    role: &'static str,
    text: String,
}

#[derive(Deserialize, Debug)]
struct CompletionResponse {
    result: Option<CompletionResult>,
}

#[derive(Deserialize, Debug)]
struct CompletionResult {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Deserialize, Debug)]
struct Alternative {
    message: Option<AnswerMessage>,
}

#[derive(Deserialize, Debug)]
struct AnswerMessage {
    #[serde(default)]
    text: String,
}

impl YandexGpt {
    pub fn new(folder_id: String, api_key: String, model: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            folder_id,
            api_key,
            model,
            client,
        }
    }

    async fn run_completion(&self, request: &CompletionRequest) -> Result<String, String> {
        let response = self
            .client
            .post(COMPLETION_URL)
            .header("Authorization", format!("Api-Key {}", self.api_key))
            .header("x-folder-id", &self.folder_id)
            .json(request)
            .send()
            .await
            .map_err(|e| format!("HTTP error: {e}"))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("Failed to read response: {e}"))?;

        debug!("YandexGPT response status: {status}");

        if !status.is_success() {
            return Err(format!("API error {status}: {body}"));
        }

        let parsed: CompletionResponse =
            serde_json::from_str(&body).map_err(|e| format!("Failed to parse response: {e}"))?;

        let text = parsed
            .result
            .and_then(|r| r.alternatives.into_iter().next())
            .and_then(|a| a.message)
            .map(|m| m.text)
            .unwrap_or_default();

        Ok(text)
    }
}

#[async_trait]
impl CompletionClient for YandexGpt {
    async fn complete(
        &self,
        system_text: &str,
        user_text: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Completion {
        let question_preview: String = user_text.chars().take(100).collect();
        info!("Sending request to YandexGPT for question: {question_preview}...");
        debug!("System prompt length: {} chars", system_text.chars().count());

        let request = CompletionRequest {
            model_uri: format!("gpt://{}/{}", self.folder_id, self.model),
            completion_options: CompletionOptions {
                stream: false,
                temperature,
                max_tokens,
            },
            messages: vec![
                PromptMessage {
                    role: "system",
                    text: system_text.to_string(),
                },
                PromptMessage {
                    role: "user",
                    text: user_text.to_string(),
                },
            ],
        };

        match self.run_completion(&request).await {
            Ok(text) if text.trim().is_empty() => {
                error!("Empty response from YandexGPT");
                Completion::Empty
            }
            Ok(text) => {
                let answer_preview: String = text.chars().take(100).collect();
                info!("Received response from YandexGPT: {answer_preview}...");
                Completion::Answer(text)
            }
            Err(e) => {
                error!("Error calling YandexGPT: {e}");
                Completion::Failed
            }
        }
    }
}
