//! OpenRouter (OpenAI-compatible) chat-completions client

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::chat::{ChatMessage, ToolDefinition};
use crate::config::OracleSettings;
use crate::error::OracleError;
use crate::oracle::{Oracle, OracleReply, Usage};

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDefinition]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

/// OpenRouter reports some failures inside a 200 response
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<Value>,
}

/// OpenRouter API client
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    endpoint: String,
    api_key: String,
    model: String,
    referer: String,
    title: String,
    temperature: Option<f32>,
    client: reqwest::Client,
}

impl OpenRouterClient {
    /// Create a client from resolved settings and the API key
    pub fn new(settings: &OracleSettings, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            endpoint: settings.chat_completions_url(),
            api_key: api_key.into(),
            model: settings.model.clone(),
            referer: settings.referer.clone(),
            title: settings.title.clone(),
            temperature: settings.temperature,
            client,
        })
    }

    /// Override the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl Oracle for OpenRouterClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<OracleReply, OracleError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            tools: (!tools.is_empty()).then_some(tools),
            tool_choice: (!tools.is_empty()).then_some("auto"),
            temperature: self.temperature,
        };

        debug!(
            model = %self.model,
            messages = messages.len(),
            tools = tools.len(),
            "Sending chat completion request"
        );
        let start = Instant::now();

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Oracle request failed");
            return Err(OracleError::from_status(status.as_u16(), &body));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            OracleError::invalid_response(format!("Failed to parse completion response: {}", e))
        })?;

        if let Some(error) = parsed.error {
            let code = error
                .code
                .as_ref()
                .and_then(|c| c.as_u64().or_else(|| c.as_str().and_then(|s| s.parse().ok())))
                .unwrap_or(500);
            warn!(code, "Oracle returned an error payload");
            let status = u16::try_from(code).unwrap_or(500);
            return Err(OracleError::from_status(status, &error.message));
        }

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| OracleError::invalid_response("Completion response had no choices"))?;

        let usage = parsed.usage.unwrap_or_default();
        info!(
            model = %self.model,
            duration_ms = %start.elapsed().as_millis(),
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            finish_reason = ?choice.finish_reason,
            tool_calls = choice.message.requested_calls().len(),
            "Oracle request completed"
        );

        Ok(OracleReply {
            message: choice.message,
            usage,
        })
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
