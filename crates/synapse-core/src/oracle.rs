//! The reasoning oracle abstraction
//!
//! The agent loop only ever talks to an `Oracle`: submit the conversation and
//! the tool schemas, get back one assistant message. Swapping providers or
//! scripting responses in tests does not touch the loop.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, ToolDefinition};
use crate::error::OracleError;

/// Token accounting reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
}

impl Usage {
    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }

    pub fn add(&mut self, other: Usage) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
    }
}

/// One oracle turn
#[derive(Debug, Clone)]
pub struct OracleReply {
    /// The assistant message, possibly carrying tool calls
    pub message: ChatMessage,
    pub usage: Usage,
}

/// Common interface for reasoning oracles
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Submit the conversation (system prompt included) and the available tools
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<OracleReply, OracleError>;

    /// Identifier of the model answering requests
    fn model_id(&self) -> &str;
}
