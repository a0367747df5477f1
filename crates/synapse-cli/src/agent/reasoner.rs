//! Reasoner node: one oracle round trip per step

use std::sync::Arc;

use serde_json::Value;
use synapse_core::{Oracle, OracleError, ToolCall as WireToolCall, ToolDefinition, Usage};
use tracing::{debug, instrument, warn};

use crate::conversation::Conversation;
use crate::tools::ToolCall;

use super::react::{new_call_id, parse_action_blocks};
use super::state::has_final_answer;

/// One reasoner reply: its text, any tool calls it requested, and its cost
#[derive(Debug)]
pub(crate) struct Turn {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
    pub usage: Usage,
}

/// Asks the oracle for the next reasoner message
pub struct Reasoner {
    oracle: Arc<dyn Oracle>,
    system_prompt: String,
}

impl Reasoner {
    pub fn new(oracle: Arc<dyn Oracle>, system_prompt: impl Into<String>) -> Self {
        Self {
            oracle,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn model_id(&self) -> &str {
        self.oracle.model_id()
    }

    /// Send the system prompt plus the full conversation and return the reply
    #[instrument(
        skip_all,
        fields(model = %self.oracle.model_id(), messages = conversation.len())
    )]
    pub(crate) async fn think(
        &self,
        conversation: &Conversation,
        tools: &[ToolDefinition],
    ) -> Result<Turn, OracleError> {
        let request = conversation.to_chat_messages(&self.system_prompt);
        let reply = self.oracle.complete(&request, tools).await?;

        let content = reply.message.text_content().to_string();
        let mut tool_calls: Vec<ToolCall> = reply
            .message
            .requested_calls()
            .iter()
            .map(from_wire_call)
            .collect();

        if tool_calls.is_empty() && !has_final_answer(&content) {
            if let Some(parsed) = parse_action_blocks(&content) {
                debug!(count = parsed.len(), "Parsed tool calls from content JSON");
                tool_calls = parsed;
            }
        }

        debug!(
            tool_calls = tool_calls.len(),
            prompt_tokens = reply.usage.prompt_tokens,
            completion_tokens = reply.usage.completion_tokens,
            "Reasoner replied"
        );

        Ok(Turn {
            content,
            tool_calls,
            usage: reply.usage,
        })
    }
}

/// Native tool call to dispatchable form. Arguments that fail to decode are
/// kept as the raw string so dispatch reports them as invalid.
fn from_wire_call(call: &WireToolCall) -> ToolCall {
    let id = if call.id.is_empty() {
        new_call_id()
    } else {
        call.id.clone()
    };

    let arguments = match call.function.parsed_arguments() {
        Ok(args) => args,
        Err(e) => {
            warn!(tool = %call.function.name, error = %e, "Undecodable tool arguments");
            Value::String(call.function.arguments.clone())
        }
    };

    ToolCall::new(id, call.function.name.clone(), arguments)
}
