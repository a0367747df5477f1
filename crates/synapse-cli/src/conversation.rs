//! Append-only conversation history for one coordinator run

use serde::Serialize;
use serde_json::Value;
use synapse_core::{ChatMessage, ToolCall as WireToolCall};

use crate::tools::router::Observation;
use crate::tools::ToolCall;

/// One turn in the conversation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Message {
    /// The disruption report from the operator
    User { content: String },
    /// Reasoner output, possibly requesting tool calls
    Reasoner {
        content: String,
        tool_calls: Vec<ToolCall>,
    },
    /// Result of one tool call
    Observation {
        call_id: String,
        tool_name: String,
        result: Value,
    },
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }

    pub fn reasoner(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Message::Reasoner {
            content: content.into(),
            tool_calls,
        }
    }

    /// Convert to the chat wire format
    pub fn to_chat_message(&self) -> ChatMessage {
        match self {
            Message::User { content } => ChatMessage::user(content.clone()),
            Message::Reasoner {
                content,
                tool_calls,
            } => {
                if tool_calls.is_empty() {
                    return ChatMessage::assistant(content.clone());
                }
                let calls = tool_calls
                    .iter()
                    .map(|c| WireToolCall::new(c.id.clone(), c.name.clone(), &c.arguments))
                    .collect();
                let content = (!content.is_empty()).then(|| content.clone());
                ChatMessage::assistant_with_tools(content, calls)
            }
            Message::Observation { call_id, result, .. } => {
                ChatMessage::tool_result(call_id.clone(), result.to_string())
            }
        }
    }
}

impl From<Observation> for Message {
    fn from(obs: Observation) -> Self {
        Message::Observation {
            call_id: obs.call_id,
            tool_name: obs.tool_name,
            result: obs.result,
        }
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Message::User { content } => write!(f, "User: {}", content),
            Message::Reasoner {
                content,
                tool_calls,
            } => {
                let mut first = true;
                if !content.trim().is_empty() {
                    write!(f, "{}", content.trim())?;
                    first = false;
                }
                for call in tool_calls {
                    if !first {
                        writeln!(f)?;
                    }
                    write!(f, "Action: {} {}", call.name, call.arguments)?;
                    first = false;
                }
                Ok(())
            }
            Message::Observation {
                tool_name, result, ..
            } => write!(f, "Observation ({}): {}", tool_name, result),
        }
    }
}

/// Ordered history of the run; messages can only be appended
#[derive(Debug, Clone, Default, Serialize)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Start a conversation from the operator's scenario
    pub fn new(scenario: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(scenario)],
        }
    }

    /// Append a message
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Wire messages with the system prompt prepended
    pub fn to_chat_messages(&self, system_prompt: &str) -> Vec<ChatMessage> {
        let mut chat = Vec::with_capacity(self.messages.len() + 1);
        chat.push(ChatMessage::system(system_prompt));
        chat.extend(self.messages.iter().map(Message::to_chat_message));
        chat
    }
}
