//! synapse-core: Shared library for the Synapse last-mile coordinator
//!
//! Provides:
//! - Configuration loading (synapse.toml + environment secrets)
//! - Chat wire types for OpenAI-compatible APIs
//! - The `Oracle` abstraction and an OpenRouter client

pub mod chat;
pub mod config;
pub mod error;
pub mod openrouter;
pub mod oracle;

pub use chat::{ChatMessage, FunctionCall, FunctionDefinition, Role, ToolCall, ToolDefinition};
pub use config::{AgentSettings, Config, OracleSettings};
pub use error::{OracleError, OracleErrorKind};
pub use openrouter::OpenRouterClient;
pub use oracle::{Oracle, OracleReply, Usage};
