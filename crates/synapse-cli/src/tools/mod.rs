//! Tool framework for the coordinator agent
//!
//! Tools are resolved by name from a registry built once at startup. Arguments
//! arrive as JSON and are validated by deserializing into each tool's typed
//! argument struct.

pub mod logistics;
pub mod registry;
pub mod router;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use synapse_core::ToolDefinition;
use thiserror::Error;

/// Failures the dispatcher can surface for a tool call
#[derive(Debug, Error, PartialEq)]
pub enum ToolError {
    #[error("Unknown tool requested: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },
}

/// Context provided to tools during execution
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Print the `--- TOOL: ... ---` trace lines
    pub echo_trace: bool,
}

impl Default for ToolContext {
    fn default() -> Self {
        Self { echo_trace: true }
    }
}

impl ToolContext {
    pub fn new(echo_trace: bool) -> Self {
        Self { echo_trace }
    }

    /// Print a trace line if enabled
    pub fn trace(&self, line: impl AsRef<str>) {
        if self.echo_trace {
            println!("{}", line.as_ref());
        }
    }
}

/// Schema for a tool parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterProperty {
    /// Parameter type (string, number, object)
    #[serde(rename = "type")]
    pub param_type: String,
    /// Parameter description
    pub description: String,
}

impl ParameterProperty {
    pub fn string(description: impl Into<String>) -> Self {
        Self::typed("string", description)
    }

    pub fn number(description: impl Into<String>) -> Self {
        Self::typed("number", description)
    }

    pub fn object(description: impl Into<String>) -> Self {
        Self::typed("object", description)
    }

    fn typed(param_type: &str, description: impl Into<String>) -> Self {
        Self {
            param_type: param_type.to_string(),
            description: description.into(),
        }
    }
}

/// Schema describing tool parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Type is always "object"
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Parameter properties
    pub properties: BTreeMap<String, ParameterProperty>,
    /// Required parameter names
    #[serde(default)]
    pub required: Vec<String>,
}

impl ParameterSchema {
    pub fn new() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, prop: ParameterProperty) -> Self {
        self.properties.insert(name.into(), prop);
        self
    }

    pub fn with_required(mut self, name: impl Into<String>, prop: ParameterProperty) -> Self {
        let name = name.into();
        self.properties.insert(name.clone(), prop);
        self.required.push(name);
        self
    }

    /// JSON schema value sent to the oracle
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl Default for ParameterSchema {
    fn default() -> Self {
        Self::new()
    }
}

/// A tool-call request from the reasoner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Call id echoed back on the observation
    pub id: String,
    /// Tool name
    pub name: String,
    /// Arguments as JSON
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// The Tool trait that all logistics tools implement
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name
    fn name(&self) -> &str;

    /// Get a description of what the tool does
    fn description(&self) -> &str;

    /// Get the parameter schema
    fn parameters_schema(&self) -> ParameterSchema;

    /// Execute the tool with the given arguments, returning a structured result
    async fn execute(&self, args: &Value, ctx: &ToolContext) -> Result<Value, ToolError>;

    /// Convert to a tool definition for the oracle
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            self.name(),
            self.description(),
            self.parameters_schema().to_value(),
        )
    }
}

/// Validate and decode a tool's argument payload
pub fn parse_args<T: DeserializeOwned>(tool: &str, args: &Value) -> Result<T, ToolError> {
    T::deserialize(args).map_err(|e| ToolError::InvalidArguments {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}
