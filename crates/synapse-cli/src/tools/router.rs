//! Tool routing and dispatch

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::registry::ToolRegistry;
use super::{ToolCall, ToolContext, ToolError};

/// Result of one dispatched call
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub call_id: String,
    pub tool_name: String,
    pub result: Value,
}

/// Router for dispatching tool calls against the registry
pub struct ToolRouter {
    registry: ToolRegistry,
}

impl ToolRouter {
    /// Create a new router that owns the registry
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Route a single tool call
    #[instrument(skip(self, ctx), fields(tool = %tool_call.name, call_id = %tool_call.id))]
    pub async fn route(
        &self,
        tool_call: &ToolCall,
        ctx: &ToolContext,
    ) -> Result<Observation, ToolError> {
        let tool = match self.registry.get(&tool_call.name) {
            Some(t) => t,
            None => {
                warn!(tool = %tool_call.name, "Tool not found");
                return Err(ToolError::UnknownTool(tool_call.name.clone()));
            }
        };

        debug!(arguments = %tool_call.arguments, "Executing tool");
        match tool.execute(&tool_call.arguments, ctx).await {
            Ok(result) => {
                info!(tool = %tool_call.name, "Tool executed successfully");
                Ok(Observation {
                    call_id: tool_call.id.clone(),
                    tool_name: tool_call.name.clone(),
                    result,
                })
            }
            Err(e) => {
                warn!(tool = %tool_call.name, error = %e, "Tool execution failed");
                Err(e)
            }
        }
    }

    /// Route multiple tool calls sequentially, stopping at the first failure
    pub async fn route_all(
        &self,
        tool_calls: &[ToolCall],
        ctx: &ToolContext,
    ) -> Result<Vec<Observation>, ToolError> {
        let mut observations = Vec::with_capacity(tool_calls.len());
        for call in tool_calls {
            observations.push(self.route(call, ctx).await?);
        }
        Ok(observations)
    }

    /// Get a reference to the registry
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}

impl std::fmt::Debug for ToolRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRouter")
            .field("registry", &self.registry)
            .finish()
    }
}
