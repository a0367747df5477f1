//! Driver-facing tools

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::tools::{parse_args, ParameterProperty, ParameterSchema, Tool, ToolContext, ToolError};

/// Gives a waiting driver a short nearby task
pub struct ReRouteDriverTool;

#[derive(Debug, Deserialize)]
struct ReRouteArgs {
    driver_id: String,
    new_task_id: String,
}

#[async_trait]
impl Tool for ReRouteDriverTool {
    fn name(&self) -> &str {
        "re_route_driver"
    }

    fn description(&self) -> &str {
        "Assigns a driver to a new, short, nearby delivery task to perform while waiting for a primary order to be prepared."
    }

    fn parameters_schema(&self) -> ParameterSchema {
        ParameterSchema::new()
            .with_required(
                "driver_id",
                ParameterProperty::string("The unique identifier for the driver."),
            )
            .with_required(
                "new_task_id",
                ParameterProperty::string("The task to assign in the meantime."),
            )
    }

    async fn execute(&self, args: &Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let args: ReRouteArgs = parse_args(self.name(), args)?;
        ctx.trace(format!(
            "--- TOOL: Rerouting driver {} to new task {} ---",
            args.driver_id, args.new_task_id
        ));

        Ok(json!({"status": "rerouted", "driver_eta_minutes": 15}))
    }
}

/// Clears a driver of fault so their rating is unaffected
pub struct ExonerateDriverTool;

#[derive(Debug, Deserialize)]
struct ExonerateArgs {
    driver_id: String,
    order_id: String,
}

#[async_trait]
impl Tool for ExonerateDriverTool {
    fn name(&self) -> &str {
        "exonerate_driver"
    }

    fn description(&self) -> &str {
        "Clears a driver of fault for a specific delivery issue, protecting their performance rating."
    }

    fn parameters_schema(&self) -> ParameterSchema {
        ParameterSchema::new()
            .with_required(
                "driver_id",
                ParameterProperty::string("The unique identifier for the driver."),
            )
            .with_required(
                "order_id",
                ParameterProperty::string("The order the driver is cleared for."),
            )
    }

    async fn execute(&self, args: &Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let args: ExonerateArgs = parse_args(self.name(), args)?;
        ctx.trace(format!(
            "--- TOOL: Exonerating driver {} for order {} ---",
            args.driver_id, args.order_id
        ));

        Ok(json!({"status": "driver_exonerated"}))
    }
}
