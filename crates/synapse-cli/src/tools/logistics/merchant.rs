//! Merchant-facing tools: kitchen status, alternatives, packaging feedback

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::tools::{parse_args, ParameterProperty, ParameterSchema, Tool, ToolContext, ToolError};

/// The one merchant the simulation reports as online
const ONLINE_MERCHANT: &str = "pizzapalace_123";

/// Checks a merchant's operational status and kitchen prep time
pub struct GetMerchantStatusTool;

#[derive(Debug, Deserialize)]
struct MerchantStatusArgs {
    merchant_id: String,
}

#[async_trait]
impl Tool for GetMerchantStatusTool {
    fn name(&self) -> &str {
        "get_merchant_status"
    }

    fn description(&self) -> &str {
        "Checks the current operational status and estimated kitchen preparation time for a specific merchant."
    }

    fn parameters_schema(&self) -> ParameterSchema {
        ParameterSchema::new()
            .with_required(
                "merchant_id",
                ParameterProperty::string("The unique identifier for the merchant."),
            )
    }

    async fn execute(&self, args: &Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let args: MerchantStatusArgs = parse_args(self.name(), args)?;
        ctx.trace(format!("--- TOOL: Checking status for merchant: {} ---", args.merchant_id));

        if args.merchant_id.contains(ONLINE_MERCHANT) {
            Ok(json!({"status": "online", "prep_time_minutes": 40}))
        } else {
            Ok(json!({"status": "offline", "prep_time_minutes": -1}))
        }
    }
}

/// Finds similar merchants nearby with shorter prep times
pub struct GetNearbyMerchantsTool;

#[derive(Debug, Deserialize)]
struct NearbyMerchantsArgs {
    location: String,
    category: String,
}

#[async_trait]
impl Tool for GetNearbyMerchantsTool {
    fn name(&self) -> &str {
        "get_nearby_merchants"
    }

    fn description(&self) -> &str {
        "Finds similar merchants near a given location, returning their current preparation times to identify faster alternatives."
    }

    fn parameters_schema(&self) -> ParameterSchema {
        ParameterSchema::new()
            .with_required(
                "location",
                ParameterProperty::string("Address or area to search around."),
            )
            .with_required(
                "category",
                ParameterProperty::string("Cuisine or merchant category, e.g. 'pizza'."),
            )
    }

    async fn execute(&self, args: &Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let args: NearbyMerchantsArgs = parse_args(self.name(), args)?;
        ctx.trace(format!(
            "--- TOOL: Finding nearby '{}' merchants near '{}' ---",
            args.category, args.location
        ));

        Ok(json!([
            {"merchant_name": "Speedy Pizza", "prep_time_minutes": 15},
            {"merchant_name": "Italian Express", "prep_time_minutes": 20},
        ]))
    }
}

/// Files an evidence-backed packaging report against a merchant
pub struct LogMerchantPackagingFeedbackTool;

#[derive(Debug, Deserialize)]
struct PackagingFeedbackArgs {
    merchant_id: String,
    order_id: String,
    report: String,
}

#[async_trait]
impl Tool for LogMerchantPackagingFeedbackTool {
    fn name(&self) -> &str {
        "log_merchant_packaging_feedback"
    }

    fn description(&self) -> &str {
        "Logs an evidence-backed report about poor packaging to the merchant's internal account for quality control."
    }

    fn parameters_schema(&self) -> ParameterSchema {
        ParameterSchema::new()
            .with_required(
                "merchant_id",
                ParameterProperty::string("The unique identifier for the merchant."),
            )
            .with_required("order_id", ParameterProperty::string("The order the report refers to."))
            .with_required(
                "report",
                ParameterProperty::string("Summary of the packaging problem and its evidence."),
            )
    }

    async fn execute(&self, args: &Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let args: PackagingFeedbackArgs = parse_args(self.name(), args)?;
        ctx.trace(format!(
            "--- TOOL: Logging feedback for merchant {} on order {} ---",
            args.merchant_id, args.order_id
        ));
        ctx.trace(format!("Report: {}", args.report));

        Ok(json!({"status": "feedback_logged"}))
    }
}
