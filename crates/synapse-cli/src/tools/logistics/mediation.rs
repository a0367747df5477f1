//! At-the-door dispute mediation and fault analysis

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::tools::{parse_args, ParameterProperty, ParameterSchema, Tool, ToolContext, ToolError};

const MERCHANT_FAULT_REASON: &str = "Driver and customer both confirm the bag was sealed by the merchant and the seal was intact upon delivery, indicating poor internal packaging by the merchant was the cause of the spill.";

/// Opens a synchronized dispute session on the driver and customer devices
pub struct InitiateMediationFlowTool;

#[derive(Debug, Deserialize)]
struct MediationArgs {
    order_id: String,
}

#[async_trait]
impl Tool for InitiateMediationFlowTool {
    fn name(&self) -> &str {
        "initiate_mediation_flow"
    }

    fn description(&self) -> &str {
        "Opens a synchronized interface on the driver and customer devices for at-the-door dispute resolution, pausing the order."
    }

    fn parameters_schema(&self) -> ParameterSchema {
        ParameterSchema::new()
            .with_required("order_id", ParameterProperty::string("The disputed order."))
    }

    async fn execute(&self, args: &Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let args: MediationArgs = parse_args(self.name(), args)?;
        ctx.trace(format!("--- TOOL: Initiating mediation flow for order {} ---", args.order_id));

        Ok(json!({"status": "mediation_initiated", "flow_id": "med_456"}))
    }
}

/// Decides fault from the evidence gathered in a mediation flow
pub struct AnalyzeEvidenceTool;

#[derive(Debug, Deserialize)]
struct EvidenceArgs {
    flow_id: String,
    evidence: Map<String, Value>,
}

/// True when `evidence[section][question]` is exactly "Yes"
fn answered_yes(evidence: &Map<String, Value>, section: &str, question: &str) -> bool {
    evidence
        .get(section)
        .and_then(|answers| answers.get(question))
        .and_then(Value::as_str)
        == Some("Yes")
}

#[async_trait]
impl Tool for AnalyzeEvidenceTool {
    fn name(&self) -> &str {
        "analyze_evidence"
    }

    fn description(&self) -> &str {
        "Processes evidence collected during a mediation flow to determine fault. Evidence should include 'driver_questionnaire' and 'customer_questionnaire' objects along with any photo URLs."
    }

    fn parameters_schema(&self) -> ParameterSchema {
        ParameterSchema::new()
            .with_required(
                "flow_id",
                ParameterProperty::string("The unique ID for the active mediation flow."),
            )
            .with_required(
                "evidence",
                ParameterProperty::object(
                    "Evidence from both driver and customer, including photo URLs and questionnaire answers.",
                ),
            )
    }

    async fn execute(&self, args: &Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let args: EvidenceArgs = parse_args(self.name(), args)?;
        ctx.trace(format!("--- TOOL: Analyzing evidence for flow {} ---", args.flow_id));

        let sealed_by_merchant =
            answered_yes(&args.evidence, "driver_questionnaire", "was_bag_sealed_by_merchant");
        let seal_intact =
            answered_yes(&args.evidence, "customer_questionnaire", "was_seal_intact_upon_handover");

        if sealed_by_merchant && seal_intact {
            Ok(json!({"fault": "merchant", "reason": MERCHANT_FAULT_REASON}))
        } else {
            Ok(json!({
                "fault": "inconclusive",
                "reason": "Could not determine fault from evidence."
            }))
        }
    }
}
