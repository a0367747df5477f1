//! Customer-facing tools: messaging and refunds

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

use super::stable_id;
use crate::tools::{parse_args, ParameterProperty, ParameterSchema, Tool, ToolContext, ToolError};

/// Sends a message (and optional voucher) to a customer's device
pub struct NotifyCustomerTool;

#[derive(Debug, Deserialize)]
struct NotifyArgs {
    customer_id: String,
    message: String,
    #[serde(default)]
    voucher_code: Option<String>,
}

#[async_trait]
impl Tool for NotifyCustomerTool {
    fn name(&self) -> &str {
        "notify_customer"
    }

    fn description(&self) -> &str {
        "Sends a text-based message and an optional voucher to the customer's device."
    }

    fn parameters_schema(&self) -> ParameterSchema {
        ParameterSchema::new()
            .with_required(
                "customer_id",
                ParameterProperty::string("The unique identifier for the customer."),
            )
            .with_required(
                "message",
                ParameterProperty::string("The content of the message to be sent."),
            )
            .with_property(
                "voucher_code",
                ParameterProperty::string("An optional voucher code to include."),
            )
    }

    async fn execute(&self, args: &Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let args: NotifyArgs = parse_args(self.name(), args)?;
        ctx.trace(format!("--- TOOL: Notifying customer {} ---", args.customer_id));
        ctx.trace(format!("Message: {}", args.message));
        if let Some(ref voucher) = args.voucher_code {
            ctx.trace(format!("Voucher Sent: {}", voucher));
        }

        Ok(json!({
            "status": "success",
            "message_id": stable_id("msg", &args.message),
        }))
    }
}

/// Refunds all or part of an order
pub struct IssueInstantRefundTool;

#[derive(Debug, Deserialize)]
struct RefundArgs {
    order_id: String,
    #[serde(deserialize_with = "amount_from_number_or_string")]
    amount: f64,
}

/// Models sometimes quote numbers; accept "12.50" as well as 12.5
fn amount_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(n) => Ok(n),
        Amount::Text(s) => s
            .trim()
            .trim_start_matches('$')
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("amount is not a number: {:?}", s))),
    }
}

#[async_trait]
impl Tool for IssueInstantRefundTool {
    fn name(&self) -> &str {
        "issue_instant_refund"
    }

    fn description(&self) -> &str {
        "Issues a full or partial refund to the customer for a specific order."
    }

    fn parameters_schema(&self) -> ParameterSchema {
        ParameterSchema::new()
            .with_required("order_id", ParameterProperty::string("The order to refund."))
            .with_required("amount", ParameterProperty::number("Refund amount in dollars."))
    }

    async fn execute(&self, args: &Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let args: RefundArgs = parse_args(self.name(), args)?;
        if !args.amount.is_finite() || args.amount < 0.0 {
            return Err(ToolError::InvalidArguments {
                tool: self.name().to_string(),
                reason: format!("amount must be a non-negative number, got {}", args.amount),
            });
        }
        ctx.trace(format!(
            "--- TOOL: Issuing refund of ${} for order {} ---",
            args.amount, args.order_id
        ));

        Ok(json!({
            "status": "refund_processed",
            "refund_id": stable_id("ref", &args.order_id),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> ToolContext {
        ToolContext::new(false)
    }

    #[tokio::test]
    async fn test_notify_customer() {
        let result = NotifyCustomerTool
            .execute(
                &json!({"customer_id": "cust_789", "message": "Your order is on its way"}),
                &quiet(),
            )
            .await
            .unwrap();

        assert_eq!(result["status"], "success");
        let id = result["message_id"].as_str().unwrap();
        assert_eq!(id, stable_id("msg", "Your order is on its way"));
    }

    #[tokio::test]
    async fn test_notify_customer_with_voucher() {
        let result = NotifyCustomerTool
            .execute(
                &json!({"customer_id": "cust_1", "message": "Sorry!", "voucher_code": "SORRY10"}),
                &quiet(),
            )
            .await
            .unwrap();
        assert_eq!(result["status"], "success");
    }

    #[tokio::test]
    async fn test_notify_customer_null_voucher() {
        let result = NotifyCustomerTool
            .execute(
                &json!({"customer_id": "cust_1", "message": "Hi", "voucher_code": null}),
                &quiet(),
            )
            .await
            .unwrap();
        assert_eq!(result["status"], "success");
    }

    #[tokio::test]
    async fn test_notify_customer_missing_message() {
        let err = NotifyCustomerTool
            .execute(&json!({"customer_id": "cust_1"}), &quiet())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[tokio::test]
    async fn test_refund() {
        let result = IssueInstantRefundTool
            .execute(&json!({"order_id": "order_55", "amount": 12.5}), &quiet())
            .await
            .unwrap();
        assert_eq!(
            result,
            json!({"status": "refund_processed", "refund_id": stable_id("ref", "order_55")})
        );
    }

    #[tokio::test]
    async fn test_refund_accepts_quoted_amount() {
        let result = IssueInstantRefundTool
            .execute(&json!({"order_id": "order_55", "amount": "$8.20"}), &quiet())
            .await
            .unwrap();
        assert_eq!(result["status"], "refund_processed");
    }

    #[tokio::test]
    async fn test_refund_rejects_bad_amount() {
        for amount in [json!("lots"), json!(-3.0), json!(null)] {
            let err = IssueInstantRefundTool
                .execute(&json!({"order_id": "order_55", "amount": amount.clone()}), &quiet())
                .await
                .unwrap_err();
            assert!(matches!(err, ToolError::InvalidArguments { .. }), "amount {}", amount);
        }
    }
}
