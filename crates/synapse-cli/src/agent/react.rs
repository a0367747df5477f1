//! Recover ReAct `Action:` blocks from reasoner text
//!
//! Some models ignore native tool calling and write the action as JSON in the
//! content, following the prompt's format. Supported shapes:
//! - `{"tool_name": "...", "parameters": {...}}`
//! - `{"name": "...", "arguments": {...}}`
//! - either of the above inside ```json fences, alone or in an array
//! - several objects interleaved with prose

use serde::Deserialize;
use serde_json::Value;

use crate::tools::ToolCall;

#[derive(Deserialize)]
struct ActionJson {
    #[serde(alias = "tool_name")]
    name: String,
    #[serde(alias = "parameters")]
    arguments: Value,
}

impl ActionJson {
    fn into_call(self) -> Option<ToolCall> {
        if self.name.trim().is_empty() {
            return None;
        }
        let arguments = match self.arguments {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        Some(ToolCall::new(new_call_id(), self.name, arguments))
    }
}

/// Id for a call the oracle did not number itself
pub(crate) fn new_call_id() -> String {
    format!("call_{}", uuid::Uuid::new_v4().simple())
}

/// Parse tool calls embedded in reasoner text, in order of appearance
pub(crate) fn parse_action_blocks(content: &str) -> Option<Vec<ToolCall>> {
    let content = content.trim();
    if content.is_empty() {
        return None;
    }

    if let Some(call) = try_parse_single(content) {
        return Some(vec![call]);
    }

    if let Some(calls) = try_parse_array(content) {
        return Some(calls);
    }

    let calls: Vec<ToolCall> = json_objects(content)
        .into_iter()
        .filter_map(try_parse_single)
        .collect();

    if calls.is_empty() {
        None
    } else {
        Some(calls)
    }
}

fn try_parse_single(content: &str) -> Option<ToolCall> {
    serde_json::from_str::<ActionJson>(content).ok()?.into_call()
}

fn try_parse_array(content: &str) -> Option<Vec<ToolCall>> {
    let parsed: Vec<ActionJson> = serde_json::from_str(content).ok()?;
    let calls: Vec<ToolCall> = parsed.into_iter().filter_map(ActionJson::into_call).collect();

    if calls.is_empty() {
        None
    } else {
        Some(calls)
    }
}

/// Top-level balanced `{...}` spans, ignoring braces inside JSON strings
fn json_objects(content: &str) -> Vec<&str> {
    let mut objects = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in content.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        objects.push(&content[s..=i]);
                    }
                }
            }
            _ => {}
        }
    }

    objects
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_prompt_format() {
        let content = r#"Thought: The driver needs the new address.
Action:
```json
{"tool_name": "notify_customer", "parameters": {"customer_id": "driver_456", "message": "New address is 123 Main St."}}
```"#;
        let calls = parse_action_blocks(content).unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "notify_customer");
        assert_eq!(calls[0].arguments["customer_id"], "driver_456");
        assert!(calls[0].id.starts_with("call_"));
    }

    #[test]
    fn test_parse_name_arguments_raw() {
        let content = r#"{"name": "get_merchant_status", "arguments": {"merchant_id": "pizzapalace_123"}}"#;
        let calls = parse_action_blocks(content).unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].arguments, json!({"merchant_id": "pizzapalace_123"}));
    }

    #[test]
    fn test_parse_array() {
        let content = r#"[
            {"name": "initiate_mediation_flow", "arguments": {"order_id": "o1"}},
            {"tool_name": "exonerate_driver", "parameters": {"driver_id": "d1", "order_id": "o1"}}
        ]"#;
        let calls = parse_action_blocks(content).unwrap();
        let names: Vec<&str> = calls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["initiate_mediation_flow", "exonerate_driver"]);
        assert_ne!(calls[0].id, calls[1].id);
    }

    #[test]
    fn test_parse_multiple_blocks_in_prose() {
        let content = r#"Thought: two things to do.
Action: {"tool_name": "notify_customer", "parameters": {"customer_id": "driver_1", "message": "Use gate {B}"}}
Then:
Action: {"tool_name": "notify_customer", "parameters": {"customer_id": "cust_1", "message": "Driver informed"}}"#;
        let calls = parse_action_blocks(content).unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].arguments["message"], "Use gate {B}");
        assert_eq!(calls[1].arguments["customer_id"], "cust_1");
    }

    #[test]
    fn test_null_parameters_become_empty_object() {
        let calls = parse_action_blocks(r#"{"tool_name": "x", "parameters": null}"#).unwrap();
        assert_eq!(calls[0].arguments, json!({}));
    }

    #[test]
    fn test_no_match() {
        assert!(parse_action_blocks("Just a regular response with no tool calls.").is_none());
        assert!(parse_action_blocks("").is_none());
        assert!(parse_action_blocks(r#"Result was {"status": "success"}"#).is_none());
        assert!(parse_action_blocks(r#"{"name": "missing arguments"}"#).is_none());
        assert!(parse_action_blocks(r#"{"name": "", "arguments": {}}"#).is_none());
    }

    #[test]
    fn test_json_objects_spans() {
        let spans = json_objects(r#"a {"k": "}"} b {"n": {"m": 1}} c }"#);
        assert_eq!(spans, vec![r#"{"k": "}"}"#, r#"{"n": {"m": 1}}"#]);
    }
}
