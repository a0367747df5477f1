//! synapse: autonomous last-mile delivery disruption coordinator
//!
//! Feeds a disruption scenario to a reason-act loop backed by a hosted
//! chat-completions model and the simulated logistics tools.

mod agent;
mod conversation;
mod prompts;
mod tools;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use synapse_core::{Config, OpenRouterClient};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use agent::{AgentConfig, AgentLoop, AgentOutcome, AgentState};
use tools::logistics::create_logistics_registry;
use tools::router::ToolRouter;

const EXIT_ERROR: u8 = 1;
const EXIT_ABORTED: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "synapse")]
#[command(about = "Autonomous coordinator for last-mile delivery disruptions", version)]
struct Cli {
    /// Disruption scenario, in plain language
    #[arg(required = true, num_args = 1..)]
    scenario: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Model to use (overrides config)
    #[arg(short, long, env = "SYNAPSE_MODEL")]
    model: Option<String>,

    /// Maximum reasoner turns before giving up (overrides config)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    max_steps: Option<u64>,

    /// Path to a synapse.toml (default: search upward from the current directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the conversation as JSON to this file after the run, including failed runs
    #[arg(long)]
    transcript: Option<PathBuf>,

    /// Only print the final answer
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    ExitCode::from(execute(cli).await)
}

/// Run the CLI and map the result onto a process exit status
async fn execute(cli: Cli) -> u8 {
    match run(cli).await {
        Ok(outcome) => exit_status(&outcome),
        Err(e) => {
            eprint!("{}", error_report(&e));
            EXIT_ERROR
        }
    }
}

fn exit_status(outcome: &AgentOutcome) -> u8 {
    match outcome {
        AgentOutcome::Done { .. } => 0,
        AgentOutcome::Aborted { .. } => EXIT_ABORTED,
    }
}

fn error_report(e: &anyhow::Error) -> String {
    format!("\n--- An error occurred during agent execution ---\nError: {:#}\n", e)
}

async fn run(cli: Cli) -> Result<AgentOutcome> {
    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    debug!(?config, "Loaded configuration");

    let api_key = config.oracle.api_key()?;
    let mut client = OpenRouterClient::new(&config.oracle, api_key)?;
    if let Some(model) = cli.model {
        client = client.with_model(model);
    }

    let max_steps = cli
        .max_steps
        .map(|n| n as usize)
        .unwrap_or(config.agent.max_steps);
    let agent_config = AgentConfig::new(max_steps).with_trace(!cli.quiet);
    let registry = create_logistics_registry();
    debug!(tools = registry.len(), "Registered logistics tools");
    let agent = AgentLoop::new(Arc::new(client), ToolRouter::new(registry), agent_config);

    let scenario = cli.scenario.join(" ");
    if !cli.quiet {
        println!("--- Running Scenario ---");
        println!("{}", scenario);
        println!("\n--- Agent Execution Trace ---\n");
    }

    let mut state = AgentState::new(&scenario);
    let result = agent.drive(&mut state).await;

    if let Some(ref path) = cli.transcript {
        match write_transcript(&state, path) {
            Ok(()) => info!(path = %path.display(), "Wrote transcript"),
            Err(e) if result.is_err() => warn!(error = %e, "Failed to write transcript"),
            Err(e) => return Err(e),
        }
    }
    result?;

    if let Some(answer) = state.final_answer() {
        println!("--- Final Answer ---");
        println!("{}", answer);
    }
    if let Some(AgentOutcome::Aborted { steps }) = state.outcome {
        eprintln!("Stopped after {} steps without a final answer", steps);
        if let Some(last) = state.conversation.messages().last() {
            eprintln!("Last message: {}", last);
        }
    }

    state.outcome.context("Agent loop ended without an outcome")
}

fn write_transcript(state: &AgentState, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(state).context("Failed to serialize transcript")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write transcript: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Message;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("synapse").chain(args.iter().copied())).unwrap()
    }

    /// Oracle that answers every request with `reply` as the assistant message
    async fn oracle_replying(reply: Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": reply}],
                "usage": {"prompt_tokens": 10, "completion_tokens": 5}
            })))
            .mount(&server)
            .await;
        server
    }

    fn tool_call_reply(name: &str, arguments: Value) -> Value {
        json!({
            "role": "assistant",
            "content": "Thought: acting",
            "tool_calls": [{
                "id": "call_1",
                "type": "function",
                "function": {"name": name, "arguments": arguments.to_string()}
            }]
        })
    }

    /// synapse.toml pointing at `server`, with its key in a per-test env var
    fn write_config(dir: &TempDir, server: &MockServer, key_env: &str) -> String {
        std::env::set_var(key_env, "sk-test");
        let path = dir.path().join("synapse.toml");
        std::fs::write(
            &path,
            format!(
                "[oracle]\nbase_url = \"{}/api/v1\"\napi_key_env = \"{}\"\n",
                server.uri(),
                key_env
            ),
        )
        .unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_cli_joins_scenario_and_parses_flags() {
        let cli = cli(&["--max-steps", "3", "--quiet", "Driver", "is", "stuck"]);
        assert_eq!(cli.scenario.join(" "), "Driver is stuck");
        assert_eq!(cli.max_steps, Some(3));
        assert!(cli.quiet);
    }

    #[test]
    fn test_cli_requires_scenario_and_positive_steps() {
        assert!(Cli::try_parse_from(["synapse"]).is_err());
        assert!(Cli::try_parse_from(["synapse", "--max-steps", "0", "x"]).is_err());
    }

    #[test]
    fn test_exit_status_per_outcome() {
        let done = AgentOutcome::Done {
            answer: "ok".to_string(),
        };
        assert_eq!(exit_status(&done), 0);
        assert_eq!(exit_status(&AgentOutcome::Aborted { steps: 3 }), 2);
    }

    #[test]
    fn test_error_report_format() {
        let report = error_report(&anyhow::anyhow!("Unknown tool requested: teleport_driver"));
        assert!(report.contains("--- An error occurred during agent execution ---\n"));
        assert!(report.contains("Error: Unknown tool requested: teleport_driver"));
    }

    #[tokio::test]
    async fn test_final_answer_exits_zero() {
        let server = oracle_replying(json!({
            "role": "assistant",
            "content": "Thought: nothing to do.\nFinal Answer: No action required."
        }))
        .await;
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir, &server, "SYNAPSE_TEST_KEY_EXIT_DONE");

        let code = execute(cli(&["-c", &config, "--quiet", "Order", "delivered"])).await;
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_unknown_tool_exits_one_and_keeps_transcript() {
        let server = oracle_replying(tool_call_reply("teleport_driver", json!({}))).await;
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir, &server, "SYNAPSE_TEST_KEY_EXIT_ERROR");
        let transcript = dir.path().join("run.json");

        let code = execute(cli(&[
            "-c",
            &config,
            "--quiet",
            "--transcript",
            transcript.to_str().unwrap(),
            "Driver stuck",
        ]))
        .await;
        assert_eq!(code, 1);

        let value: Value =
            serde_json::from_str(&std::fs::read_to_string(&transcript).unwrap()).unwrap();
        assert!(value["outcome"].is_null());
        let messages = value["conversation"]["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1]["tool_calls"][0]["name"], "teleport_driver");
    }

    #[tokio::test]
    async fn test_step_limit_exits_two() {
        let server = oracle_replying(tool_call_reply(
            "get_merchant_status",
            json!({"merchant_id": "pizzapalace_123"}),
        ))
        .await;
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir, &server, "SYNAPSE_TEST_KEY_EXIT_ABORTED");

        let args: [&str; 6] = ["-c", &config, "--quiet", "--max-steps", "1", "Order late"];
        let code = execute(cli(&args)).await;
        assert_eq!(code, 2);
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_api_key_exits_one_before_any_request() {
        let server =
            oracle_replying(json!({"role": "assistant", "content": "Final Answer: ok"})).await;
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir, &server, "SYNAPSE_TEST_KEY_EXIT_NOKEY");
        std::env::remove_var("SYNAPSE_TEST_KEY_EXIT_NOKEY");

        let code = execute(cli(&["-c", &config, "--quiet", "Order late"])).await;
        assert_eq!(code, 1);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[test]
    fn test_write_transcript() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.json");

        let mut state = AgentState::new("Order late");
        state.conversation.push(Message::reasoner("Final Answer: ok", vec![]));
        state.steps = 1;
        state.mark_done("ok".to_string());
        write_transcript(&state, &path).unwrap();

        let value: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["outcome"]["outcome"], "done");
        assert_eq!(value["outcome"]["answer"], "ok");
        assert_eq!(value["conversation"]["messages"][0]["kind"], "user");
        assert_eq!(value["steps"], 1);
    }
}
