//! Agent loop implementation

use std::sync::Arc;

use synapse_core::{Oracle, ToolDefinition};
use tracing::{debug, info, instrument, warn};

use crate::conversation::Message;
use crate::tools::router::ToolRouter;
use crate::tools::ToolContext;

use super::reasoner::Reasoner;
use super::state::{final_answer_text, AgentConfig, AgentState, Phase};
use super::AgentError;

// ANSI colors
const GREEN: &str = "\x1b[92m";
const BLUE: &str = "\x1b[94m";
const YELLOW: &str = "\x1b[93m";
const CYAN: &str = "\x1b[96m";
const RESET: &str = "\x1b[0m";

/// The agent loop orchestrator
pub struct AgentLoop {
    reasoner: Reasoner,
    router: ToolRouter,
    config: AgentConfig,
    tool_defs: Vec<ToolDefinition>,
}

impl AgentLoop {
    pub fn new(oracle: Arc<dyn Oracle>, router: ToolRouter, config: AgentConfig) -> Self {
        let reasoner = Reasoner::new(oracle, config.system_prompt.clone());
        let tool_defs = router.registry().tool_definitions();
        Self {
            reasoner,
            router,
            config,
            tool_defs,
        }
    }

    /// Run the agent on a scenario until the reasoner answers without tool
    /// calls or the step budget runs out
    #[cfg(test)]
    pub async fn run(&self, scenario: &str) -> Result<AgentState, AgentError> {
        let mut state = AgentState::new(scenario);
        self.drive(&mut state).await?;
        Ok(state)
    }

    /// Drive `state` to an outcome. On error the conversation so far stays in
    /// `state` and `outcome` is left unset.
    #[instrument(skip_all, fields(model = %self.reasoner.model_id()))]
    pub async fn drive(&self, state: &mut AgentState) -> Result<(), AgentError> {
        info!(
            max_steps = self.config.max_steps,
            tools = self.tool_defs.len(),
            "Starting agent loop"
        );
        let tool_ctx = ToolContext::new(self.config.trace);
        let mut phase = Phase::Reason;

        loop {
            phase = match phase {
                Phase::Reason => self.reason(state).await?,
                Phase::Act(calls) => {
                    debug!(tool_count = calls.len(), "Processing tool calls");
                    let observations = self.router.route_all(&calls, &tool_ctx).await?;
                    for obs in observations {
                        let message = Message::from(obs);
                        self.print_node(CYAN, &message);
                        state.conversation.push(message);
                    }
                    Phase::Reason
                }
                Phase::Done(answer) => {
                    info!(
                        steps = state.steps,
                        usage = state.usage.total_tokens(),
                        "Agent completed scenario"
                    );
                    state.mark_done(answer);
                    return Ok(());
                }
                Phase::Aborted => {
                    warn!(steps = state.steps, "Step limit reached without a final answer");
                    if self.config.trace {
                        println!("{}[Aborted after {} steps]{}", YELLOW, state.steps, RESET);
                    }
                    state.mark_aborted();
                    return Ok(());
                }
            };
        }
    }

    async fn reason(&self, state: &mut AgentState) -> Result<Phase, AgentError> {
        if state.steps >= self.config.max_steps {
            return Ok(Phase::Aborted);
        }
        state.steps += 1;
        debug!(step = state.steps, messages = state.conversation.len(), "Calling reasoner");

        let turn = self.reasoner.think(&state.conversation, &self.tool_defs).await?;
        state.usage.add(turn.usage);

        let (next, color) = if turn.tool_calls.is_empty() {
            (Phase::Done(final_answer_text(&turn.content)), GREEN)
        } else {
            (Phase::Act(turn.tool_calls.clone()), BLUE)
        };

        let message = Message::reasoner(turn.content, turn.tool_calls);
        self.print_node(color, &message);
        state.conversation.push(message);
        Ok(next)
    }

    fn print_node(&self, color: &str, message: &Message) {
        if self.config.trace {
            println!("{}{}{}", color, message, RESET);
            println!("\n---\n");
        }
    }
}
