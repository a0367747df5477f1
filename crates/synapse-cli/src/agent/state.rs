//! Agent state management

use serde::Serialize;
use synapse_core::Usage;

use crate::conversation::Conversation;
use crate::prompts::MASTER_PROMPT;
use crate::tools::ToolCall;

const FINAL_ANSWER_MARKER: &str = "Final Answer:";

/// Configuration for the agent
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// System prompt sent ahead of the conversation
    pub system_prompt: String,
    /// Maximum reasoner turns before the run is aborted
    pub max_steps: usize,
    /// Print each node's output and the tool trace lines
    pub trace: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: MASTER_PROMPT.to_string(),
            max_steps: 25,
            trace: true,
        }
    }
}

impl AgentConfig {
    pub fn new(max_steps: usize) -> Self {
        Self {
            max_steps,
            ..Default::default()
        }
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

/// Where the loop currently is
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Phase {
    /// Ask the reasoner for the next message
    Reason,
    /// Run the tool calls from the latest reasoner message
    Act(Vec<ToolCall>),
    /// Reasoner answered without tool calls
    Done(String),
    /// Step budget exhausted
    Aborted,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AgentOutcome {
    Done { answer: String },
    Aborted { steps: usize },
}

/// State of the agent during execution
#[derive(Debug, Serialize)]
pub struct AgentState {
    pub conversation: Conversation,
    /// Reasoner turns taken
    pub steps: usize,
    pub usage: Usage,
    pub outcome: Option<AgentOutcome>,
}

impl AgentState {
    pub fn new(scenario: &str) -> Self {
        Self {
            conversation: Conversation::new(scenario),
            steps: 0,
            usage: Usage::default(),
            outcome: None,
        }
    }

    pub fn mark_done(&mut self, answer: String) {
        self.outcome = Some(AgentOutcome::Done { answer });
    }

    pub fn mark_aborted(&mut self) {
        self.outcome = Some(AgentOutcome::Aborted { steps: self.steps });
    }

    /// The final answer, if the run reached Done
    pub fn final_answer(&self) -> Option<&str> {
        match self.outcome {
            Some(AgentOutcome::Done { ref answer }) => Some(answer),
            _ => None,
        }
    }
}

/// Text after the last `Final Answer:` marker, or the whole content
pub(crate) fn final_answer_text(content: &str) -> String {
    match content.rfind(FINAL_ANSWER_MARKER) {
        Some(pos) => content[pos + FINAL_ANSWER_MARKER.len()..].trim().to_string(),
        None => content.trim().to_string(),
    }
}

pub(crate) fn has_final_answer(content: &str) -> bool {
    content.contains(FINAL_ANSWER_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_config_builder() {
        let config = AgentConfig::new(10).with_trace(false);

        assert_eq!(config.max_steps, 10);
        assert_eq!(config.system_prompt, MASTER_PROMPT);
        assert!(!config.trace);
    }

    #[test]
    fn test_default_config_uses_master_prompt() {
        let config = AgentConfig::default();
        assert_eq!(config.system_prompt, MASTER_PROMPT);
        assert!(config.trace);
    }

    #[test]
    fn test_agent_state_outcomes() {
        let mut state = AgentState::new("scenario");
        assert_eq!(state.conversation.len(), 1);
        assert!(state.outcome.is_none());

        state.mark_done("Resolved".to_string());
        assert_eq!(state.final_answer(), Some("Resolved"));

        let mut state = AgentState::new("scenario");
        state.steps = 4;
        state.mark_aborted();
        assert_eq!(state.outcome, Some(AgentOutcome::Aborted { steps: 4 }));
        assert!(state.final_answer().is_none());
    }

    #[test]
    fn test_final_answer_text() {
        assert_eq!(
            final_answer_text("Thought: done.\nFinal Answer: Refund issued."),
            "Refund issued."
        );
        assert_eq!(final_answer_text("  All sorted.  "), "All sorted.");
        assert!(has_final_answer("x Final Answer: y"));
        assert!(!has_final_answer("Thought: still working"));
    }
}
