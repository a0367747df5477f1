//! Agent framework for disruption resolution
//!
//! Implements the reason-act-observe loop: the reasoner asks the oracle for the
//! next step, requested tools are dispatched, their observations are appended,
//! and the cycle repeats until the reasoner answers without tool calls.

mod agent_loop;
mod react;
mod reasoner;
mod state;

pub use agent_loop::AgentLoop;
pub use state::{AgentConfig, AgentOutcome, AgentState};

use synapse_core::OracleError;
use thiserror::Error;

use crate::tools::ToolError;

/// Failures that end a run
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Oracle request failed: {0}")]
    Oracle(#[from] OracleError),

    #[error("Tool dispatch failed: {0}")]
    Tool(#[from] ToolError),
}
