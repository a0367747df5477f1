//! Simulated logistics tools
//!
//! Every tool is a side-effect-free stand-in for a platform API: it prints a
//! trace line and returns canned or input-echoing data.

mod customer;
mod driver;
mod mediation;
mod merchant;

pub use customer::{IssueInstantRefundTool, NotifyCustomerTool};
pub use driver::{ExonerateDriverTool, ReRouteDriverTool};
pub use mediation::{AnalyzeEvidenceTool, InitiateMediationFlowTool};
pub use merchant::{GetMerchantStatusTool, GetNearbyMerchantsTool, LogMerchantPackagingFeedbackTool};

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::registry::ToolRegistry;

/// Create the registry with all nine logistics tools
pub fn create_logistics_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    // Merchant
    registry.register(GetMerchantStatusTool);
    registry.register(GetNearbyMerchantsTool);
    registry.register(LogMerchantPackagingFeedbackTool);

    // Customer
    registry.register(NotifyCustomerTool);
    registry.register(IssueInstantRefundTool);

    // Driver
    registry.register(ReRouteDriverTool);
    registry.register(ExonerateDriverTool);

    // Dispute mediation
    registry.register(InitiateMediationFlowTool);
    registry.register(AnalyzeEvidenceTool);

    registry
}

/// Deterministic id derived from `seed`, e.g. `msg_3f2a...`
pub(crate) fn stable_id(prefix: &str, seed: &str) -> String {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    format!("{}_{:x}", prefix, hasher.finish())
}
