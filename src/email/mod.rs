//! Email discovery: pattern analysis, peer registry, and the strategy waterfall.

pub mod pattern;
pub mod registry;
pub mod waterfall;

pub use pattern::{PatternAnalyzer, PatternShape, RankedPattern};
pub use registry::PeerRegistry;
pub use waterfall::{DiscoveryStrategy, EmailDiscovery, EmailWaterfall, StrategyOutcome};

/// A person with a known email, observed during a run.
///
/// Observations accumulate in the [`PeerRegistry`] so later prospects from
/// the same company can reuse an established address pattern.
#[derive(Debug, Clone)]
pub struct PeerObservation {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
}
