pub mod rules;
pub mod socket;
pub mod memory;
pub mod connectors;
pub mod physical;
pub mod balance;
pub mod scoring;
pub mod engine;

// Re-export for convenience
pub use rules::*;
pub use socket::{SocketCheck, SocketRule};
pub use memory::{MemoryCheck, MemoryRule};
pub use connectors::{ConnectorCheck, ConnectorRequirement, ConnectorRule, PowerRail};
pub use physical::{PhysicalFitCheck, PhysicalFitRule};
pub use balance::{BalanceCheck, BalanceThresholds, Bottleneck, PerformanceBalanceRule};
pub use scoring::ScoringPolicy;
pub use engine::{CheckDetails, CompatibilityEngine, CompatibilityResult};
