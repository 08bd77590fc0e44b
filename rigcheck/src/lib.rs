//! RigCheck - PC build compatibility and power budget evaluation
//!
//! This library takes a (possibly partial) selection of PC parts and reports
//! whether they work together: CPU socket, memory support, PSU connectors,
//! physical fit in the case and CPU/GPU balance, plus a 0-100 compatibility score
//! and a power budget with PSU sizing.
//!
//! # Quick Start
//!
//! ```
//! use rigcheck::prelude::*;
//!
//! let selection = PartSelection::new()
//!     .with(
//!         Category::Cpu,
//!         Part::new("cpu-1", "Ryzen 5 7600", Category::Cpu)
//!             .with_specs(Specifications::new().with("socket", "AM5")),
//!     )
//!     .with(
//!         Category::Motherboard,
//!         Part::new("mb-1", "B650M Board", Category::Motherboard)
//!             .with_specs(Specifications::new().with("socket", "AM5")),
//!     );
//!
//! let result = rigcheck::evaluate_compatibility(&selection);
//! assert!(result.details.socket.outcome.is_compatible());
//!
//! let power = rigcheck::evaluate_power(&selection);
//! assert_eq!(power.recommended_psu % 50, 0);
//! ```
//!
//! Evaluation is pure: no I/O, no shared state, and no error path. Missing parts
//! leave checks in an explicit unresolved state; malformed specs degrade to
//! defaults.

pub mod analyzer;
pub mod core;
pub mod parts;
pub mod power;

// Re-export main types
pub use crate::core::{
    discover_build_files, BuildReport, EvaluationOptions, ReportStats, RigCheckCore, RigCheckError,
};
pub use analyzer::{
    CheckStatus, CompatibilityEngine, CompatibilityIssue, CompatibilityResult,
    CompatibilityWarning, IssueKind, IssueSeverity, ScoringPolicy, WarningPriority,
};
pub use parts::{Category, Part, PartSelection, SpecValue, Specifications};
pub use power::{
    EfficiencyRating, MonthlyCost, PowerEngine, PowerProfileTable, PowerResult, PowerWarning,
    PowerWarningKind, PsuSpecification,
};

/// Compatibility verdict for a selection with the default scoring policy.
pub fn evaluate_compatibility(selection: &PartSelection) -> CompatibilityResult {
    CompatibilityEngine::new().evaluate(selection)
}

/// Power budget for a selection with the built-in profile table.
pub fn evaluate_power(selection: &PartSelection) -> PowerResult {
    PowerEngine::default().evaluate(selection)
}

/// Catalog PSUs with at least `required_wattage` capacity.
pub fn recommend_psus(required_wattage: u32) -> Vec<PsuSpecification> {
    power::recommend_psus(required_wattage)
}

/// Monthly electricity cost of a build.
pub fn estimate_monthly_cost(power: &PowerResult, usage_hours_per_day: f64, rate_per_kwh: f64) -> MonthlyCost {
    power::estimate_monthly_cost(power, usage_hours_per_day, rate_per_kwh)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        BuildReport, Category, CheckStatus, CompatibilityEngine, CompatibilityResult,
        EvaluationOptions, IssueKind, Part, PartSelection, PowerEngine, PowerResult,
        PowerWarningKind, RigCheckCore, RigCheckError, Specifications,
    };
}
