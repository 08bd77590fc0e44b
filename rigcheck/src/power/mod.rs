//! Power Budget
//!
//! Estimates the draw of a selection, sizes the PSU and flags PSU problems.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │  Selection   │───▶│   Profile    │───▶│   Totals +   │
//! │   (parts)    │    │    Table     │    │   overhead   │
//! └──────────────┘    └──────────────┘    └──────┬───────┘
//!                                                │
//!                     ┌──────────────────────────┼──────────────┐
//!                     ▼                          ▼              ▼
//!              ┌────────────┐            ┌────────────┐  ┌────────────┐
//!              │ PSU sizing │            │ PSU checks │  │  Monthly   │
//!              │ (+20%, 50W)│            │ (warnings) │  │    cost    │
//!              └────────────┘            └────────────┘  └────────────┘
//! ```

pub mod profiles;
pub mod engine;
pub mod psu;
pub mod cost;

// Re-exports for convenience
pub use profiles::{PowerProfile, PowerProfileTable, ProfileError, ProfileSource};
pub use engine::{
    recommended_psu_wattage, ComponentPower, PowerEngine, PowerResult, PowerSeverity,
    PowerWarning, PowerWarningKind,
};
pub use psu::{psu_catalog, recommend_psus, EfficiencyRating, PsuSpecification};
pub use cost::{estimate_monthly_cost, DailyUsage, MonthlyCost};
