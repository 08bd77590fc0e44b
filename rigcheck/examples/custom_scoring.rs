//! Example: using CompatibilityEngine and PowerEngine directly with a stricter
//! scoring policy (without RigCheckCore).
//! Run with: cargo run --example custom_scoring [path/to/build.json]

use rigcheck::analyzer::BalanceThresholds;
use rigcheck::{CompatibilityEngine, PowerEngine, RigCheckCore, ScoringPolicy};
use std::path::Path;

fn main() -> Result<(), rigcheck::RigCheckError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/socket_mismatch.json".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example custom_scoring [path/to/build.json]");
        std::process::exit(1);
    }

    let selection = RigCheckCore::load_selection(path)?;

    let policy = ScoringPolicy {
        issue_penalty: 20,
        warning_penalty: 5,
        ..ScoringPolicy::default()
    };
    let thresholds = BalanceThresholds {
        min_memory_gb: 32.0,
        ..BalanceThresholds::default()
    };
    let result = CompatibilityEngine::with_policy(policy, thresholds).evaluate(&selection);

    println!("Strict score for {}: {}/100", path.display(), result.score);
    for issue in &result.issues {
        println!("  [{:?}] {}", issue.severity, issue.message);
    }
    for warning in &result.warnings {
        println!("  [{:?}] {}", warning.priority, warning.message);
    }

    let power = PowerEngine::default().evaluate(&selection);
    for psu in rigcheck::recommend_psus(power.recommended_psu).iter().take(3) {
        println!("  PSU option: {} {} ({}W, {})", psu.manufacturer, psu.model, psu.capacity, psu.efficiency);
    }

    if result.critical_issues().count() > 0 {
        std::process::exit(1);
    }
    Ok(())
}
