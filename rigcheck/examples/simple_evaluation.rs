//! Simple evaluation example: check a build file and print results.

use rigcheck::prelude::*;
use std::path::Path;

fn main() -> Result<(), RigCheckError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/complete_build.json".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example simple_evaluation [path/to/build.json]");
        std::process::exit(1);
    }

    let report = RigCheckCore::evaluate_file(path, &EvaluationOptions::default())?;

    println!("Build: {} ({} parts)", path.display(), report.part_count);
    println!("Compatibility score: {}/100", report.compatibility.score);
    println!(
        "Power: {}W peak, {}W PSU recommended",
        report.power.total_max, report.power.recommended_psu
    );
    println!("Total findings: {}", report.total_findings());
    println!();

    if report.stats.critical > 0 {
        println!("CRITICAL issues:");
        for issue in report.compatibility.critical_issues() {
            println!("  - {}", issue.message);
            println!("    Fix: {}", issue.suggestion);
        }
    }

    if report.has_critical() {
        println!("\nBuild has critical problems.");
        std::process::exit(1);
    }

    println!("\nNo critical problems.");
    Ok(())
}
