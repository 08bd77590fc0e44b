//! Core evaluation API shared by library users and the CLI.
//! Evaluation itself is pure; only loading selections and tables touches the
//! filesystem.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analyzer::balance::BalanceThresholds;
use crate::analyzer::engine::{CompatibilityEngine, CompatibilityResult};
use crate::analyzer::rules::{IssueKind, IssueSeverity, WarningPriority};
use crate::analyzer::scoring::ScoringPolicy;
use crate::parts::PartSelection;
use crate::power::cost::{estimate_monthly_cost, MonthlyCost};
use crate::power::engine::{PowerEngine, PowerResult, PowerSeverity};
use crate::power::profiles::{PowerProfileTable, ProfileError};

#[derive(Debug, thiserror::Error)]
pub enum RigCheckError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Power profile error: {0}")]
    Catalog(#[from] ProfileError),
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for RigCheckError {
    fn from(e: serde_json::Error) -> Self {
        RigCheckError::Parse(e.to_string())
    }
}

/// Options for evaluation runs.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EvaluationOptions {
    pub scoring: ScoringPolicy,
    pub balance: BalanceThresholds,
    pub usage_hours_per_day: f64,
    /// Electricity price per kWh.
    pub electricity_rate: f64,
    /// Extra power profile table layered over the built-in one.
    pub power_profiles: Option<PathBuf>,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            scoring: ScoringPolicy::default(),
            balance: BalanceThresholds::default(),
            usage_hours_per_day: 6.0,
            electricity_rate: 0.15,
            power_profiles: None,
        }
    }
}

impl EvaluationOptions {
    pub fn load_from_file(path: &Path) -> Result<Self, RigCheckError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// The built-in profile table, with the configured override layered on top.
    pub fn profile_table(&self) -> Result<PowerProfileTable, RigCheckError> {
        let mut table = PowerProfileTable::builtin().clone();
        if let Some(path) = &self.power_profiles {
            table.merge(PowerProfileTable::load_from_file(path)?);
        }
        Ok(table)
    }
}

/// Everything known about one build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    pub part_count: usize,
    pub total_price: u64,
    pub compatibility: CompatibilityResult,
    pub power: PowerResult,
    pub monthly_cost: MonthlyCost,
    pub stats: ReportStats,
}

/// Finding counts by level, across compatibility and power findings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportStats {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl ReportStats {
    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }
}

impl BuildReport {
    pub fn has_critical(&self) -> bool {
        self.stats.critical > 0
    }

    pub fn has_high_or_critical(&self) -> bool {
        self.stats.critical > 0 || self.stats.high > 0
    }

    pub fn total_findings(&self) -> usize {
        self.stats.total()
    }
}

fn report_stats(compatibility: &CompatibilityResult, power: &PowerResult) -> ReportStats {
    let mut stats = ReportStats::default();
    for issue in &compatibility.issues {
        match (issue.severity, issue.kind) {
            (IssueSeverity::Critical, _) => stats.critical += 1,
            // A part not picked yet is a reminder, not a defect.
            (IssueSeverity::Warning, IssueKind::MissingPart) => stats.low += 1,
            (IssueSeverity::Warning, _) => stats.high += 1,
        }
    }
    for warning in &compatibility.warnings {
        match warning.priority {
            WarningPriority::High => stats.high += 1,
            WarningPriority::Medium => stats.medium += 1,
            WarningPriority::Low => stats.low += 1,
        }
    }
    for warning in &power.warnings {
        match warning.severity {
            PowerSeverity::Critical => stats.critical += 1,
            PowerSeverity::High => stats.high += 1,
            PowerSeverity::Medium => stats.medium += 1,
            PowerSeverity::Low => stats.low += 1,
        }
    }
    stats
}

/// Recursively discover build selection files (`*.json`) in a directory.
pub fn discover_build_files(dir: &Path) -> Result<Vec<PathBuf>, RigCheckError> {
    let mut files = Vec::new();
    walk_dir(dir, &mut files, 0)?;
    files.sort();
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>, depth: usize) -> Result<(), RigCheckError> {
    if depth > 20 {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name.starts_with('.') || name == "node_modules" || name == "target" {
                continue;
            }
            walk_dir(&path, files, depth + 1)?;
        } else if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
            files.push(path);
        }
    }
    Ok(())
}

/// Core evaluation API.
pub struct RigCheckCore;

impl RigCheckCore {
    pub fn load_selection(path: &Path) -> Result<PartSelection, RigCheckError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| RigCheckError::Parse(format!("{}: {}", path.display(), e)))
    }

    /// Evaluate a selection with the built-in profile table.
    pub fn evaluate(selection: &PartSelection, options: &EvaluationOptions) -> BuildReport {
        Self::evaluate_with(selection, options, PowerProfileTable::builtin(), Utc::now())
    }

    /// Evaluate with an explicit profile table and timestamp.
    pub fn evaluate_with(
        selection: &PartSelection,
        options: &EvaluationOptions,
        profiles: &PowerProfileTable,
        timestamp: DateTime<Utc>,
    ) -> BuildReport {
        let engine = CompatibilityEngine::with_policy(options.scoring, options.balance);
        let compatibility = engine.evaluate_at(selection, timestamp);
        let power = PowerEngine::new(profiles).evaluate(selection);
        let monthly_cost =
            estimate_monthly_cost(&power, options.usage_hours_per_day, options.electricity_rate);
        let stats = report_stats(&compatibility, &power);

        BuildReport {
            file: None,
            part_count: selection.len(),
            total_price: selection.total_price(),
            compatibility,
            power,
            monthly_cost,
            stats,
        }
    }

    /// Evaluate a single selection file.
    pub fn evaluate_file(path: &Path, options: &EvaluationOptions) -> Result<BuildReport, RigCheckError> {
        let selection = Self::load_selection(path)?;
        let profiles = options.profile_table()?;
        let mut report = Self::evaluate_with(&selection, options, &profiles, Utc::now());
        report.file = Some(path.to_path_buf());
        Ok(report)
    }

    /// Evaluate every selection file under a directory. Files that fail to parse
    /// are skipped with a warning.
    pub fn evaluate_directory(
        dir: &Path,
        options: &EvaluationOptions,
    ) -> Result<Vec<BuildReport>, RigCheckError> {
        let files = discover_build_files(dir)?;
        let profiles = options.profile_table()?;
        let mut reports = Vec::new();
        for path in files {
            match Self::load_selection(&path) {
                Ok(selection) => {
                    let mut report = Self::evaluate_with(&selection, options, &profiles, Utc::now());
                    report.file = Some(path);
                    reports.push(report);
                }
                Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
            }
        }
        tracing::info!("Evaluated {} builds under {}", reports.len(), dir.display());
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parts::{Category, Part, Specifications};

    #[test]
    fn test_options_partial_json() {
        let options: EvaluationOptions =
            serde_json::from_str(r#"{"electricity_rate": 0.3, "scoring": {"warning_penalty": 1}}"#).unwrap();
        assert_eq!(options.electricity_rate, 0.3);
        assert_eq!(options.usage_hours_per_day, 6.0);
        assert_eq!(options.scoring.warning_penalty, 1);
        assert_eq!(options.scoring.socket_weight, 30);
    }

    #[test]
    fn test_report_totals() {
        let selection = PartSelection::new()
            .with(
                Category::Cpu,
                Part::new("c", "CPU", Category::Cpu)
                    .with_price(32000)
                    .with_specs(Specifications::new().with("socket", "LGA1700")),
            )
            .with(
                Category::Motherboard,
                Part::new("m", "Board", Category::Motherboard)
                    .with_price(15000)
                    .with_specs(Specifications::new().with("socket", "LGA1700")),
            );
        let report = RigCheckCore::evaluate(&selection, &EvaluationOptions::default());
        assert_eq!(report.total_price, 47000);
        assert_eq!(report.part_count, 2);
        assert!(!report.compatibility.has_issue(IssueKind::SocketMismatch));
        // no PSU selected
        assert!(report.has_critical());
        assert!(report.monthly_cost.total > 0.0);
    }

    #[test]
    fn test_discover_and_evaluate_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), "{}").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("b.json"), r#"{"cpu": null}"#).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignore").unwrap();
        std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();

        let files = discover_build_files(dir.path()).unwrap();
        assert_eq!(files.len(), 3);

        let reports = RigCheckCore::evaluate_directory(dir.path(), &EvaluationOptions::default()).unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.file.is_some()));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = RigCheckCore::load_selection(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, RigCheckError::Io(_)));
    }
}
