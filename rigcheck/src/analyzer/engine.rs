use crate::analyzer::balance::{BalanceCheck, BalanceThresholds, PerformanceBalanceRule};
use crate::analyzer::connectors::{ConnectorCheck, ConnectorRule};
use crate::analyzer::memory::{MemoryCheck, MemoryRule};
use crate::analyzer::physical::{PhysicalFitCheck, PhysicalFitRule};
use crate::analyzer::rules::*;
use crate::analyzer::scoring::ScoringPolicy;
use crate::analyzer::socket::{SocketCheck, SocketRule};
use crate::parts::{Category, PartSelection};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One report per check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckDetails {
    pub socket: SocketCheck,
    pub memory: MemoryCheck,
    pub connectors: ConnectorCheck,
    pub physical: PhysicalFitCheck,
    pub performance: BalanceCheck,
}

impl CheckDetails {
    /// `(check id, outcome)` in evaluation order.
    pub fn outcomes(&self) -> [(&'static str, &CheckOutcome); 5] {
        [
            ("socket", self.socket.outcome()),
            ("memory", self.memory.outcome()),
            ("connectors", self.connectors.outcome()),
            ("physical", self.physical.outcome()),
            ("performance", self.performance.outcome()),
        ]
    }

    pub fn unresolved_count(&self) -> usize {
        self.outcomes()
            .iter()
            .filter(|(_, o)| o.status.is_unresolved())
            .count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompatibilityResult {
    /// No critical issues and no check still waiting for a selection.
    pub is_compatible: bool,
    pub issues: Vec<CompatibilityIssue>,
    pub warnings: Vec<CompatibilityWarning>,
    pub score: u8,
    pub timestamp: DateTime<Utc>,
    pub details: CheckDetails,
}

impl CompatibilityResult {
    pub fn critical_issues(&self) -> impl Iterator<Item = &CompatibilityIssue> {
        self.issues.iter().filter(|i| i.is_critical())
    }

    pub fn has_issue(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }
}

/// Runs the five checks over a selection and aggregates them.
#[derive(Debug, Clone, Default)]
pub struct CompatibilityEngine {
    balance: PerformanceBalanceRule,
    scoring: ScoringPolicy,
}

impl CompatibilityEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(scoring: ScoringPolicy, thresholds: BalanceThresholds) -> Self {
        Self {
            balance: PerformanceBalanceRule::new(thresholds),
            scoring,
        }
    }

    pub fn scoring(&self) -> &ScoringPolicy {
        &self.scoring
    }

    /// Checks known to the engine, with their score weights.
    pub fn rules(&self) -> Vec<RuleInfo> {
        fn info<R: Rule>(rule: &R, scoring: &ScoringPolicy) -> RuleInfo {
            RuleInfo {
                id: rule.id(),
                name: rule.name(),
                requires: rule.requires(),
                weight: scoring.weight_of(rule.id()),
            }
        }
        vec![
            info(&SocketRule, &self.scoring),
            info(&MemoryRule, &self.scoring),
            info(&ConnectorRule, &self.scoring),
            info(&PhysicalFitRule, &self.scoring),
            info(&self.balance, &self.scoring),
        ]
    }

    pub fn evaluate(&self, selection: &PartSelection) -> CompatibilityResult {
        self.evaluate_at(selection, Utc::now())
    }

    /// Same as [`evaluate`](Self::evaluate) with a caller-supplied timestamp, which
    /// makes the result fully reproducible.
    pub fn evaluate_at(&self, selection: &PartSelection, timestamp: DateTime<Utc>) -> CompatibilityResult {
        let details = CheckDetails {
            socket: SocketRule.check(selection),
            memory: MemoryRule.check(selection),
            connectors: ConnectorRule.check(selection),
            physical: PhysicalFitRule.check(selection),
            performance: self.balance.check(selection),
        };

        let mut issues = Vec::new();
        let mut warnings = Vec::new();
        for (_, outcome) in details.outcomes() {
            issues.extend(outcome.issues.iter().cloned());
            warnings.extend(outcome.warnings.iter().cloned());
        }
        issues.extend(missing_part_issues(&details));

        let score = self.scoring.score(details.outcomes());
        let has_critical = issues.iter().any(CompatibilityIssue::is_critical);
        let is_compatible = !has_critical && details.unresolved_count() == 0;

        tracing::debug!(
            score,
            is_compatible,
            issues = issues.len(),
            warnings = warnings.len(),
            "compatibility evaluated"
        );

        CompatibilityResult {
            is_compatible,
            issues,
            warnings,
            score,
            timestamp,
            details,
        }
    }
}

/// One `missing_part` issue per unselected category some check is waiting on.
fn missing_part_issues(details: &CheckDetails) -> Vec<CompatibilityIssue> {
    let mut waiting: Vec<(Category, Vec<&str>)> = Vec::new();
    for (id, outcome) in details.outcomes() {
        for category in &outcome.waiting_on {
            match waiting.iter_mut().find(|(c, _)| c == category) {
                Some((_, checks)) => checks.push(id),
                None => waiting.push((*category, vec![id])),
            }
        }
    }
    waiting.sort_by_key(|(c, _)| *c);

    waiting
        .into_iter()
        .map(|(category, checks)| {
            CompatibilityIssue::warning(
                IssueKind::MissingPart,
                "Selection",
                &[category],
                format!(
                    "No {} selected ({} check{} pending)",
                    category.display_name(),
                    checks.join(", "),
                    if checks.len() == 1 { "" } else { "s" }
                ),
                format!("Select a {}", category.display_name()),
            )
        })
        .collect()
}
