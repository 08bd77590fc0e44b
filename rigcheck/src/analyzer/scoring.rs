//! Compatibility score.
//!
//! Starts at 100. Every check that is not `Compatible` costs its weight once,
//! whether it is still unresolved or has failed. Each critical issue raised by a
//! resolved check costs `issue_penalty` on top, and each warning costs
//! `warning_penalty`. `missing_part` issues only restate an unresolved check and
//! are never charged again. The result is clamped to 0..=100.

use crate::analyzer::rules::{CheckOutcome, CheckStatus, IssueKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScoringPolicy {
    pub socket_weight: u32,
    pub memory_weight: u32,
    pub connectors_weight: u32,
    pub physical_weight: u32,
    pub performance_weight: u32,
    pub issue_penalty: u32,
    pub warning_penalty: u32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            socket_weight: 30,
            memory_weight: 25,
            connectors_weight: 20,
            physical_weight: 15,
            performance_weight: 5,
            issue_penalty: 10,
            warning_penalty: 3,
        }
    }
}

impl ScoringPolicy {
    /// Weight for a check id, 0 for ids the policy does not know.
    pub fn weight_of(&self, check_id: &str) -> u32 {
        match check_id {
            "socket" => self.socket_weight,
            "memory" => self.memory_weight,
            "connectors" => self.connectors_weight,
            "physical" => self.physical_weight,
            "performance" => self.performance_weight,
            _ => 0,
        }
    }

    /// Penalty contributed by a single check outcome.
    pub fn penalty(&self, check_id: &str, outcome: &CheckOutcome) -> i64 {
        let weight = match outcome.status {
            CheckStatus::Compatible => 0,
            CheckStatus::Unresolved | CheckStatus::Incompatible => self.weight_of(check_id),
        };
        let critical = outcome
            .issues
            .iter()
            .filter(|i| i.is_critical() && i.kind != IssueKind::MissingPart)
            .count() as i64;
        let warnings = outcome.warnings.len() as i64;

        weight as i64 + critical * self.issue_penalty as i64 + warnings * self.warning_penalty as i64
    }

    /// Score over `(check id, outcome)` pairs.
    pub fn score<'a>(&self, outcomes: impl IntoIterator<Item = (&'a str, &'a CheckOutcome)>) -> u8 {
        let raw = outcomes
            .into_iter()
            .fold(100i64, |acc, (id, outcome)| acc - self.penalty(id, outcome));
        raw.clamp(0, 100) as u8
    }
}
