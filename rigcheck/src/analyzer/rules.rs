use crate::parts::{Category, PartSelection};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Verdict of a single check.
///
/// `Unresolved` means a part the check depends on has not been selected yet. It is
/// neither a pass nor a failure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Unresolved,
    Compatible,
    Incompatible,
}

impl CheckStatus {
    pub fn is_unresolved(&self) -> bool {
        matches!(self, CheckStatus::Unresolved)
    }

    /// Vacuous truth: an unresolved check does not report an incompatibility.
    pub fn is_compatible(&self) -> bool {
        !matches!(self, CheckStatus::Incompatible)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingPart,
    SocketMismatch,
    MemoryIncompatible,
    ConnectorMissing,
    SizeConflict,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::MissingPart => "missing_part",
            IssueKind::SocketMismatch => "socket_mismatch",
            IssueKind::MemoryIncompatible => "memory_incompatible",
            IssueKind::ConnectorMissing => "connector_missing",
            IssueKind::SizeConflict => "size_conflict",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Critical,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompatibilityIssue {
    pub id: String,
    pub kind: IssueKind,
    pub severity: IssueSeverity,
    pub message: String,
    pub affected: Vec<Category>,
    pub suggestion: String,
    /// Human-facing label of the concern, e.g. "Power connectors".
    pub category: String,
}

impl CompatibilityIssue {
    pub fn critical(
        kind: IssueKind,
        label: &str,
        affected: &[Category],
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::build(kind, IssueSeverity::Critical, label, affected, message.into(), suggestion.into())
    }

    pub fn warning(
        kind: IssueKind,
        label: &str,
        affected: &[Category],
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::build(kind, IssueSeverity::Warning, label, affected, message.into(), suggestion.into())
    }

    fn build(
        kind: IssueKind,
        severity: IssueSeverity,
        label: &str,
        affected: &[Category],
        message: String,
        suggestion: String,
    ) -> Self {
        Self {
            id: finding_id(kind.as_str(), &message),
            kind,
            severity,
            message,
            affected: affected.to_vec(),
            suggestion,
            category: label.to_string(),
        }
    }

    pub fn is_critical(&self) -> bool {
        self.severity == IssueSeverity::Critical
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WarningPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompatibilityWarning {
    pub id: String,
    pub message: String,
    pub recommendation: String,
    pub priority: WarningPriority,
}

impl CompatibilityWarning {
    pub fn new(
        priority: WarningPriority,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        let message = message.into();
        Self {
            id: finding_id("warning", &message),
            message,
            recommendation: recommendation.into(),
            priority,
        }
    }
}

/// Ids are name-based so the same finding on the same selection always gets the
/// same id.
fn finding_id(kind: &str, message: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("{kind}:{message}").as_bytes()).to_string()
}

/// Verdict shared by every check: status, a one-line summary and the findings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckOutcome {
    pub status: CheckStatus,
    pub message: String,
    /// Categories the check is waiting on while unresolved.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub waiting_on: Vec<Category>,
    #[serde(default)]
    pub issues: Vec<CompatibilityIssue>,
    #[serde(default)]
    pub warnings: Vec<CompatibilityWarning>,
}

impl CheckOutcome {
    /// Outcome for a check whose inputs are not all selected yet.
    pub fn waiting(selection: &PartSelection, needs: &[Category], what: &str) -> Self {
        let waiting_on: Vec<Category> = needs
            .iter()
            .copied()
            .filter(|c| !selection.contains(*c))
            .collect();
        let names: Vec<&str> = waiting_on.iter().map(|c| c.display_name()).collect();
        Self {
            status: CheckStatus::Unresolved,
            message: format!("Waiting for {} selection to check {}", names.join(" and "), what),
            waiting_on,
            issues: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Resolved outcome: incompatible iff any critical issue was raised.
    pub fn resolved(
        message: impl Into<String>,
        issues: Vec<CompatibilityIssue>,
        warnings: Vec<CompatibilityWarning>,
    ) -> Self {
        let status = if issues.iter().any(CompatibilityIssue::is_critical) {
            CheckStatus::Incompatible
        } else {
            CheckStatus::Compatible
        };
        Self {
            status,
            message: message.into(),
            waiting_on: Vec::new(),
            issues,
            warnings,
        }
    }

    pub fn is_compatible(&self) -> bool {
        self.status.is_compatible()
    }
}

/// Report produced by a check. Concrete reports add check-specific detail on top
/// of the shared outcome.
pub trait CheckReport {
    fn outcome(&self) -> &CheckOutcome;

    fn status(&self) -> CheckStatus {
        self.outcome().status
    }
}

/// A single compatibility rule evaluated over a selection.
pub trait Rule: Send + Sync {
    type Report: CheckReport;

    fn id(&self) -> &'static str;
    fn name(&self) -> &'static str;
    /// Categories the rule needs before it can resolve.
    fn requires(&self) -> &'static [Category];
    fn check(&self, selection: &PartSelection) -> Self::Report;
}

/// Description of a rule for listings.
#[derive(Debug, Clone, Serialize)]
pub struct RuleInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub requires: &'static [Category],
    pub weight: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finding_ids_are_stable() {
        let a = CompatibilityIssue::critical(
            IssueKind::SocketMismatch,
            "Socket",
            &[Category::Cpu],
            "mismatch",
            "fix",
        );
        let b = CompatibilityIssue::critical(
            IssueKind::SocketMismatch,
            "Socket",
            &[Category::Cpu],
            "mismatch",
            "fix",
        );
        assert_eq!(a.id, b.id);

        let c = CompatibilityIssue::critical(
            IssueKind::SizeConflict,
            "Socket",
            &[Category::Cpu],
            "mismatch",
            "fix",
        );
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn test_resolved_status_follows_critical_issues() {
        let warning_only = CheckOutcome::resolved(
            "ok",
            vec![CompatibilityIssue::warning(IssueKind::SizeConflict, "Fit", &[], "tight", "")],
            vec![],
        );
        assert_eq!(warning_only.status, CheckStatus::Compatible);

        let critical = CheckOutcome::resolved(
            "bad",
            vec![CompatibilityIssue::critical(IssueKind::SizeConflict, "Fit", &[], "too long", "")],
            vec![],
        );
        assert_eq!(critical.status, CheckStatus::Incompatible);
    }

    #[test]
    fn test_waiting_lists_only_missing_categories() {
        let selection = PartSelection::new().with(
            Category::Cpu,
            crate::parts::Part::new("c", "CPU", Category::Cpu),
        );
        let outcome = CheckOutcome::waiting(&selection, &[Category::Cpu, Category::Motherboard], "sockets");
        assert!(outcome.status.is_unresolved());
        assert!(outcome.status.is_compatible());
        assert_eq!(outcome.waiting_on, vec![Category::Motherboard]);
        assert!(outcome.message.contains("Motherboard"));
    }
}
