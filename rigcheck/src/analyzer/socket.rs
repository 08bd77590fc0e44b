use crate::analyzer::rules::*;
use crate::parts::{Category, PartSelection};
use serde::{Deserialize, Serialize};

const LABEL: &str = "Socket";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SocketCheck {
    #[serde(flatten)]
    pub outcome: CheckOutcome,
    pub cpu_socket: Option<String>,
    pub motherboard_socket: Option<String>,
}

impl CheckReport for SocketCheck {
    fn outcome(&self) -> &CheckOutcome {
        &self.outcome
    }
}

/// CPU socket against motherboard socket. Comparison is exact and case-sensitive.
pub struct SocketRule;

impl Rule for SocketRule {
    type Report = SocketCheck;

    fn id(&self) -> &'static str {
        "socket"
    }

    fn name(&self) -> &'static str {
        "CPU socket"
    }

    fn requires(&self) -> &'static [Category] {
        &[Category::Cpu, Category::Motherboard]
    }

    fn check(&self, selection: &PartSelection) -> SocketCheck {
        let cpu = selection.get(Category::Cpu);
        let motherboard = selection.get(Category::Motherboard);

        let cpu_socket = cpu.and_then(|p| p.specs().get_str("socket")).map(str::to_string);
        let motherboard_socket = motherboard
            .and_then(|p| p.specs().get_str("socket"))
            .map(str::to_string);

        let (Some(cpu), Some(motherboard)) = (cpu, motherboard) else {
            return SocketCheck {
                outcome: CheckOutcome::waiting(selection, self.requires(), "socket compatibility"),
                cpu_socket,
                motherboard_socket,
            };
        };

        let outcome = match (&cpu_socket, &motherboard_socket) {
            (Some(cs), Some(ms)) if cs == ms => {
                CheckOutcome::resolved(format!("CPU and motherboard both use {cs}"), vec![], vec![])
            }
            (Some(cs), Some(ms)) => CheckOutcome::resolved(
                format!("Socket mismatch: CPU uses {cs}, motherboard provides {ms}"),
                vec![CompatibilityIssue::critical(
                    IssueKind::SocketMismatch,
                    LABEL,
                    &[Category::Cpu, Category::Motherboard],
                    format!(
                        "{} ({}) does not fit {} ({})",
                        cpu.name, cs, motherboard.name, ms
                    ),
                    format!("Choose a {cs} motherboard or a CPU for the {ms} socket"),
                )],
                vec![],
            ),
            _ => CheckOutcome::resolved(
                "Socket information incomplete",
                vec![CompatibilityIssue::critical(
                    IssueKind::SocketMismatch,
                    LABEL,
                    &[Category::Cpu, Category::Motherboard],
                    "Socket information incomplete: cannot confirm the CPU fits the motherboard",
                    "Check the socket listed on both product pages",
                )],
                vec![],
            ),
        };

        tracing::debug!(status = ?outcome.status, "socket check");
        SocketCheck {
            outcome,
            cpu_socket,
            motherboard_socket,
        }
    }
}
