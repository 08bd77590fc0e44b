use crate::analyzer::rules::*;
use crate::parts::{Category, PartSelection};
use serde::{Deserialize, Serialize};

const LABEL: &str = "Memory";

/// Board capacity assumed when the listing does not state one (GB).
pub const DEFAULT_MAX_MEMORY_GB: f64 = 128.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryCheck {
    #[serde(flatten)]
    pub outcome: CheckOutcome,
    pub memory_type: Option<String>,
    /// Empty means the board does not constrain the memory type.
    pub supported_types: Vec<String>,
    pub capacity_gb: f64,
    pub max_capacity_gb: f64,
    pub type_compatible: bool,
    pub capacity_compatible: bool,
}

impl CheckReport for MemoryCheck {
    fn outcome(&self) -> &CheckOutcome {
        &self.outcome
    }
}

/// Memory type and capacity against what the motherboard supports.
pub struct MemoryRule;

impl Rule for MemoryRule {
    type Report = MemoryCheck;

    fn id(&self) -> &'static str {
        "memory"
    }

    fn name(&self) -> &'static str {
        "Memory type and capacity"
    }

    fn requires(&self) -> &'static [Category] {
        &[Category::Memory, Category::Motherboard]
    }

    fn check(&self, selection: &PartSelection) -> MemoryCheck {
        let (Some(memory), Some(motherboard)) = (
            selection.get(Category::Memory),
            selection.get(Category::Motherboard),
        ) else {
            return MemoryCheck {
                outcome: CheckOutcome::waiting(selection, self.requires(), "memory compatibility"),
                memory_type: None,
                supported_types: Vec::new(),
                capacity_gb: 0.0,
                max_capacity_gb: DEFAULT_MAX_MEMORY_GB,
                type_compatible: true,
                capacity_compatible: true,
            };
        };

        let memory_type = memory.specs().get_str("type").map(str::to_string);
        let supported_types: Vec<String> = motherboard
            .specs()
            .get_strings("memoryType")
            .into_iter()
            .map(str::to_string)
            .collect();
        let max_capacity_gb = motherboard.specs().get_number_or("maxMemory", DEFAULT_MAX_MEMORY_GB);
        let capacity_gb = memory.specs().get_number_or("capacity", 0.0);

        let type_compatible = supported_types.is_empty()
            || memory_type
                .as_ref()
                .map(|t| supported_types.contains(t))
                .unwrap_or(false);
        let capacity_compatible = capacity_gb <= max_capacity_gb;

        let mut issues = Vec::new();
        if !type_compatible {
            let found = memory_type.as_deref().unwrap_or("unknown type");
            issues.push(CompatibilityIssue::critical(
                IssueKind::MemoryIncompatible,
                LABEL,
                &[Category::Memory, Category::Motherboard],
                format!(
                    "{} is {}, but {} supports {}",
                    memory.name,
                    found,
                    motherboard.name,
                    supported_types.join("/")
                ),
                format!("Choose {} memory", supported_types.join(" or ")),
            ));
        }
        if !capacity_compatible {
            issues.push(CompatibilityIssue::critical(
                IssueKind::MemoryIncompatible,
                LABEL,
                &[Category::Memory, Category::Motherboard],
                format!(
                    "{}GB of memory exceeds the motherboard maximum of {}GB",
                    capacity_gb, max_capacity_gb
                ),
                format!("Reduce the kit to {}GB or less", max_capacity_gb),
            ));
        }

        let message = match (type_compatible, capacity_compatible) {
            (true, true) => format!(
                "{} {}GB is supported by the motherboard",
                memory_type.as_deref().unwrap_or("Memory"),
                capacity_gb
            ),
            (false, true) => "Memory type is not supported by the motherboard".to_string(),
            (true, false) => "Memory capacity exceeds the motherboard maximum".to_string(),
            (false, false) => {
                "Memory type and capacity are both unsupported by the motherboard".to_string()
            }
        };

        let outcome = CheckOutcome::resolved(message, issues, vec![]);
        tracing::debug!(status = ?outcome.status, type_compatible, capacity_compatible, "memory check");
        MemoryCheck {
            outcome,
            memory_type,
            supported_types,
            capacity_gb,
            max_capacity_gb,
            type_compatible,
            capacity_compatible,
        }
    }
}
