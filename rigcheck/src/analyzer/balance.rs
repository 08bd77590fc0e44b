use crate::analyzer::rules::*;
use crate::parts::{Category, PartSelection};
use serde::{Deserialize, Serialize};

/// GPU/CPU price ratio bounds. Price is only a rough stand-in for performance,
/// so these are tunable rather than fixed contracts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BalanceThresholds {
    /// Below this ratio the GPU is considered weak for the CPU.
    pub low: f64,
    /// Above this ratio the CPU is considered weak for the GPU.
    pub high: f64,
    /// Memory capacity (GB) below which more memory is recommended.
    pub min_memory_gb: f64,
}

impl Default for BalanceThresholds {
    fn default() -> Self {
        Self {
            low: 1.0 / 3.0,
            high: 3.0,
            min_memory_gb: 16.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Bottleneck {
    /// GPU underpowered relative to the CPU.
    Gpu,
    /// CPU underpowered relative to the GPU.
    Cpu,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BalanceCheck {
    #[serde(flatten)]
    pub outcome: CheckOutcome,
    pub price_ratio: Option<f64>,
    pub bottleneck: Option<Bottleneck>,
    pub recommendations: Vec<String>,
}

impl BalanceCheck {
    pub fn is_balanced(&self) -> bool {
        self.bottleneck.is_none()
    }
}

impl CheckReport for BalanceCheck {
    fn outcome(&self) -> &CheckOutcome {
        &self.outcome
    }
}

/// CPU/GPU spend balance, plus a memory size nudge.
#[derive(Debug, Clone, Default)]
pub struct PerformanceBalanceRule {
    pub thresholds: BalanceThresholds,
}

impl PerformanceBalanceRule {
    pub fn new(thresholds: BalanceThresholds) -> Self {
        Self { thresholds }
    }
}

impl Rule for PerformanceBalanceRule {
    type Report = BalanceCheck;

    fn id(&self) -> &'static str {
        "performance"
    }

    fn name(&self) -> &'static str {
        "Performance balance"
    }

    fn requires(&self) -> &'static [Category] {
        &[Category::Cpu, Category::Gpu]
    }

    fn check(&self, selection: &PartSelection) -> BalanceCheck {
        let (Some(cpu), Some(gpu)) = (selection.get(Category::Cpu), selection.get(Category::Gpu)) else {
            return BalanceCheck {
                outcome: CheckOutcome::waiting(selection, self.requires(), "performance balance"),
                price_ratio: None,
                bottleneck: None,
                recommendations: Vec::new(),
            };
        };

        let mut warnings = Vec::new();
        let mut recommendations = Vec::new();

        let price_ratio = (cpu.price > 0).then(|| gpu.price as f64 / cpu.price as f64);
        let bottleneck = match price_ratio {
            Some(r) if r < self.thresholds.low => Some(Bottleneck::Gpu),
            Some(r) if r > self.thresholds.high => Some(Bottleneck::Cpu),
            _ => None,
        };

        match bottleneck {
            Some(Bottleneck::Gpu) => warnings.push(CompatibilityWarning::new(
                WarningPriority::Medium,
                format!("{} may hold back {}", gpu.name, cpu.name),
                "Consider a stronger GPU or a cheaper CPU",
            )),
            Some(Bottleneck::Cpu) => warnings.push(CompatibilityWarning::new(
                WarningPriority::Medium,
                format!("{} may hold back {}", cpu.name, gpu.name),
                "Consider a stronger CPU or a cheaper GPU",
            )),
            None => {}
        }

        if let Some(memory) = selection.get(Category::Memory) {
            let capacity = memory.specs().get_number_or("capacity", 0.0);
            if capacity < self.thresholds.min_memory_gb {
                let text = format!(
                    "Consider {}GB or more of memory (currently {}GB)",
                    self.thresholds.min_memory_gb, capacity
                );
                warnings.push(CompatibilityWarning::new(
                    WarningPriority::Low,
                    format!("{}GB of memory is limiting for current games and apps", capacity),
                    text.clone(),
                ));
                recommendations.push(text);
            }
        }

        let message = match (bottleneck, price_ratio) {
            (Some(Bottleneck::Gpu), _) => "GPU is underpowered relative to the CPU".to_string(),
            (Some(Bottleneck::Cpu), _) => "CPU is underpowered relative to the GPU".to_string(),
            (None, Some(r)) => format!("CPU and GPU are balanced (GPU/CPU price ratio {r:.2})"),
            (None, None) => "CPU price unavailable; balance not assessed".to_string(),
        };

        let mut outcome = CheckOutcome::resolved(message, vec![], warnings);
        if bottleneck.is_some() {
            outcome.status = CheckStatus::Incompatible;
        }
        tracing::debug!(status = ?outcome.status, ?price_ratio, "performance balance check");

        BalanceCheck {
            outcome,
            price_ratio,
            bottleneck,
            recommendations,
        }
    }
}
