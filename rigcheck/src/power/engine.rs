use crate::parts::{Category, PartSelection};
use crate::power::profiles::{PowerProfile, PowerProfileTable, ProfileSource};
use crate::power::psu::{psu_capacity, EfficiencyRating};
use serde::{Deserialize, Serialize};

/// Margin applied to the max draw before rounding the PSU recommendation.
pub const PSU_MARGIN_PERCENT: u32 = 20;
/// PSU recommendations are rounded up to this step (W).
pub const PSU_STEP_WATTS: u32 = 50;
pub const HIGH_LOAD_PERCENT: f64 = 90.0;
pub const OVERSIZED_FACTOR: f64 = 1.8;
pub const OPTIMAL_CAPACITY_FACTOR: f64 = 1.4;
pub const OPTIMAL_LOAD_RANGE: (f64, f64) = (50.0, 80.0);
/// GPUs above this draw (W) get a PSU quality recommendation.
pub const HIGH_POWER_GPU_WATTS: u32 = 300;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PowerWarningKind {
    NoPsu,
    UnknownCapacity,
    InsufficientCapacity,
    InsufficientHeadroom,
    HighLoad,
    Oversized,
    NoEfficiencyRating,
    HighPowerGpu,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PowerSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PowerWarning {
    pub kind: PowerWarningKind,
    pub severity: PowerSeverity,
    pub message: String,
    pub recommendation: String,
}

impl PowerWarning {
    fn new(
        kind: PowerWarningKind,
        severity: PowerSeverity,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            recommendation: recommendation.into(),
        }
    }
}

/// Resolved draw of one selected part.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentPower {
    pub category: Category,
    pub part_id: String,
    pub name: String,
    pub profile: PowerProfile,
    pub source: ProfileSource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PowerResult {
    pub components: Vec<ComponentPower>,
    pub overhead: PowerProfile,
    pub total_idle: u32,
    pub total_base: u32,
    pub total_max: u32,
    pub recommended_psu: u32,
    pub psu_capacity: Option<u32>,
    pub psu_rating: Option<EfficiencyRating>,
    /// Max-draw weighted average of component efficiency, in percent.
    pub overall_efficiency: f64,
    /// Max draw as a share of PSU capacity, in percent.
    pub psu_load_percent: Option<f64>,
    /// PSU capacity minus max draw (W); negative when the PSU is too small.
    pub headroom: Option<i64>,
    pub warnings: Vec<PowerWarning>,
    pub is_optimal: bool,
}

impl PowerResult {
    pub fn has_warning(&self, kind: PowerWarningKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }
}

/// `ceil(max * 1.2 / 50) * 50`, in integer arithmetic.
pub fn recommended_psu_wattage(total_max: u32) -> u32 {
    let with_margin = total_max as u64 * (100 + PSU_MARGIN_PERCENT) as u64;
    let step = PSU_STEP_WATTS as u64 * 100;
    let watts = with_margin.div_ceil(step) * PSU_STEP_WATTS as u64;
    // Clamp to the largest whole step that fits.
    u32::try_from(watts).unwrap_or(u32::MAX / PSU_STEP_WATTS * PSU_STEP_WATTS)
}

/// Power draw totals and PSU adequacy for a selection.
#[derive(Debug, Clone, Copy)]
pub struct PowerEngine<'a> {
    profiles: &'a PowerProfileTable,
}

impl Default for PowerEngine<'static> {
    fn default() -> Self {
        Self::new(PowerProfileTable::builtin())
    }
}

impl<'a> PowerEngine<'a> {
    pub fn new(profiles: &'a PowerProfileTable) -> Self {
        Self { profiles }
    }

    pub fn evaluate(&self, selection: &PartSelection) -> PowerResult {
        let components: Vec<ComponentPower> = selection
            .iter()
            .filter(|(category, _)| *category != Category::Psu)
            .map(|(category, part)| {
                let (profile, source) = self.profiles.resolve(part);
                tracing::debug!(%category, part = %part.name, ?source, max = profile.max, "power profile");
                ComponentPower {
                    category,
                    part_id: part.id.clone(),
                    name: part.name.clone(),
                    profile,
                    source,
                }
            })
            .collect();

        let overhead = self.profiles.overhead_total();
        let all = || components.iter().map(|c| &c.profile).chain(std::iter::once(&overhead));
        let total_idle = all().fold(0u32, |acc, p| acc.saturating_add(p.idle));
        let total_base = all().fold(0u32, |acc, p| acc.saturating_add(p.base));
        let total_max = all().fold(0u32, |acc, p| acc.saturating_add(p.max));
        let weighted: f64 = all().map(|p| p.efficiency * p.max as f64).sum();
        let overall_efficiency = if total_max > 0 {
            weighted / total_max as f64
        } else {
            0.0
        };

        let recommended_psu = recommended_psu_wattage(total_max);
        let psu = selection.get(Category::Psu);
        let psu_capacity = psu.and_then(psu_capacity);
        let psu_rating = psu.and_then(EfficiencyRating::of_part);
        let psu_load_percent = psu_capacity.map(|cap| total_max as f64 / cap as f64 * 100.0);
        let headroom = psu_capacity.map(|cap| cap as i64 - total_max as i64);

        let mut warnings = Vec::new();
        match (psu, psu_capacity) {
            (None, _) => warnings.push(PowerWarning::new(
                PowerWarningKind::NoPsu,
                PowerSeverity::Critical,
                "No power supply selected",
                format!("Select a PSU of at least {}W", recommended_psu),
            )),
            (Some(psu), None) => warnings.push(PowerWarning::new(
                PowerWarningKind::UnknownCapacity,
                PowerSeverity::High,
                format!("Capacity of {} is not listed", psu.name),
                format!("Confirm the PSU supplies at least {}W", recommended_psu),
            )),
            (Some(psu), Some(capacity)) => {
                if capacity < total_max {
                    warnings.push(PowerWarning::new(
                        PowerWarningKind::InsufficientCapacity,
                        PowerSeverity::Critical,
                        format!(
                            "{} ({}W) cannot supply the {}W peak draw",
                            psu.name, capacity, total_max
                        ),
                        format!("Choose a PSU of at least {}W", recommended_psu),
                    ));
                } else if capacity < recommended_psu {
                    warnings.push(PowerWarning::new(
                        PowerWarningKind::InsufficientHeadroom,
                        PowerSeverity::High,
                        format!(
                            "{} ({}W) leaves only {}W of headroom over the {}W peak draw",
                            psu.name,
                            capacity,
                            capacity - total_max,
                            total_max
                        ),
                        format!("A {}W PSU keeps a {}% safety margin", recommended_psu, PSU_MARGIN_PERCENT),
                    ));
                }

                if let Some(load) = psu_load_percent.filter(|l| *l > HIGH_LOAD_PERCENT) {
                    warnings.push(PowerWarning::new(
                        PowerWarningKind::HighLoad,
                        PowerSeverity::High,
                        format!("PSU runs at {:.0}% load at peak", load),
                        "Sustained high load shortens PSU life and raises fan noise",
                    ));
                }

                if capacity as f64 > recommended_psu as f64 * OVERSIZED_FACTOR {
                    warnings.push(PowerWarning::new(
                        PowerWarningKind::Oversized,
                        PowerSeverity::Low,
                        format!(
                            "{}W PSU is far larger than the recommended {}W",
                            capacity, recommended_psu
                        ),
                        "A smaller PSU runs closer to its efficiency peak and costs less",
                    ));
                }
            }
        }

        if let (Some(psu), None) = (psu, psu_rating) {
            warnings.push(PowerWarning::new(
                PowerWarningKind::NoEfficiencyRating,
                PowerSeverity::Medium,
                format!("{} has no 80 PLUS efficiency certification listed", psu.name),
                "Prefer an 80+ Bronze or better certified PSU",
            ));
        }

        if let Some(gpu) = components
            .iter()
            .find(|c| c.category == Category::Gpu && c.profile.max > HIGH_POWER_GPU_WATTS)
        {
            warnings.push(PowerWarning::new(
                PowerWarningKind::HighPowerGpu,
                PowerSeverity::Medium,
                format!("{} can draw up to {}W", gpu.name, gpu.profile.max),
                "Use an 80+ Gold or better PSU for high-power GPUs",
            ));
        }

        let is_optimal = match (psu_capacity, psu_load_percent) {
            (Some(capacity), Some(load)) => {
                let capacity = capacity as f64;
                capacity >= recommended_psu as f64
                    && capacity <= recommended_psu as f64 * OPTIMAL_CAPACITY_FACTOR
                    && psu_rating.is_some()
                    && load >= OPTIMAL_LOAD_RANGE.0
                    && load <= OPTIMAL_LOAD_RANGE.1
            }
            _ => false,
        };

        tracing::debug!(total_max, recommended_psu, ?psu_capacity, is_optimal, "power evaluated");

        PowerResult {
            components,
            overhead,
            total_idle,
            total_base,
            total_max,
            recommended_psu,
            psu_capacity,
            psu_rating,
            overall_efficiency,
            psu_load_percent,
            headroom,
            warnings,
            is_optimal,
        }
    }
}
