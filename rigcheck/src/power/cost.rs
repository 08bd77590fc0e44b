//! Electricity cost estimate.
//!
//! Daily usage hours are split into idle time and active time; peak load takes
//! 10% of the active hours and the rest runs at base draw.

use crate::power::engine::PowerResult;
use serde::{Deserialize, Serialize};

pub const DAYS_PER_MONTH: f64 = 30.0;
/// Share of daily usage spent idle (desktop, browsing).
pub const IDLE_SHARE: f64 = 0.30;
/// Share of active hours spent at peak draw.
pub const PEAK_SHARE_OF_ACTIVE: f64 = 0.10;

/// Monthly electricity cost, in the currency of the supplied rate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MonthlyCost {
    pub idle: f64,
    pub normal: f64,
    pub peak: f64,
    pub total: f64,
}

/// Hours per day spent in each state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DailyUsage {
    pub idle_hours: f64,
    pub normal_hours: f64,
    pub peak_hours: f64,
}

impl DailyUsage {
    /// Splits `usage_hours_per_day` (clamped to 0..=24).
    pub fn split(usage_hours_per_day: f64) -> Self {
        let hours = if usage_hours_per_day.is_finite() {
            usage_hours_per_day.clamp(0.0, 24.0)
        } else {
            0.0
        };
        let idle_hours = hours * IDLE_SHARE;
        let active = hours - idle_hours;
        let peak_hours = active * PEAK_SHARE_OF_ACTIVE;
        Self {
            idle_hours,
            normal_hours: active - peak_hours,
            peak_hours,
        }
    }
}

fn monthly(watts: u32, hours_per_day: f64, rate_per_kwh: f64) -> f64 {
    watts as f64 / 1000.0 * hours_per_day * DAYS_PER_MONTH * rate_per_kwh
}

pub fn estimate_monthly_cost(power: &PowerResult, usage_hours_per_day: f64, rate_per_kwh: f64) -> MonthlyCost {
    let rate = if rate_per_kwh.is_finite() {
        rate_per_kwh.max(0.0)
    } else {
        0.0
    };
    let usage = DailyUsage::split(usage_hours_per_day);
    let idle = monthly(power.total_idle, usage.idle_hours, rate);
    let normal = monthly(power.total_base, usage.normal_hours, rate);
    let peak = monthly(power.total_max, usage.peak_hours, rate);
    MonthlyCost {
        idle,
        normal,
        peak,
        total: idle + normal + peak,
    }
}
