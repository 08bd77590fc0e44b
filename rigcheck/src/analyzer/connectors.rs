//! PSU connector matching.
//!
//! Required connectors come from the motherboard (ATX 24-pin plus CPU power) and
//! the GPU. Each requirement is tagged with the rail it feeds and matched greedily
//! against the PSU's connector pool using the alias table below; a matched PSU
//! connector is consumed and cannot be reused.

use crate::analyzer::rules::*;
use crate::parts::{Category, PartSelection};
use serde::{Deserialize, Serialize};
use std::fmt;

const LABEL: &str = "Power connectors";

/// No retail PSU carries more cables of one kind than this. Larger counts in
/// part data are treated as malformed.
pub const MAX_CONNECTORS_PER_TYPE: usize = 16;

pub const DEFAULT_CPU_POWER_CONNECTOR: &str = "8pin";

/// Which cable family a requirement draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerRail {
    /// Motherboard main power.
    Atx,
    /// CPU EPS power.
    Cpu,
    /// Graphics card PCIe power.
    Pcie,
}

impl PowerRail {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Atx => "ATX",
            Self::Cpu => "CPU",
            Self::Pcie => "PCIe",
        }
    }
}

/// (rail, required connector) → PSU connectors that can serve it, preferred first.
///
/// A plain `8pin` PSU entry does not say whether it is an EPS or PCIe cable, so it
/// may serve either rail. `4+4pin` is CPU only and `6+2pin` is PCIe only.
/// Pairs missing from the table only accept an exact match.
pub const CONNECTOR_ALIASES: &[(PowerRail, &str, &[&str])] = &[
    (PowerRail::Atx, "24pin", &["24pin", "20+4pin"]),
    (PowerRail::Cpu, "8pin", &["eps8pin", "cpu8pin", "4+4pin", "8pin"]),
    (PowerRail::Cpu, "4pin", &["4pin", "eps4pin", "4+4pin"]),
    (PowerRail::Pcie, "8pin", &["pcie8pin", "8pin", "6+2pin"]),
    (PowerRail::Pcie, "6pin", &["6pin", "pcie6pin", "6+2pin"]),
    (PowerRail::Pcie, "12vhpwr", &["12vhpwr", "12v2x6", "16pin"]),
    (PowerRail::Pcie, "12v2x6", &["12v2x6", "12vhpwr", "16pin"]),
    (PowerRail::Pcie, "16pin", &["16pin", "12vhpwr", "12v2x6"]),
];

/// Lowercase and drop separators so `8-pin`, `8 Pin` and `8pin` compare equal.
pub fn normalize_connector(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// A connector some part needs, tagged with the rail that feeds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorRequirement {
    pub rail: PowerRail,
    pub connector: String,
}

impl ConnectorRequirement {
    pub fn new(rail: PowerRail, connector: impl Into<String>) -> Self {
        Self {
            rail,
            connector: connector.into(),
        }
    }

    /// PSU connector types that can serve this requirement.
    pub fn accepted(&self) -> Vec<String> {
        CONNECTOR_ALIASES
            .iter()
            .find(|(rail, name, _)| *rail == self.rail && *name == self.connector)
            .map(|(_, _, accepted)| accepted.iter().map(|a| a.to_string()).collect())
            .unwrap_or_else(|| vec![self.connector.clone()])
    }
}

impl fmt::Display for ConnectorRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.rail.as_str(), self.connector)
    }
}

/// Splits `2x8pin` into two `8pin` entries. A count of zero or one above
/// [`MAX_CONNECTORS_PER_TYPE`] is malformed and counts as a single connector.
fn expand_requirement(raw: &str) -> Vec<String> {
    let normalized = normalize_connector(raw);
    if let Some((prefix, rest)) = normalized.split_once('x') {
        if !prefix.is_empty() && !rest.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()) {
            let count = prefix
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=MAX_CONNECTORS_PER_TYPE).contains(n))
                .unwrap_or_else(|| {
                    tracing::warn!(connector = %raw, "implausible connector count, using 1");
                    1
                });
            return vec![rest.to_string(); count];
        }
    }
    vec![normalized]
}

/// Reads one PSU connector count. Anything that is not a whole number in
/// `0..=MAX_CONNECTORS_PER_TYPE` counts as zero.
fn connector_count(name: &str, count: Option<f64>) -> usize {
    match count {
        Some(n) if n.is_finite() && n >= 0.0 && n.round() <= MAX_CONNECTORS_PER_TYPE as f64 => {
            n.round() as usize
        }
        Some(n) => {
            tracing::warn!(connector = %name, count = n, "implausible connector count, ignoring");
            0
        }
        None => 0,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectorCheck {
    #[serde(flatten)]
    pub outcome: CheckOutcome,
    pub required: Vec<ConnectorRequirement>,
    pub available: Vec<String>,
    pub missing: Vec<ConnectorRequirement>,
}

impl CheckReport for ConnectorCheck {
    fn outcome(&self) -> &CheckOutcome {
        &self.outcome
    }
}

/// Whether the PSU has enough cables of the right kind.
pub struct ConnectorRule;

impl ConnectorRule {
    fn required_connectors(selection: &PartSelection) -> Vec<ConnectorRequirement> {
        let mut required = Vec::new();
        if let Some(motherboard) = selection.get(Category::Motherboard) {
            required.push(ConnectorRequirement::new(PowerRail::Atx, "24pin"));
            let cpu_power = motherboard
                .specs()
                .get_str("cpuPowerConnector")
                .unwrap_or(DEFAULT_CPU_POWER_CONNECTOR);
            required.extend(
                expand_requirement(cpu_power)
                    .into_iter()
                    .map(|c| ConnectorRequirement::new(PowerRail::Cpu, c)),
            );
        }
        if let Some(gpu) = selection.get(Category::Gpu) {
            for connector in gpu.specs().get_strings("powerConnectors") {
                required.extend(
                    expand_requirement(connector)
                        .into_iter()
                        .map(|c| ConnectorRequirement::new(PowerRail::Pcie, c)),
                );
            }
        }
        required
    }

    fn available_connectors(selection: &PartSelection) -> Vec<String> {
        let Some(psu) = selection.get(Category::Psu) else {
            return Vec::new();
        };
        let mut pool = Vec::new();
        for (name, count) in psu.specs().get_object("connectors") {
            let count = connector_count(name, count.as_number());
            let name = normalize_connector(name);
            pool.extend(std::iter::repeat(name).take(count));
        }
        pool
    }

    /// Greedy match; returns the requirements that found no cable.
    pub fn match_connectors(
        required: &[ConnectorRequirement],
        available: &[String],
    ) -> Vec<ConnectorRequirement> {
        let mut pool: Vec<&str> = available.iter().map(String::as_str).collect();
        let mut missing = Vec::new();
        for needed in required {
            let position = needed
                .accepted()
                .iter()
                .find_map(|accepted| pool.iter().position(|have| have == accepted));
            match position {
                Some(index) => {
                    pool.remove(index);
                }
                None => missing.push(needed.clone()),
            }
        }
        missing
    }
}

impl Rule for ConnectorRule {
    type Report = ConnectorCheck;

    fn id(&self) -> &'static str {
        "connectors"
    }

    fn name(&self) -> &'static str {
        "PSU power connectors"
    }

    fn requires(&self) -> &'static [Category] {
        &[Category::Psu]
    }

    fn check(&self, selection: &PartSelection) -> ConnectorCheck {
        let Some(psu) = selection.get(Category::Psu) else {
            return ConnectorCheck {
                outcome: CheckOutcome::waiting(selection, self.requires(), "power connectors"),
                required: Vec::new(),
                available: Vec::new(),
                missing: Vec::new(),
            };
        };

        let required = Self::required_connectors(selection);
        let available = Self::available_connectors(selection);
        let missing = Self::match_connectors(&required, &available);

        let missing_list = missing
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        let issues: Vec<CompatibilityIssue> = if missing.is_empty() {
            Vec::new()
        } else {
            let mut affected = vec![Category::Psu];
            if selection.contains(Category::Motherboard) {
                affected.push(Category::Motherboard);
            }
            if selection.contains(Category::Gpu) {
                affected.push(Category::Gpu);
            }
            vec![CompatibilityIssue::critical(
                IssueKind::ConnectorMissing,
                LABEL,
                &affected,
                format!("{} lacks connectors: {}", psu.name, missing_list),
                "Choose a PSU with the required cables or use a certified adapter",
            )]
        };

        let message = if missing.is_empty() {
            format!("All {} required connectors are available", required.len())
        } else {
            format!("Missing power connectors: {}", missing_list)
        };
        let outcome = CheckOutcome::resolved(message, issues, vec![]);
        tracing::debug!(status = ?outcome.status, missing = missing.len(), "connector check");

        ConnectorCheck {
            outcome,
            required,
            available,
            missing,
        }
    }
}
