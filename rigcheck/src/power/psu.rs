use crate::parts::Part;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

const EMBEDDED_PSU_CATALOG: &str = include_str!("../../data/psu_catalog.json");

/// 80 PLUS certification tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EfficiencyRating {
    White,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Titanium,
}

impl EfficiencyRating {
    /// Reads a rating out of free text such as "80+ Gold" or "80 PLUS Platinum".
    /// A bare "80+" / "80 plus" marking reads as `White`.
    pub fn parse(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        let compact: String = lower.chars().filter(|c| !c.is_whitespace()).collect();
        if !(compact.contains("80+") || compact.contains("80plus")) {
            return None;
        }
        let tiers = [
            ("titanium", EfficiencyRating::Titanium),
            ("platinum", EfficiencyRating::Platinum),
            ("gold", EfficiencyRating::Gold),
            ("silver", EfficiencyRating::Silver),
            ("bronze", EfficiencyRating::Bronze),
        ];
        Some(
            tiers
                .iter()
                .find(|(name, _)| lower.contains(name))
                .map(|(_, rating)| *rating)
                .unwrap_or(EfficiencyRating::White),
        )
    }

    /// Rating of a PSU part, from its `efficiency` spec or else its name.
    pub fn of_part(psu: &Part) -> Option<Self> {
        psu.specs()
            .get_str("efficiency")
            .and_then(Self::parse)
            .or_else(|| Self::parse(&psu.name))
    }
}

impl fmt::Display for EfficiencyRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tier = match self {
            EfficiencyRating::White => "White",
            EfficiencyRating::Bronze => "Bronze",
            EfficiencyRating::Silver => "Silver",
            EfficiencyRating::Gold => "Gold",
            EfficiencyRating::Platinum => "Platinum",
            EfficiencyRating::Titanium => "Titanium",
        };
        write!(f, "80+ {tier}")
    }
}

/// Reference PSU used for recommendations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PsuSpecification {
    pub model: String,
    pub manufacturer: String,
    pub capacity: u32,
    pub efficiency: EfficiencyRating,
    #[serde(default)]
    pub modular: bool,
    #[serde(default)]
    pub price: u64,
}

/// Built-in PSU reference list.
pub fn psu_catalog() -> &'static [PsuSpecification] {
    static CATALOG: OnceLock<Vec<PsuSpecification>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        match serde_json::from_str::<Vec<PsuSpecification>>(EMBEDDED_PSU_CATALOG) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!("Failed to parse embedded PSU catalog: {}", e);
                Vec::new()
            }
        }
    })
}

/// Catalog PSUs that can supply `required_wattage`, smallest and cheapest first.
pub fn recommend_psus(required_wattage: u32) -> Vec<PsuSpecification> {
    recommend_from(psu_catalog(), required_wattage)
}

pub fn recommend_from(catalog: &[PsuSpecification], required_wattage: u32) -> Vec<PsuSpecification> {
    let mut matches: Vec<PsuSpecification> = catalog
        .iter()
        .filter(|psu| psu.capacity >= required_wattage)
        .cloned()
        .collect();
    matches.sort_by(|a, b| a.capacity.cmp(&b.capacity).then(a.price.cmp(&b.price)));
    matches
}

/// Capacity of a PSU part in watts (`capacity`, else `wattage`).
pub fn psu_capacity(psu: &Part) -> Option<u32> {
    psu.specs()
        .get_number("capacity")
        .or_else(|| psu.specs().get_number("wattage"))
        .filter(|w| *w > 0.0)
        .map(|w| w.round() as u32)
}
