//! Power Profile Table
//!
//! Wattage profiles for parts, looked up in this order:
//! 1. the part's own listed power draw
//! 2. exact part id
//! 3. model key found in the part name (case-insensitive, longest key first)
//! 4. a category spec hint (motherboard form factor, memory type, storage type)
//! 5. the category default
//!
//! The built-in table is embedded JSON. A user table can be loaded from a file
//! and layered on top of it.

use crate::parts::{Category, Part};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

const EMBEDDED_POWER_PROFILES: &str = include_str!("../../data/power_profiles.json");

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Failed to read power profile file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse power profile JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Draw of one component in watts, plus its conversion efficiency in percent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PowerProfile {
    pub idle: u32,
    pub base: u32,
    pub max: u32,
    pub efficiency: f64,
}

impl PowerProfile {
    pub const ZERO: PowerProfile = PowerProfile {
        idle: 0,
        base: 0,
        max: 0,
        efficiency: 0.0,
    };

    pub fn new(idle: u32, base: u32, max: u32, efficiency: f64) -> Self {
        Self {
            idle,
            base,
            max,
            efficiency,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelProfile {
    pub key: String,
    #[serde(flatten)]
    pub profile: PowerProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProfiles {
    pub default: PowerProfile,
    #[serde(default)]
    pub models: Vec<ModelProfile>,
    /// Spec key whose value selects an entry from `hints`.
    #[serde(default)]
    pub hint_key: Option<String>,
    #[serde(default)]
    pub hints: BTreeMap<String, PowerProfile>,
}

/// Where a resolved profile came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "source", content = "key", rename_all = "snake_case")]
pub enum ProfileSource {
    Listed,
    PartId,
    Model(String),
    Hint(String),
    CategoryDefault,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PowerProfileTable {
    #[serde(default)]
    pub overhead: BTreeMap<String, PowerProfile>,
    #[serde(default)]
    pub parts: BTreeMap<String, PowerProfile>,
    #[serde(default)]
    pub categories: BTreeMap<Category, CategoryProfiles>,
}

impl PowerProfileTable {
    /// Shared built-in table parsed once from the embedded JSON.
    pub fn builtin() -> &'static PowerProfileTable {
        static BUILTIN: OnceLock<PowerProfileTable> = OnceLock::new();
        BUILTIN.get_or_init(|| match Self::from_json(EMBEDDED_POWER_PROFILES) {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!("Failed to parse embedded power profiles: {}", e);
                PowerProfileTable::default()
            }
        })
    }

    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        let mut table: PowerProfileTable = serde_json::from_str(json)?;
        table.sort_keys();
        Ok(table)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ProfileError> {
        let content = std::fs::read_to_string(path)?;
        let table = Self::from_json(&content)?;
        tracing::info!(
            "Loaded power profiles from {:?} ({} part ids, {} categories)",
            path,
            table.parts.len(),
            table.categories.len()
        );
        Ok(table)
    }

    /// Layers `other` on top of `self`: its entries replace same-named ones, its
    /// model keys are tried before the existing ones.
    pub fn merge(&mut self, other: PowerProfileTable) {
        self.overhead.extend(other.overhead);
        self.parts.extend(other.parts);
        for (category, incoming) in other.categories {
            match self.categories.get_mut(&category) {
                Some(existing) => {
                    existing.default = incoming.default;
                    let mut models = incoming.models;
                    models.retain(|m| !m.key.is_empty());
                    existing.models.retain(|m| !models.iter().any(|n| n.key == m.key));
                    models.append(&mut existing.models);
                    existing.models = models;
                    if incoming.hint_key.is_some() {
                        existing.hint_key = incoming.hint_key;
                    }
                    existing.hints.extend(incoming.hints);
                }
                None => {
                    self.categories.insert(category, incoming);
                }
            }
        }
        self.sort_keys();
    }

    /// Longer model keys first, so "rtx 4070 ti" wins over "rtx 4070".
    fn sort_keys(&mut self) {
        for profiles in self.categories.values_mut() {
            profiles.models.sort_by(|a, b| b.key.len().cmp(&a.key.len()));
        }
    }

    /// Sum of the fixed system overhead entries.
    pub fn overhead_total(&self) -> PowerProfile {
        let mut total = PowerProfile::ZERO;
        let mut weighted = 0.0;
        for profile in self.overhead.values() {
            total.idle = total.idle.saturating_add(profile.idle);
            total.base = total.base.saturating_add(profile.base);
            total.max = total.max.saturating_add(profile.max);
            weighted += profile.efficiency * profile.max as f64;
        }
        if total.max > 0 {
            total.efficiency = weighted / total.max as f64;
        }
        total
    }

    pub fn resolve(&self, part: &Part) -> (PowerProfile, ProfileSource) {
        let category = self.categories.get(&part.category);
        let category_efficiency = category.map(|c| c.default.efficiency).unwrap_or(0.0);

        if let Some(listed) = part.power {
            return (
                PowerProfile::new(listed.idle, listed.base, listed.max, category_efficiency),
                ProfileSource::Listed,
            );
        }

        if let Some(profile) = self.parts.get(&part.id) {
            return (*profile, ProfileSource::PartId);
        }

        let Some(category) = category else {
            return (PowerProfile::ZERO, ProfileSource::CategoryDefault);
        };

        let name = part.name.to_lowercase();
        if let Some(model) = category
            .models
            .iter()
            .find(|m| name.contains(&m.key.to_lowercase()))
        {
            return (model.profile, ProfileSource::Model(model.key.clone()));
        }

        if let Some(hint_value) = category
            .hint_key
            .as_deref()
            .and_then(|key| part.specs().get_str(key))
        {
            let hint_value = hint_value.to_lowercase();
            let mut hints: Vec<(&String, &PowerProfile)> = category.hints.iter().collect();
            hints.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
            if let Some((key, profile)) = hints
                .into_iter()
                .find(|(key, _)| hint_value.contains(&key.to_lowercase()))
            {
                return (*profile, ProfileSource::Hint(key.clone()));
            }
        }

        (category.default, ProfileSource::CategoryDefault)
    }
}
