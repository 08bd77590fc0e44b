use crate::parts::specs::Specifications;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Part category. A selection holds at most one part per category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cpu,
    Gpu,
    Motherboard,
    Memory,
    Storage,
    Psu,
    Case,
    Cooler,
    Monitor,
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Cpu,
        Category::Gpu,
        Category::Motherboard,
        Category::Memory,
        Category::Storage,
        Category::Psu,
        Category::Case,
        Category::Cooler,
        Category::Monitor,
        Category::Other,
    ];

    /// Categories a bootable build cannot do without.
    pub const REQUIRED: [Category; 6] = [
        Category::Cpu,
        Category::Motherboard,
        Category::Memory,
        Category::Storage,
        Category::Psu,
        Category::Case,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cpu => "cpu",
            Category::Gpu => "gpu",
            Category::Motherboard => "motherboard",
            Category::Memory => "memory",
            Category::Storage => "storage",
            Category::Psu => "psu",
            Category::Case => "case",
            Category::Cooler => "cooler",
            Category::Monitor => "monitor",
            Category::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Cpu => "CPU",
            Category::Gpu => "GPU",
            Category::Motherboard => "Motherboard",
            Category::Memory => "Memory",
            Category::Storage => "Storage",
            Category::Psu => "Power supply",
            Category::Case => "Case",
            Category::Cooler => "CPU cooler",
            Category::Monitor => "Monitor",
            Category::Other => "Other",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit power draw of a part in watts, when the listing provides one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerDraw {
    pub idle: u32,
    pub base: u32,
    pub max: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub manufacturer: String,
    /// Overwritten by the selection key when a part is loaded through a selection.
    #[serde(default)]
    pub category: Category,
    /// Currency-agnostic integer price.
    #[serde(default)]
    pub price: u64,
    #[serde(default)]
    pub specifications: Specifications,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<PowerDraw>,
}

impl Part {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            manufacturer: String::new(),
            category,
            price: 0,
            specifications: Specifications::new(),
            power: None,
        }
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = manufacturer.into();
        self
    }

    pub fn with_price(mut self, price: u64) -> Self {
        self.price = price;
        self
    }

    pub fn with_specs(mut self, specifications: Specifications) -> Self {
        self.specifications = specifications;
        self
    }

    pub fn with_power(mut self, idle: u32, base: u32, max: u32) -> Self {
        self.power = Some(PowerDraw { idle, base, max });
        self
    }

    pub fn specs(&self) -> &Specifications {
        &self.specifications
    }
}

/// The parts currently chosen, keyed by category.
///
/// Deserializes from a JSON object keyed by category name; `null` entries are
/// treated as "not chosen yet".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<Category, Option<Part>>",
    into = "BTreeMap<Category, Part>"
)]
pub struct PartSelection {
    parts: BTreeMap<Category, Part>,
}

impl From<BTreeMap<Category, Option<Part>>> for PartSelection {
    fn from(raw: BTreeMap<Category, Option<Part>>) -> Self {
        Self {
            parts: raw
                .into_iter()
                .filter_map(|(category, part)| {
                    part.map(|mut p| {
                        p.category = category;
                        (category, p)
                    })
                })
                .collect(),
        }
    }
}

impl From<PartSelection> for BTreeMap<Category, Part> {
    fn from(selection: PartSelection) -> Self {
        selection.parts
    }
}

impl PartSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style select, replacing whatever was chosen for the category.
    pub fn with(mut self, category: Category, part: Part) -> Self {
        self.select(category, part);
        self
    }

    /// Selects `part` for `category`, returning the part it replaced.
    /// The slot decides the part's category.
    pub fn select(&mut self, category: Category, mut part: Part) -> Option<Part> {
        part.category = category;
        self.parts.insert(category, part)
    }

    pub fn remove(&mut self, category: Category) -> Option<Part> {
        self.parts.remove(&category)
    }

    pub fn get(&self, category: Category) -> Option<&Part> {
        self.parts.get(&category)
    }

    pub fn contains(&self, category: Category) -> bool {
        self.parts.contains_key(&category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &Part)> {
        self.parts.iter().map(|(c, p)| (*c, p))
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Running price total of every selected part.
    pub fn total_price(&self) -> u64 {
        self.parts
            .values()
            .fold(0u64, |acc, p| acc.saturating_add(p.price))
    }

    /// Required categories that have no part yet.
    pub fn missing_required(&self) -> Vec<Category> {
        Category::REQUIRED
            .iter()
            .copied()
            .filter(|c| !self.contains(*c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_from_json_with_nulls() {
        let selection: PartSelection = serde_json::from_str(
            r#"{
                "cpu": {"id": "c1", "name": "Ryzen 5 7600", "category": "cpu", "price": 24000,
                        "specifications": {"socket": "AM5"}},
                "gpu": null
            }"#,
        )
        .unwrap();

        assert_eq!(selection.len(), 1);
        assert!(selection.get(Category::Gpu).is_none());
        assert_eq!(
            selection.get(Category::Cpu).and_then(|p| p.specs().get_str("socket")),
            Some("AM5")
        );
    }

    #[test]
    fn test_select_replaces_same_category() {
        let mut selection = PartSelection::new();
        selection.select(Category::Cpu, Part::new("a", "A", Category::Cpu).with_price(100));
        let replaced = selection.select(Category::Cpu, Part::new("b", "B", Category::Cpu).with_price(250));

        assert_eq!(replaced.map(|p| p.id), Some("a".to_string()));
        assert_eq!(selection.len(), 1);
        assert_eq!(selection.total_price(), 250);
    }

    #[test]
    fn test_select_sets_category_from_slot() {
        let selection = PartSelection::new()
            .with(Category::Gpu, Part::new("x", "GeForce RTX 4090", Category::Other));
        assert_eq!(selection.get(Category::Gpu).unwrap().category, Category::Gpu);
    }

    #[test]
    fn test_missing_required() {
        let selection = PartSelection::new()
            .with(Category::Cpu, Part::new("c", "CPU", Category::Cpu))
            .with(Category::Gpu, Part::new("g", "GPU", Category::Gpu));

        let missing = selection.missing_required();
        assert!(!missing.contains(&Category::Cpu));
        assert!(missing.contains(&Category::Motherboard));
        assert!(missing.contains(&Category::Psu));
        assert_eq!(missing.len(), 5);
    }

    #[test]
    fn test_category_serde_names() {
        assert_eq!(serde_json::to_string(&Category::Psu).unwrap(), "\"psu\"");
        let c: Category = serde_json::from_str("\"motherboard\"").unwrap();
        assert_eq!(c, Category::Motherboard);
    }
}
