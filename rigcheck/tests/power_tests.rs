//! Power budget, PSU sizing and running cost

use rigcheck::power::{recommended_psu_wattage, PowerSeverity, ProfileSource};
use rigcheck::prelude::*;
use rigcheck::EfficiencyRating;

fn listed(category: Category, name: &str, max: u32) -> Part {
    Part::new(name.to_lowercase(), name, category).with_power(max / 10, max * 3 / 4, max)
}

fn psu(capacity: f64, efficiency: &str) -> Part {
    Part::new("psu", "Test PSU", Category::Psu).with_specs(
        Specifications::new()
            .with("capacity", capacity)
            .with("efficiency", efficiency),
    )
}

#[test]
fn test_recommendation_is_stepped_with_margin() {
    for max in (0..=2000).step_by(37) {
        let rec = recommended_psu_wattage(max);
        assert_eq!(rec % 50, 0, "{max}");
        assert!(rec as f64 >= max as f64 * 1.2, "{max} -> {rec}");
        assert!((rec as f64) < max as f64 * 1.2 + 50.0, "{max} -> {rec}");
    }
}

#[test]
fn test_enough_capacity_without_headroom() {
    let selection = PartSelection::new()
        .with(Category::Cpu, listed(Category::Cpu, "CPU", 150))
        .with(Category::Gpu, listed(Category::Gpu, "GPU", 300))
        .with(Category::Psu, psu(500.0, "80+ Bronze"));
    let power = rigcheck::evaluate_power(&selection);

    assert!(power.total_max <= 500);
    assert!(power.has_warning(PowerWarningKind::InsufficientHeadroom));
    assert!(!power.has_warning(PowerWarningKind::InsufficientCapacity));
    assert_eq!(power.headroom, Some(500 - power.total_max as i64));
    assert!(!power.is_optimal);
}

#[test]
fn test_undersized_psu() {
    let selection = PartSelection::new()
        .with(Category::Gpu, Part::new("g", "GeForce RTX 4090 Gaming OC", Category::Gpu))
        .with(Category::Psu, psu(450.0, "80+ Gold"));
    let power = rigcheck::evaluate_power(&selection);

    let warning = power
        .warnings
        .iter()
        .find(|w| w.kind == PowerWarningKind::InsufficientCapacity)
        .expect("capacity warning");
    assert_eq!(warning.severity, PowerSeverity::Critical);
    assert!(power.has_warning(PowerWarningKind::HighLoad));
    assert!(power.has_warning(PowerWarningKind::HighPowerGpu));
    assert!(power.headroom.unwrap() < 0);
}

#[test]
fn test_no_psu_still_recommends() {
    let selection = PartSelection::new().with(Category::Cpu, listed(Category::Cpu, "CPU", 120));
    let power = rigcheck::evaluate_power(&selection);

    assert!(power.has_warning(PowerWarningKind::NoPsu));
    assert!(power.psu_capacity.is_none());
    assert!(power.psu_load_percent.is_none());
    assert!(power.recommended_psu >= 150);
    assert!(!power.is_optimal);
}

#[test]
fn test_psu_not_counted_as_load() {
    let without = PartSelection::new().with(Category::Cpu, listed(Category::Cpu, "CPU", 100));
    let with = without.clone().with(Category::Psu, psu(650.0, "80+ Gold"));
    assert_eq!(
        rigcheck::evaluate_power(&without).total_max,
        rigcheck::evaluate_power(&with).total_max
    );
}

#[test]
fn test_monitor_draws_nothing() {
    let selection = PartSelection::new().with(
        Category::Monitor,
        Part::new("m", "27in 1440p Monitor", Category::Monitor),
    );
    let power = rigcheck::evaluate_power(&selection);
    assert_eq!(power.components.len(), 1);
    assert_eq!(power.components[0].profile.max, 0);
    assert_eq!(power.total_max, power.overhead.max);
}

#[test]
fn test_unrated_and_oversized_psu() {
    let selection = PartSelection::new()
        .with(Category::Cpu, listed(Category::Cpu, "CPU", 65))
        .with(
            Category::Psu,
            Part::new("p", "Generic 1600W", Category::Psu)
                .with_specs(Specifications::new().with("wattage", "1600W")),
        );
    let power = rigcheck::evaluate_power(&selection);
    assert_eq!(power.psu_capacity, Some(1600));
    assert!(power.has_warning(PowerWarningKind::Oversized));
    assert!(power.has_warning(PowerWarningKind::NoEfficiencyRating));
    assert!(power.psu_rating.is_none());
}

#[test]
fn test_model_lookup_from_name() {
    let selection = PartSelection::new().with(
        Category::Gpu,
        Part::new("x", "Sapphire Radeon RX 7900 XTX Nitro+", Category::Gpu),
    );
    let power = rigcheck::evaluate_power(&selection);
    assert_eq!(
        power.components[0].source,
        ProfileSource::Model("rx 7900 xtx".to_string())
    );
}

#[test]
fn test_recommend_psus_sorted() {
    let list = rigcheck::recommend_psus(700);
    assert!(!list.is_empty());
    assert!(list.iter().all(|p| p.capacity >= 700));
    for pair in list.windows(2) {
        assert!(
            pair[0].capacity < pair[1].capacity
                || (pair[0].capacity == pair[1].capacity && pair[0].price <= pair[1].price)
        );
    }
    assert!(rigcheck::recommend_psus(100_000).is_empty());
}

#[test]
fn test_monthly_cost() {
    let selection = PartSelection::new()
        .with(Category::Cpu, listed(Category::Cpu, "CPU", 200))
        .with(Category::Psu, psu(750.0, "80+ Platinum"));
    let power = rigcheck::evaluate_power(&selection);

    let cost = rigcheck::estimate_monthly_cost(&power, 8.0, 0.20);
    assert!(cost.total > 0.0);
    assert!((cost.idle + cost.normal + cost.peak - cost.total).abs() < 1e-9);

    let doubled = rigcheck::estimate_monthly_cost(&power, 8.0, 0.40);
    assert!((doubled.total - cost.total * 2.0).abs() < 1e-9);

    let free = rigcheck::estimate_monthly_cost(&power, 8.0, -1.0);
    assert_eq!(free.total, 0.0);

    let idle_box = rigcheck::estimate_monthly_cost(&power, 0.0, 0.20);
    assert_eq!(idle_box.total, 0.0);
    assert_eq!(EfficiencyRating::parse("80+ Platinum"), power.psu_rating);
}

#[test]
fn test_selection_slot_decides_profile() {
    let selection = PartSelection::new().with(
        Category::Gpu,
        Part::new("x", "GeForce RTX 4090", Category::Other),
    );
    let power = rigcheck::evaluate_power(&selection);

    assert_eq!(power.components[0].category, Category::Gpu);
    assert_eq!(power.components[0].profile.max, 450);
    assert!(power.has_warning(PowerWarningKind::HighPowerGpu));
}
