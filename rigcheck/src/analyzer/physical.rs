use crate::analyzer::rules::*;
use crate::parts::{Category, PartSelection};
use serde::{Deserialize, Serialize};

const LABEL: &str = "Physical fit";

/// GPU length at or above this share of the case limit is flagged as tight.
pub const GPU_TIGHT_FIT_RATIO: f64 = 0.90;
/// Cooler height at or above this share of the case limit is flagged as tight.
pub const COOLER_TIGHT_FIT_RATIO: f64 = 0.95;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhysicalFitCheck {
    #[serde(flatten)]
    pub outcome: CheckOutcome,
    pub form_factor: Option<String>,
    pub supported_form_factors: Vec<String>,
    pub gpu_length_mm: Option<f64>,
    pub max_gpu_length_mm: Option<f64>,
    pub cooler_height_mm: Option<f64>,
    pub max_cooler_height_mm: Option<f64>,
}

impl CheckReport for PhysicalFitCheck {
    fn outcome(&self) -> &CheckOutcome {
        &self.outcome
    }
}

/// Motherboard form factor, GPU length and cooler height against the case.
pub struct PhysicalFitRule;

struct Clearance<'a> {
    what: &'a str,
    part_name: &'a str,
    category: Category,
    size: f64,
    limit: f64,
    tight_ratio: f64,
    remedy: &'a str,
}

impl Clearance<'_> {
    fn evaluate(&self, issues: &mut Vec<CompatibilityIssue>, warnings: &mut Vec<CompatibilityWarning>) {
        if self.size > self.limit {
            issues.push(CompatibilityIssue::critical(
                IssueKind::SizeConflict,
                LABEL,
                &[self.category, Category::Case],
                format!(
                    "{} {} is {}mm but the case allows {}mm",
                    self.part_name, self.what, self.size, self.limit
                ),
                self.remedy.to_string(),
            ));
        } else if self.size >= self.limit * self.tight_ratio {
            warnings.push(CompatibilityWarning::new(
                WarningPriority::Medium,
                format!(
                    "{} {} of {}mm leaves only {}mm of clearance (case limit {}mm)",
                    self.part_name,
                    self.what,
                    self.size,
                    self.limit - self.size,
                    self.limit
                ),
                "Check cable and fan clearance before buying",
            ));
        }
    }
}

impl Rule for PhysicalFitRule {
    type Report = PhysicalFitCheck;

    fn id(&self) -> &'static str {
        "physical"
    }

    fn name(&self) -> &'static str {
        "Physical fit"
    }

    fn requires(&self) -> &'static [Category] {
        &[Category::Case]
    }

    fn check(&self, selection: &PartSelection) -> PhysicalFitCheck {
        let motherboard = selection.get(Category::Motherboard);
        let gpu = selection.get(Category::Gpu);
        let cooler = selection.get(Category::Cooler);

        let form_factor = motherboard
            .and_then(|p| p.specs().get_str("formFactor"))
            .map(str::to_string);
        let gpu_length_mm = gpu.and_then(|p| p.specs().get_number("length"));
        let cooler_height_mm = cooler.and_then(|p| p.specs().get_number("height"));

        let Some(case) = selection.get(Category::Case) else {
            return PhysicalFitCheck {
                outcome: CheckOutcome::waiting(selection, self.requires(), "physical fit"),
                form_factor,
                supported_form_factors: Vec::new(),
                gpu_length_mm,
                max_gpu_length_mm: None,
                cooler_height_mm,
                max_cooler_height_mm: None,
            };
        };

        let supported_form_factors: Vec<String> = case
            .specs()
            .get_strings("supportedFormFactors")
            .into_iter()
            .map(str::to_string)
            .collect();
        let max_gpu_length_mm = case.specs().get_number("maxGpuLength");
        let max_cooler_height_mm = case.specs().get_number("maxCoolerHeight");

        let mut issues = Vec::new();
        let mut warnings = Vec::new();

        if let (Some(motherboard), Some(ff)) = (motherboard, &form_factor) {
            if !supported_form_factors.is_empty() && !supported_form_factors.contains(ff) {
                issues.push(CompatibilityIssue::critical(
                    IssueKind::SizeConflict,
                    LABEL,
                    &[Category::Motherboard, Category::Case],
                    format!(
                        "{} is {} but {} only takes {}",
                        motherboard.name,
                        ff,
                        case.name,
                        supported_form_factors.join(", ")
                    ),
                    "Choose a case that supports the board's form factor",
                ));
            }
        }

        if let (Some(gpu), Some(size), Some(limit)) = (gpu, gpu_length_mm, max_gpu_length_mm) {
            Clearance {
                what: "length",
                part_name: &gpu.name,
                category: Category::Gpu,
                size,
                limit,
                tight_ratio: GPU_TIGHT_FIT_RATIO,
                remedy: "Choose a shorter GPU or a case with more GPU clearance",
            }
            .evaluate(&mut issues, &mut warnings);
        }

        if let (Some(cooler), Some(size), Some(limit)) = (cooler, cooler_height_mm, max_cooler_height_mm) {
            Clearance {
                what: "height",
                part_name: &cooler.name,
                category: Category::Cooler,
                size,
                limit,
                tight_ratio: COOLER_TIGHT_FIT_RATIO,
                remedy: "Choose a lower-profile cooler, an AIO, or a wider case",
            }
            .evaluate(&mut issues, &mut warnings);
        }

        let message = if issues.is_empty() {
            format!("Parts fit in {}", case.name)
        } else {
            format!("{} physical conflict(s) with {}", issues.len(), case.name)
        };
        let outcome = CheckOutcome::resolved(message, issues, warnings);
        tracing::debug!(status = ?outcome.status, "physical fit check");

        PhysicalFitCheck {
            outcome,
            form_factor,
            supported_form_factors,
            gpu_length_mm,
            max_gpu_length_mm,
            cooler_height_mm,
            max_cooler_height_mm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parts::{Part, Specifications};

    fn case() -> Part {
        Part::new("case", "Test Case", Category::Case).with_specs(
            Specifications::new()
                .with("supportedFormFactors", vec!["ATX", "Micro-ATX"])
                .with("maxGpuLength", 300.0)
                .with("maxCoolerHeight", 160.0),
        )
    }

    fn gpu(length: f64) -> Part {
        Part::new("gpu", "Long GPU", Category::Gpu)
            .with_specs(Specifications::new().with("length", length))
    }

    #[test]
    fn test_gpu_too_long() {
        let selection = PartSelection::new()
            .with(Category::Case, case())
            .with(Category::Gpu, gpu(350.0));
        let report = PhysicalFitRule.check(&selection);
        assert_eq!(report.status(), CheckStatus::Incompatible);
        let issue = &report.outcome.issues[0];
        assert_eq!(issue.kind, IssueKind::SizeConflict);
        assert!(issue.message.contains("350mm"));
        assert!(issue.message.contains("300mm"));
    }

    #[test]
    fn test_gpu_tight_fit_warns_only() {
        let selection = PartSelection::new()
            .with(Category::Case, case())
            .with(Category::Gpu, gpu(285.0));
        let report = PhysicalFitRule.check(&selection);
        assert_eq!(report.status(), CheckStatus::Compatible);
        assert_eq!(report.outcome.warnings.len(), 1);
    }

    #[test]
    fn test_gpu_comfortable_fit() {
        let selection = PartSelection::new()
            .with(Category::Case, case())
            .with(Category::Gpu, gpu(250.0));
        let report = PhysicalFitRule.check(&selection);
        assert!(report.outcome.issues.is_empty());
        assert!(report.outcome.warnings.is_empty());
    }

    #[test]
    fn test_cooler_thresholds() {
        let cooler = |h: f64| {
            Part::new("cooler", "Tower", Category::Cooler)
                .with_specs(Specifications::new().with("height", h))
        };
        let too_tall = PartSelection::new()
            .with(Category::Case, case())
            .with(Category::Cooler, cooler(165.0));
        assert_eq!(PhysicalFitRule.check(&too_tall).status(), CheckStatus::Incompatible);

        let tight = PartSelection::new()
            .with(Category::Case, case())
            .with(Category::Cooler, cooler(155.0));
        let report = PhysicalFitRule.check(&tight);
        assert_eq!(report.status(), CheckStatus::Compatible);
        assert_eq!(report.outcome.warnings.len(), 1);

        let roomy = PartSelection::new()
            .with(Category::Case, case())
            .with(Category::Cooler, cooler(150.0));
        assert!(PhysicalFitRule.check(&roomy).outcome.warnings.is_empty());
    }

    #[test]
    fn test_form_factor() {
        let board = |ff: &str| {
            Part::new("mb", "Board", Category::Motherboard)
                .with_specs(Specifications::new().with("formFactor", ff))
        };
        let ok = PartSelection::new()
            .with(Category::Case, case())
            .with(Category::Motherboard, board("Micro-ATX"));
        assert_eq!(PhysicalFitRule.check(&ok).status(), CheckStatus::Compatible);

        let bad = PartSelection::new()
            .with(Category::Case, case())
            .with(Category::Motherboard, board("E-ATX"));
        assert_eq!(PhysicalFitRule.check(&bad).status(), CheckStatus::Incompatible);

        let unconstrained = PartSelection::new()
            .with(Category::Case, Part::new("c", "Open Frame", Category::Case))
            .with(Category::Motherboard, board("E-ATX"));
        assert_eq!(PhysicalFitRule.check(&unconstrained).status(), CheckStatus::Compatible);
    }

    #[test]
    fn test_waiting_without_case() {
        let selection = PartSelection::new().with(Category::Gpu, gpu(350.0));
        let report = PhysicalFitRule.check(&selection);
        assert_eq!(report.status(), CheckStatus::Unresolved);
        assert_eq!(report.gpu_length_mm, Some(350.0));
    }
}
