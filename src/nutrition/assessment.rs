//! Per-nutrient intake assessment
//!
//! The assessor owns an injected standards table and turns raw intake values
//! into classified, display-ready assessments. Every function here is total:
//! bad input degrades to a well-defined placeholder instead of failing.

use std::collections::BTreeMap;

use serde::Serialize;

use super::nutrients::NutrientKey;
use super::standards::NutritionStandards;
use super::status::{evaluate_nutrition_status, NutritionStatus, StatusColor, StatusLevel};

/// Aggregated intake for a period, keyed by nutrient
pub type IntakeData = BTreeMap<NutrientKey, f64>;

/// Status plus band metadata, without display decoration
#[derive(Debug, Clone, Serialize)]
pub struct StatusAssessment {
    pub status: NutritionStatus,
    pub level: StatusLevel,
}

/// Fully decorated assessment for one nutrient
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientAssessment {
    pub nutrient: NutrientKey,
    pub status: NutritionStatus,
    pub percentage: f64,
    pub color: StatusColor,
    pub intake: f64,
    pub standard: f64,
    pub unit: &'static str,
    pub nutrient_name: &'static str,
    pub level: StatusLevel,
}

/// Round to one decimal for display-stable percentages
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Nutrition assessment engine over an immutable standards table
#[derive(Debug, Clone)]
pub struct NutritionAssessor {
    standards: NutritionStandards,
}

impl NutritionAssessor {
    /// Create an assessor over the given standards table
    pub fn new(standards: NutritionStandards) -> Self {
        Self { standards }
    }

    /// Assessor over the built-in adult daily reference table
    pub fn with_daily_reference() -> Self {
        Self::new(NutritionStandards::daily_reference())
    }

    /// The injected standards table
    pub fn standards(&self) -> &NutritionStandards {
        &self.standards
    }

    /// Intake as a percentage of the daily reference, one decimal.
    ///
    /// A zero daily value (including the missing-standard placeholder)
    /// yields 0 rather than a division error.
    pub fn calculate_intake_percentage(&self, intake: f64, key: NutrientKey) -> f64 {
        let standard = self.standards.resolve(key);
        if standard.daily_value == 0.0 {
            return 0.0;
        }
        round1(intake / standard.daily_value * 100.0)
    }

    /// Percentage with the defensive floor: absent or negative intake is 0
    pub fn calculate_nutrient_intake_percentage(
        &self,
        intake: Option<f64>,
        key: NutrientKey,
    ) -> f64 {
        match intake {
            Some(value) if value >= 0.0 => self.calculate_intake_percentage(value, key),
            _ => 0.0,
        }
    }

    /// Percentages for every nutrient in the intake mapping
    pub fn calculate_all_intake_percentages(
        &self,
        intake_data: &IntakeData,
    ) -> BTreeMap<NutrientKey, f64> {
        intake_data
            .iter()
            .map(|(&key, &intake)| {
                (key, self.calculate_nutrient_intake_percentage(Some(intake), key))
            })
            .collect()
    }

    /// Status band plus level metadata for one nutrient.
    ///
    /// Absent or negative intake short-circuits to insufficient. A literal
    /// zero intake instead runs the normal pipeline and lands in deficient.
    pub fn assess_nutrient_status(&self, intake: Option<f64>, key: NutrientKey) -> StatusAssessment {
        match intake {
            Some(value) if value >= 0.0 => {
                let percentage = self.calculate_intake_percentage(value, key);
                let status = evaluate_nutrition_status(percentage);
                StatusAssessment {
                    status,
                    level: status.level(),
                }
            }
            _ => StatusAssessment {
                status: NutritionStatus::Insufficient,
                level: NutritionStatus::Insufficient.level(),
            },
        }
    }

    /// Status bands for every nutrient in the intake mapping
    pub fn assess_all_nutrient_status(
        &self,
        intake_data: &IntakeData,
    ) -> BTreeMap<NutrientKey, StatusAssessment> {
        intake_data
            .iter()
            .map(|(&key, &intake)| (key, self.assess_nutrient_status(Some(intake), key)))
            .collect()
    }

    /// Fully decorated assessment for one nutrient
    pub fn assess_nutrient_status_with_details(
        &self,
        intake: Option<f64>,
        key: NutrientKey,
    ) -> NutrientAssessment {
        let standard = self.standards.resolve(key);
        match intake {
            Some(value) if value >= 0.0 => {
                let percentage = self.calculate_intake_percentage(value, key);
                let status = evaluate_nutrition_status(percentage);
                NutrientAssessment {
                    nutrient: key,
                    status,
                    percentage,
                    color: status.color(),
                    intake: value,
                    standard: standard.daily_value,
                    unit: standard.unit,
                    nutrient_name: standard.name,
                    level: status.level(),
                }
            }
            other => {
                // Absent intake reads as zero; a negative value is echoed back
                let status = NutritionStatus::Insufficient;
                NutrientAssessment {
                    nutrient: key,
                    status,
                    percentage: 0.0,
                    color: status.color(),
                    intake: other.unwrap_or(0.0),
                    standard: standard.daily_value,
                    unit: standard.unit,
                    nutrient_name: standard.name,
                    level: status.level(),
                }
            }
        }
    }

    /// Decorated assessments for every nutrient in the intake mapping
    pub fn assess_all_nutrient_status_with_details(
        &self,
        intake_data: &IntakeData,
    ) -> BTreeMap<NutrientKey, NutrientAssessment> {
        intake_data
            .iter()
            .map(|(&key, &intake)| {
                (key, self.assess_nutrient_status_with_details(Some(intake), key))
            })
            .collect()
    }
}

impl Default for NutritionAssessor {
    fn default() -> Self {
        Self::with_daily_reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::standards::NutritionStandard;

    fn assessor() -> NutritionAssessor {
        NutritionAssessor::with_daily_reference()
    }

    #[test]
    fn test_percentage_half_of_standard() {
        // energy standard is 2200 kcal
        let pct = assessor().calculate_intake_percentage(1100.0, NutrientKey::Energy);
        assert!((pct - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentage_zero_intake() {
        let pct = assessor().calculate_intake_percentage(0.0, NutrientKey::Protein);
        assert_eq!(pct, 0.0);
    }

    #[test]
    fn test_percentage_rounds_to_one_decimal() {
        // 100 / 300 * 100 = 33.333...
        let pct = assessor().calculate_intake_percentage(100.0, NutrientKey::Carbohydrate);
        assert!((pct - 33.3).abs() < 1e-9);
    }

    #[test]
    fn test_percentage_zero_standard_never_divides() {
        let mut entries = BTreeMap::new();
        entries.insert(
            NutrientKey::Energy,
            NutritionStandard { daily_value: 0.0, unit: "kcal", name: "能量" },
        );
        let assessor = NutritionAssessor::new(NutritionStandards::new(entries));
        assert_eq!(assessor.calculate_intake_percentage(1500.0, NutrientKey::Energy), 0.0);
    }

    #[test]
    fn test_defensive_percentage_floor() {
        let assessor = assessor();
        assert_eq!(
            assessor.calculate_nutrient_intake_percentage(None, NutrientKey::Energy),
            0.0
        );
        assert_eq!(
            assessor.calculate_nutrient_intake_percentage(Some(-10.0), NutrientKey::Energy),
            0.0
        );
    }

    #[test]
    fn test_missing_intake_is_insufficient_not_deficient() {
        let assessor = assessor();

        // The defensive path lands in INSUFFICIENT...
        let missing = assessor.assess_nutrient_status(None, NutrientKey::Protein);
        assert_eq!(missing.status, NutritionStatus::Insufficient);
        let negative = assessor.assess_nutrient_status(Some(-1.0), NutrientKey::Protein);
        assert_eq!(negative.status, NutritionStatus::Insufficient);

        // ...while a literal zero intake classifies as DEFICIENT (0% < 60%)
        let zero = assessor.assess_nutrient_status(Some(0.0), NutrientKey::Protein);
        assert_eq!(zero.status, NutritionStatus::Deficient);
    }

    #[test]
    fn test_details_normal_path() {
        let assessment =
            assessor().assess_nutrient_status_with_details(Some(70.0), NutrientKey::Protein);
        assert_eq!(assessment.status, NutritionStatus::Adequate);
        assert!((assessment.percentage - 100.0).abs() < 1e-9);
        assert_eq!(assessment.intake, 70.0);
        assert_eq!(assessment.standard, 70.0);
        assert_eq!(assessment.unit, "g");
        assert_eq!(assessment.nutrient_name, "蛋白质");
        assert_eq!(assessment.level.level, 3);
        assert_eq!(assessment.color.bg, "#d1fae5");
    }

    #[test]
    fn test_details_defensive_path_echoes_intake() {
        let assessor = assessor();

        let missing = assessor.assess_nutrient_status_with_details(None, NutrientKey::Salt);
        assert_eq!(missing.status, NutritionStatus::Insufficient);
        assert_eq!(missing.percentage, 0.0);
        assert_eq!(missing.intake, 0.0);
        assert_eq!(missing.standard, 5.0);
        assert_eq!(missing.color.bg, "#fef3c7");

        let negative = assessor.assess_nutrient_status_with_details(Some(-3.0), NutrientKey::Salt);
        assert_eq!(negative.status, NutritionStatus::Insufficient);
        assert_eq!(negative.intake, -3.0);
    }

    #[test]
    fn test_details_missing_standard_degrades() {
        let assessor = NutritionAssessor::new(NutritionStandards::new(BTreeMap::new()));
        let assessment =
            assessor.assess_nutrient_status_with_details(Some(50.0), NutrientKey::Iron);
        assert_eq!(assessment.percentage, 0.0);
        assert_eq!(assessment.standard, 0.0);
        assert_eq!(assessment.unit, "");
        assert_eq!(assessment.nutrient_name, "iron");
        // zero percentage classifies at the bottom band
        assert_eq!(assessment.status, NutritionStatus::Deficient);
    }

    #[test]
    fn test_assess_all_covers_every_key() {
        let mut intake = IntakeData::new();
        intake.insert(NutrientKey::Energy, 2200.0);
        intake.insert(NutrientKey::Protein, 35.0);
        intake.insert(NutrientKey::Salt, 9.0);

        let assessor = assessor();
        let detailed = assessor.assess_all_nutrient_status_with_details(&intake);
        assert_eq!(detailed.len(), 3);
        assert_eq!(detailed[&NutrientKey::Energy].status, NutritionStatus::Adequate);
        assert_eq!(detailed[&NutrientKey::Protein].status, NutritionStatus::Deficient);
        assert_eq!(detailed[&NutrientKey::Salt].status, NutritionStatus::Excessive);

        let percentages = assessor.calculate_all_intake_percentages(&intake);
        assert!((percentages[&NutrientKey::Energy] - 100.0).abs() < 1e-9);
        assert!((percentages[&NutrientKey::Protein] - 50.0).abs() < 1e-9);
        assert!((percentages[&NutrientKey::Salt] - 180.0).abs() < 1e-9);
    }
}
