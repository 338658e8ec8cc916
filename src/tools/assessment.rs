//! Nutrition Assessment MCP Tools
//!
//! Tools that assess a day's selected meals (or an explicit intake mapping)
//! against the daily reference standards.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::db::Database;
use crate::models::DaySelection;
use crate::nutrition::{
    compare_with_previous, generate_nutrition_overview, generate_nutrient_scores,
    AssessmentComparison, CategoryAssessment, IntakeData, NutrientAssessment, NutrientCategory,
    NutrientKey, NutritionAssessor, NutritionReport, NutritionStandard, ReportOptions,
    ReportSummary,
};

/// Response for assess_intake
#[derive(Debug, Serialize)]
pub struct IntakeAssessmentResponse {
    pub summary: ReportSummary,
    pub details: BTreeMap<NutrientKey, NutrientAssessment>,
}

/// Response for assess_day_by_category
#[derive(Debug, Serialize)]
pub struct CategoryAssessmentResponse {
    pub day: String,
    pub meal_count: usize,
    pub categories: BTreeMap<NutrientCategory, CategoryAssessment>,
}

/// Response for score_day
#[derive(Debug, Serialize)]
pub struct DayScoresResponse {
    pub day: String,
    pub scores: BTreeMap<NutrientKey, u32>,
}

/// Response for compare_days
#[derive(Debug, Serialize)]
pub struct CompareDaysResponse {
    pub current_day: String,
    pub previous_day: String,
    pub comparison: AssessmentComparison,
}

/// One row of the standards table
#[derive(Debug, Serialize)]
pub struct StandardEntry {
    pub nutrient: NutrientKey,
    #[serde(flatten)]
    pub standard: NutritionStandard,
}

/// Response for get_nutrition_standards
#[derive(Debug, Serialize)]
pub struct StandardsResponse {
    pub standards: Vec<StandardEntry>,
    pub total: usize,
}

fn load_day_meals(db: &Database, day: &str) -> Result<Vec<crate::models::Meal>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    DaySelection::meals_for_day(&conn, day)
        .map_err(|e| format!("Failed to load selected meals: {}", e))
}

/// Assess a day's selected meals into a full nutrition report.
///
/// A day with no selections assesses as an all-zero intake, which reports
/// every tracked nutrient as deficient.
pub fn assess_day(
    db: &Database,
    assessor: &NutritionAssessor,
    day: &str,
    options: &ReportOptions,
) -> Result<NutritionReport, String> {
    let meals = load_day_meals(db, day)?;
    Ok(assessor.generate_nutrition_report(&meals, options))
}

/// Assess an explicit intake mapping without touching the database
pub fn assess_intake(
    assessor: &NutritionAssessor,
    intake: &IntakeData,
) -> IntakeAssessmentResponse {
    let details = assessor.assess_all_nutrient_status_with_details(intake);
    let summary = assessor.generate_summary(&details);
    IntakeAssessmentResponse { summary, details }
}

/// Assess a day's selections grouped by nutrient category
pub fn assess_day_by_category(
    db: &Database,
    assessor: &NutritionAssessor,
    day: &str,
) -> Result<CategoryAssessmentResponse, String> {
    let meals = load_day_meals(db, day)?;
    let overview = generate_nutrition_overview(&meals);

    Ok(CategoryAssessmentResponse {
        day: day.to_string(),
        meal_count: overview.meal_count,
        categories: assessor.assess_by_category(&overview.total_intake),
    })
}

/// Score every tracked nutrient for a day on a 0-100 scale
pub fn score_day(
    db: &Database,
    assessor: &NutritionAssessor,
    day: &str,
) -> Result<DayScoresResponse, String> {
    let meals = load_day_meals(db, day)?;
    let overview = generate_nutrition_overview(&meals);
    let details = assessor.assess_all_nutrient_status_with_details(&overview.total_intake);

    Ok(DayScoresResponse {
        day: day.to_string(),
        scores: generate_nutrient_scores(&details),
    })
}

/// Compare two days' assessments by per-nutrient score
pub fn compare_days(
    db: &Database,
    assessor: &NutritionAssessor,
    current_day: &str,
    previous_day: &str,
) -> Result<CompareDaysResponse, String> {
    let assess = |day: &str| -> Result<BTreeMap<NutrientKey, NutrientAssessment>, String> {
        let meals = load_day_meals(db, day)?;
        let overview = generate_nutrition_overview(&meals);
        Ok(assessor.assess_all_nutrient_status_with_details(&overview.total_intake))
    };

    let current = assess(current_day)?;
    let previous = assess(previous_day)?;

    Ok(CompareDaysResponse {
        current_day: current_day.to_string(),
        previous_day: previous_day.to_string(),
        comparison: compare_with_previous(&current, &previous),
    })
}

/// The daily reference standards the assessor was built with
pub fn get_nutrition_standards(assessor: &NutritionAssessor) -> StandardsResponse {
    let standards: Vec<StandardEntry> = assessor
        .standards()
        .iter()
        .map(|(key, standard)| StandardEntry {
            nutrient: *key,
            standard: *standard,
        })
        .collect();
    let total = standards.len();

    StandardsResponse { standards, total }
}
