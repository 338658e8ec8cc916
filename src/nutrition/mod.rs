//! Nutrition assessment module
//!
//! Percentage calculation against daily standards, four-band status
//! classification, report composition, scoring, and snapshot comparison.

pub mod assessment;
pub mod nutrients;
pub mod report;
pub mod score;
pub mod standards;
pub mod status;

pub use assessment::{IntakeData, NutrientAssessment, NutritionAssessor, StatusAssessment};
pub use nutrients::{NutrientCategory, NutrientKey};
pub use report::{
    export_report_to_json, export_report_to_text, generate_nutrition_overview,
    CategoryAssessment, CategorySummary, NutrientIssue, NutritionOverview, NutritionReport,
    Recommendation, RecommendationKind, Recommendations, ReportOptions, ReportStatistics,
    ReportSummary,
};
pub use score::{
    calculate_nutrient_score, compare_with_previous, generate_nutrient_scores,
    AssessmentComparison, ScoreChange, ScoreEntry,
};
pub use standards::{NutritionStandard, NutritionStandards};
pub use status::{
    evaluate_nutrition_status, NutritionStatus, Severity, StatusColor, StatusLevel,
};
