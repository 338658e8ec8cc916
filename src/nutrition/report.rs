//! Nutrition report composition
//!
//! Aggregates a meal collection, assesses every tracked nutrient, and
//! composes the report: summary, statistics, recommendations, category
//! breakdown, plus JSON and plain-text renderings.

use std::collections::BTreeMap;

use chrono::{Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::assessment::{round1, IntakeData, NutrientAssessment, NutritionAssessor};
use super::nutrients::{NutrientCategory, NutrientKey};
use super::status::{NutritionStatus, Severity};
use crate::models::{Meal, Nutrients};

/// Options controlling which report sections are produced
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportOptions {
    pub include_recommendations: bool,
    pub include_details: bool,
    pub include_statistics: bool,
    /// Free-form label echoed into the report (e.g. "daily")
    pub time_range: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            include_recommendations: true,
            include_details: true,
            include_statistics: true,
            time_range: "daily".to_string(),
        }
    }
}

/// Aggregated view of a meal collection
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionOverview {
    pub total_intake: IntakeData,
    pub total_energy: f64,
    pub meal_count: usize,
    /// Per-meal-title share of total energy, in percent
    pub energy_distribution: BTreeMap<String, f64>,
}

/// One entry in the summary's critical-issue or warning lists
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientIssue {
    pub nutrient: NutrientKey,
    pub nutrient_name: &'static str,
    pub percentage: f64,
    pub intake: f64,
    pub standard: f64,
    pub unit: &'static str,
}

/// Roll-up across all assessed nutrients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_nutrients: usize,
    pub status_counts: BTreeMap<NutritionStatus, usize>,
    pub overall_status: NutritionStatus,
    pub critical_issues: Vec<NutrientIssue>,
    pub warnings: Vec<NutrientIssue>,
}

/// Percentage statistics and the health score
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStatistics {
    pub average_intake_percentage: f64,
    pub median_intake_percentage: f64,
    pub nutrient_status_distribution: BTreeMap<NutritionStatus, usize>,
    pub energy_distribution: BTreeMap<String, f64>,
    pub total_energy: f64,
    pub meal_count: usize,
    pub health_score: u32,
}

/// Kind tag on a recommendation entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Critical,
    Warning,
    Info,
    Tip,
}

/// A single recommendation entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrient: Option<NutrientKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrient_name: Option<&'static str>,
    pub message: String,
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

/// Recommendations grouped by urgency
#[derive(Debug, Clone, Serialize)]
pub struct Recommendations {
    pub priority: Vec<Recommendation>,
    pub general: Vec<Recommendation>,
    pub dietary: Vec<Recommendation>,
}

/// The composed nutrition report
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionReport {
    /// RFC 3339 creation time; format-stable, value is the call time
    pub timestamp: String,
    pub time_range: String,
    pub summary: ReportSummary,
    pub statistics: Option<ReportStatistics>,
    pub details: Option<BTreeMap<NutrientKey, NutrientAssessment>>,
    pub recommendations: Option<Recommendations>,
}

/// Per-category status tallies
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategorySummary {
    pub total: usize,
    pub adequate: usize,
    pub insufficient: usize,
    pub deficient: usize,
    pub excessive: usize,
}

/// Assessments for the nutrients of one category
#[derive(Debug, Clone, Serialize)]
pub struct CategoryAssessment {
    pub nutrients: BTreeMap<NutrientKey, NutrientAssessment>,
    pub summary: CategorySummary,
}

/// Sum a meal collection into total intake plus energy breakdown
pub fn generate_nutrition_overview(meals: &[Meal]) -> NutritionOverview {
    let totals: Nutrients = meals.iter().map(|meal| meal.nutrients).sum();
    let total_energy = totals.energy;

    let mut energy_by_title: BTreeMap<String, f64> = BTreeMap::new();
    for meal in meals {
        *energy_by_title.entry(meal.title.clone()).or_insert(0.0) += meal.nutrients.energy;
    }
    let energy_distribution = energy_by_title
        .into_iter()
        .map(|(title, energy)| {
            let share = if total_energy > 0.0 {
                round1(energy / total_energy * 100.0)
            } else {
                0.0
            };
            (title, share)
        })
        .collect();

    NutritionOverview {
        total_intake: totals.to_intake_data(),
        total_energy,
        meal_count: meals.len(),
        energy_distribution,
    }
}

impl NutritionAssessor {
    /// Compose a full report for a meal collection
    pub fn generate_nutrition_report(
        &self,
        meals: &[Meal],
        options: &ReportOptions,
    ) -> NutritionReport {
        let overview = generate_nutrition_overview(meals);
        let detailed = self.assess_all_nutrient_status_with_details(&overview.total_intake);

        NutritionReport {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            time_range: options.time_range.clone(),
            summary: self.generate_summary(&detailed),
            statistics: options
                .include_statistics
                .then(|| self.generate_statistics(&detailed, &overview)),
            details: options.include_details.then(|| detailed.clone()),
            recommendations: options
                .include_recommendations
                .then(|| self.generate_recommendations(&detailed)),
        }
    }

    /// Tally status counts and collect issue lists.
    ///
    /// Overall status priority: any deficient nutrient wins, then excessive,
    /// then insufficient, otherwise adequate.
    pub fn generate_summary(
        &self,
        assessments: &BTreeMap<NutrientKey, NutrientAssessment>,
    ) -> ReportSummary {
        let mut status_counts: BTreeMap<NutritionStatus, usize> =
            NutritionStatus::ALL.into_iter().map(|status| (status, 0)).collect();
        let mut critical_issues = Vec::new();
        let mut warnings = Vec::new();

        for (key, assessment) in assessments {
            *status_counts.entry(assessment.status).or_insert(0) += 1;

            let issue = NutrientIssue {
                nutrient: *key,
                nutrient_name: assessment.nutrient_name,
                percentage: assessment.percentage,
                intake: assessment.intake,
                standard: assessment.standard,
                unit: assessment.unit,
            };
            match assessment.status {
                NutritionStatus::Deficient | NutritionStatus::Excessive => {
                    critical_issues.push(issue)
                }
                NutritionStatus::Insufficient => warnings.push(issue),
                NutritionStatus::Adequate => {}
            }
        }

        let overall_status = if status_counts[&NutritionStatus::Deficient] > 0 {
            NutritionStatus::Deficient
        } else if status_counts[&NutritionStatus::Excessive] > 0 {
            NutritionStatus::Excessive
        } else if status_counts[&NutritionStatus::Insufficient] > 0 {
            NutritionStatus::Insufficient
        } else {
            NutritionStatus::Adequate
        };

        ReportSummary {
            total_nutrients: assessments.len(),
            status_counts,
            overall_status,
            critical_issues,
            warnings,
        }
    }

    /// Mean/median percentages, status distribution, and the health score
    pub fn generate_statistics(
        &self,
        assessments: &BTreeMap<NutrientKey, NutrientAssessment>,
        overview: &NutritionOverview,
    ) -> ReportStatistics {
        let percentages: Vec<f64> =
            assessments.values().map(|assessment| assessment.percentage).collect();

        let average_intake_percentage = if percentages.is_empty() {
            0.0
        } else {
            percentages.iter().sum::<f64>() / percentages.len() as f64
        };

        let mut sorted = percentages;
        sorted.sort_by(|a, b| a.total_cmp(b));
        let median_intake_percentage = if sorted.is_empty() {
            0.0
        } else {
            let mid = sorted.len() / 2;
            if sorted.len() % 2 != 0 {
                sorted[mid]
            } else {
                (sorted[mid - 1] + sorted[mid]) / 2.0
            }
        };

        let mut nutrient_status_distribution: BTreeMap<NutritionStatus, usize> =
            NutritionStatus::ALL.into_iter().map(|status| (status, 0)).collect();
        for assessment in assessments.values() {
            *nutrient_status_distribution.entry(assessment.status).or_insert(0) += 1;
        }

        let adequate_count = nutrient_status_distribution[&NutritionStatus::Adequate];
        let total_nutrients = assessments.len();
        let health_score = if total_nutrients > 0 {
            ((adequate_count as f64 / total_nutrients as f64) * 100.0).round() as u32
        } else {
            0
        };

        ReportStatistics {
            average_intake_percentage,
            median_intake_percentage,
            nutrient_status_distribution,
            energy_distribution: overview.energy_distribution.clone(),
            total_energy: overview.total_energy,
            meal_count: overview.meal_count,
            health_score,
        }
    }

    /// Per-nutrient recommendations plus the fixed general/dietary tips
    pub fn generate_recommendations(
        &self,
        assessments: &BTreeMap<NutrientKey, NutrientAssessment>,
    ) -> Recommendations {
        let mut priority = Vec::new();
        let mut general = Vec::new();
        let mut dietary = Vec::new();

        for (key, assessment) in assessments {
            let name = assessment.nutrient_name;
            match assessment.status {
                NutritionStatus::Deficient => priority.push(Recommendation {
                    kind: RecommendationKind::Critical,
                    nutrient: Some(*key),
                    nutrient_name: Some(name),
                    message: format!("{}严重缺乏（{}%）", name, assessment.percentage),
                    action: assessment.level.recommendation,
                    severity: Some(Severity::High),
                }),
                NutritionStatus::Excessive => priority.push(Recommendation {
                    kind: RecommendationKind::Warning,
                    nutrient: Some(*key),
                    nutrient_name: Some(name),
                    message: format!("{}摄入过量（{}%）", name, assessment.percentage),
                    action: assessment.level.recommendation,
                    severity: Some(Severity::High),
                }),
                NutritionStatus::Insufficient => general.push(Recommendation {
                    kind: RecommendationKind::Info,
                    nutrient: Some(*key),
                    nutrient_name: Some(name),
                    message: format!("{}摄入不足（{}%）", name, assessment.percentage),
                    action: assessment.level.recommendation,
                    severity: Some(Severity::Medium),
                }),
                NutritionStatus::Adequate => {}
            }
        }

        general.push(Recommendation {
            kind: RecommendationKind::Info,
            nutrient: None,
            nutrient_name: None,
            message: "保持均衡饮食，多样化食物摄入".to_string(),
            action: "建议每日摄入多种类食物，包括谷物、蔬菜、水果、蛋白质和乳制品",
            severity: None,
        });

        dietary.push(Recommendation {
            kind: RecommendationKind::Tip,
            nutrient: None,
            nutrient_name: None,
            message: "控制总能量摄入，保持健康体重".to_string(),
            action: "根据个人活动量调整每日能量摄入，避免过量",
            severity: None,
        });

        dietary.push(Recommendation {
            kind: RecommendationKind::Tip,
            nutrient: None,
            nutrient_name: None,
            message: "保持充足的水分摄入".to_string(),
            action: "建议每日饮水1500-2000毫升",
            severity: None,
        });

        Recommendations { priority, general, dietary }
    }

    /// Assess the intake mapping grouped by nutrient category, skipping
    /// keys absent from the mapping
    pub fn assess_by_category(
        &self,
        intake_data: &IntakeData,
    ) -> BTreeMap<NutrientCategory, CategoryAssessment> {
        NutrientCategory::ALL
            .into_iter()
            .map(|category| {
                let mut nutrients = BTreeMap::new();
                let mut summary = CategorySummary::default();

                for &key in category.members() {
                    let Some(&intake) = intake_data.get(&key) else {
                        continue;
                    };
                    let assessment = self.assess_nutrient_status_with_details(Some(intake), key);
                    summary.total += 1;
                    match assessment.status {
                        NutritionStatus::Adequate => summary.adequate += 1,
                        NutritionStatus::Insufficient => summary.insufficient += 1,
                        NutritionStatus::Deficient => summary.deficient += 1,
                        NutritionStatus::Excessive => summary.excessive += 1,
                    }
                    nutrients.insert(key, assessment);
                }

                (category, CategoryAssessment { nutrients, summary })
            })
            .collect()
    }
}

/// Pretty-printed JSON rendering of a report
pub fn export_report_to_json(report: &NutritionReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| String::from("{}"))
}

/// Fixed-layout plain-text rendering of a report
pub fn export_report_to_text(report: &NutritionReport) -> String {
    let assessed_at = chrono::DateTime::parse_from_rfc3339(&report.timestamp)
        .map(|dt| dt.with_timezone(&Local).format("%Y/%-m/%-d %H:%M:%S").to_string())
        .unwrap_or_else(|_| report.timestamp.clone());

    let mut text = String::from("营养状态评估报告\n");
    text.push_str(&"=".repeat(50));
    text.push_str("\n\n");
    text.push_str(&format!("评估时间: {}\n", assessed_at));
    text.push_str(&format!("评估范围: {}\n\n", report.time_range));

    text.push_str("总体概况\n");
    text.push_str(&"-".repeat(30));
    text.push('\n');
    text.push_str(&format!("总营养素数量: {}\n", report.summary.total_nutrients));
    text.push_str(&format!(
        "整体状态: {}\n",
        report.summary.overall_status.level().name
    ));
    if let Some(statistics) = &report.statistics {
        text.push_str(&format!("健康评分: {}分\n", statistics.health_score));
    }
    text.push('\n');

    text.push_str("营养状态分布\n");
    text.push_str(&"-".repeat(30));
    text.push('\n');
    for (status, count) in &report.summary.status_counts {
        text.push_str(&format!("{}: {}种\n", status.level().name, count));
    }
    text.push('\n');

    if !report.summary.critical_issues.is_empty() {
        text.push_str("严重问题\n");
        text.push_str(&"-".repeat(30));
        text.push('\n');
        for issue in &report.summary.critical_issues {
            text.push_str(&format!(
                "- {}: {}% (摄入: {}{}, 标准: {}{})\n",
                issue.nutrient_name,
                issue.percentage,
                issue.intake,
                issue.unit,
                issue.standard,
                issue.unit
            ));
        }
        text.push('\n');
    }

    if !report.summary.warnings.is_empty() {
        text.push_str("注意事项\n");
        text.push_str(&"-".repeat(30));
        text.push('\n');
        for warning in &report.summary.warnings {
            text.push_str(&format!("- {}: {}%\n", warning.nutrient_name, warning.percentage));
        }
        text.push('\n');
    }

    if let Some(recommendations) = &report.recommendations {
        text.push_str("建议\n");
        text.push_str(&"-".repeat(30));
        text.push('\n');
        for rec in &recommendations.priority {
            let tag = if rec.severity == Some(Severity::High) { "重要" } else { "一般" };
            text.push_str(&format!("【{}】{}\n", tag, rec.message));
            text.push_str(&format!("  {}\n\n", rec.action));
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meal(title: &str, nutrients: Nutrients) -> Meal {
        Meal {
            id: 0,
            title: title.to_string(),
            image_url: None,
            nutrients,
            created_at: "2025-03-01 08:00:00".to_string(),
            updated_at: "2025-03-01 08:00:00".to_string(),
        }
    }

    fn assessor() -> NutritionAssessor {
        NutritionAssessor::with_daily_reference()
    }

    #[test]
    fn test_overview_sums_meals() {
        let meals = vec![
            meal("早餐", Nutrients { protein: 10.0, energy: 400.0, ..Nutrients::zero() }),
            meal("午餐", Nutrients { protein: 15.0, energy: 600.0, ..Nutrients::zero() }),
        ];
        let overview = generate_nutrition_overview(&meals);
        assert_eq!(overview.total_intake[&NutrientKey::Protein], 25.0);
        assert_eq!(overview.total_energy, 1000.0);
        assert_eq!(overview.meal_count, 2);
        assert_eq!(overview.energy_distribution["早餐"], 40.0);
        assert_eq!(overview.energy_distribution["午餐"], 60.0);
    }

    #[test]
    fn test_overview_zero_energy_has_zero_shares() {
        let meals = vec![meal("水", Nutrients::zero())];
        let overview = generate_nutrition_overview(&meals);
        assert_eq!(overview.energy_distribution["水"], 0.0);
    }

    #[test]
    fn test_overall_status_priority() {
        // protein deficient (30%), salt excessive (200%)
        let mut intake = IntakeData::new();
        intake.insert(NutrientKey::Protein, 21.0);
        intake.insert(NutrientKey::Salt, 10.0);

        let assessor = assessor();
        let detailed = assessor.assess_all_nutrient_status_with_details(&intake);
        let summary = assessor.generate_summary(&detailed);
        assert_eq!(summary.overall_status, NutritionStatus::Deficient);
        assert_eq!(summary.critical_issues.len(), 2);

        // salt excessive only, energy insufficient (70%)
        let mut intake = IntakeData::new();
        intake.insert(NutrientKey::Salt, 10.0);
        intake.insert(NutrientKey::Energy, 1540.0);
        let detailed = assessor.assess_all_nutrient_status_with_details(&intake);
        let summary = assessor.generate_summary(&detailed);
        assert_eq!(summary.overall_status, NutritionStatus::Excessive);
        assert_eq!(summary.warnings.len(), 1);
    }

    #[test]
    fn test_summary_counts_every_band() {
        let mut intake = IntakeData::new();
        intake.insert(NutrientKey::Protein, 70.0); // 100% adequate
        intake.insert(NutrientKey::Energy, 660.0); // 30% deficient
        intake.insert(NutrientKey::Carbohydrate, 210.0); // 70% insufficient
        intake.insert(NutrientKey::Salt, 10.0); // 200% excessive

        let assessor = assessor();
        let detailed = assessor.assess_all_nutrient_status_with_details(&intake);
        let summary = assessor.generate_summary(&detailed);

        assert_eq!(summary.total_nutrients, 4);
        assert_eq!(summary.status_counts[&NutritionStatus::Adequate], 1);
        assert_eq!(summary.status_counts[&NutritionStatus::Deficient], 1);
        assert_eq!(summary.status_counts[&NutritionStatus::Insufficient], 1);
        assert_eq!(summary.status_counts[&NutritionStatus::Excessive], 1);
    }

    #[test]
    fn test_statistics_median_even_and_odd() {
        let assessor = assessor();

        // three nutrients: percentages 30, 70, 100
        let mut intake = IntakeData::new();
        intake.insert(NutrientKey::Energy, 660.0);
        intake.insert(NutrientKey::Carbohydrate, 210.0);
        intake.insert(NutrientKey::Protein, 70.0);
        let detailed = assessor.assess_all_nutrient_status_with_details(&intake);
        let overview = generate_nutrition_overview(&[]);
        let stats = assessor.generate_statistics(&detailed, &overview);
        assert!((stats.median_intake_percentage - 70.0).abs() < 1e-9);
        assert!((stats.average_intake_percentage - 200.0 / 3.0).abs() < 1e-9);

        // four nutrients: percentages 30, 70, 100, 200 -> median 85
        intake.insert(NutrientKey::Salt, 10.0);
        let detailed = assessor.assess_all_nutrient_status_with_details(&intake);
        let stats = assessor.generate_statistics(&detailed, &overview);
        assert!((stats.median_intake_percentage - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_health_score_rounds_adequate_share() {
        // one adequate of three assessed -> round(33.33) = 33
        let mut intake = IntakeData::new();
        intake.insert(NutrientKey::Protein, 70.0);
        intake.insert(NutrientKey::Energy, 660.0);
        intake.insert(NutrientKey::Salt, 10.0);

        let assessor = assessor();
        let detailed = assessor.assess_all_nutrient_status_with_details(&intake);
        let stats = assessor.generate_statistics(&detailed, &generate_nutrition_overview(&[]));
        assert_eq!(stats.health_score, 33);
    }

    #[test]
    fn test_recommendations_composition() {
        let mut intake = IntakeData::new();
        intake.insert(NutrientKey::Protein, 21.0); // 30% deficient
        intake.insert(NutrientKey::Salt, 10.0); // 200% excessive
        intake.insert(NutrientKey::Energy, 1540.0); // 70% insufficient

        let assessor = assessor();
        let detailed = assessor.assess_all_nutrient_status_with_details(&intake);
        let recs = assessor.generate_recommendations(&detailed);

        assert_eq!(recs.priority.len(), 2);
        assert_eq!(recs.general.len(), 2); // one nutrient + fixed tip
        assert_eq!(recs.dietary.len(), 2);

        let deficient = recs
            .priority
            .iter()
            .find(|r| r.kind == RecommendationKind::Critical)
            .unwrap();
        assert_eq!(deficient.message, "蛋白质严重缺乏（30%）");
        assert_eq!(deficient.severity, Some(Severity::High));

        let excessive = recs
            .priority
            .iter()
            .find(|r| r.kind == RecommendationKind::Warning)
            .unwrap();
        assert_eq!(excessive.message, "食盐摄入过量（200%）");

        assert_eq!(recs.general[0].message, "能量摄入不足（70%）");
        assert_eq!(recs.general[1].message, "保持均衡饮食，多样化食物摄入");
        assert_eq!(recs.dietary[1].action, "建议每日饮水1500-2000毫升");
    }

    #[test]
    fn test_report_sections_follow_options() {
        let meals = vec![meal("午餐", Nutrients { energy: 2200.0, ..Nutrients::zero() })];
        let assessor = assessor();

        let full = assessor.generate_nutrition_report(&meals, &ReportOptions::default());
        assert!(full.statistics.is_some());
        assert!(full.details.is_some());
        assert!(full.recommendations.is_some());
        assert_eq!(full.time_range, "daily");
        // tracked nutrients are always all assessed
        assert_eq!(full.summary.total_nutrients, NutrientKey::TRACKED.len());

        let bare = assessor.generate_nutrition_report(
            &meals,
            &ReportOptions {
                include_recommendations: false,
                include_details: false,
                include_statistics: false,
                time_range: "weekly".to_string(),
            },
        );
        assert!(bare.statistics.is_none());
        assert!(bare.details.is_none());
        assert!(bare.recommendations.is_none());
        assert_eq!(bare.time_range, "weekly");
    }

    #[test]
    fn test_report_timestamp_is_rfc3339() {
        let report =
            assessor().generate_nutrition_report(&[], &ReportOptions::default());
        assert!(chrono::DateTime::parse_from_rfc3339(&report.timestamp).is_ok());
        assert!(report.timestamp.ends_with('Z'));
    }

    #[test]
    fn test_report_idempotent_apart_from_timestamp() {
        let meals = vec![
            meal("早餐", Nutrients { protein: 30.0, energy: 500.0, ..Nutrients::zero() }),
            meal("午餐", Nutrients { protein: 40.0, energy: 900.0, salt: 3.0, ..Nutrients::zero() }),
        ];
        let assessor = assessor();
        let options = ReportOptions::default();

        let first = assessor.generate_nutrition_report(&meals, &options);
        let second = assessor.generate_nutrition_report(&meals, &options);

        let strip = |report: &NutritionReport| {
            let mut value = serde_json::to_value(report).unwrap();
            value.as_object_mut().unwrap().remove("timestamp");
            value
        };
        assert_eq!(strip(&first), strip(&second));
    }

    #[test]
    fn test_json_export_round_trips() {
        let meals = vec![meal("晚餐", Nutrients { protein: 70.0, ..Nutrients::zero() })];
        let report = assessor().generate_nutrition_report(&meals, &ReportOptions::default());

        let json = export_report_to_json(&report);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, serde_json::to_value(&report).unwrap());
        assert_eq!(parsed["timeRange"], "daily");
        assert!(parsed["summary"]["statusCounts"]["deficient"].is_number());
    }

    #[test]
    fn test_text_export_layout() {
        let meals = vec![meal(
            "一日三餐",
            Nutrients {
                energy: 2200.0,      // 100% adequate
                protein: 21.0,       // 30% deficient
                salt: 10.0,          // 200% excessive
                carbohydrate: 210.0, // 70% insufficient
                ..Nutrients::zero()
            },
        )];
        let report = assessor().generate_nutrition_report(&meals, &ReportOptions::default());
        let text = export_report_to_text(&report);

        assert!(text.starts_with("营养状态评估报告\n"));
        assert!(text.contains(&"=".repeat(50)));
        assert!(text.contains("评估范围: daily"));
        assert!(text.contains("整体状态: 缺乏"));
        assert!(text.contains("健康评分:"));
        assert!(text.contains("营养状态分布"));
        assert!(text.contains("严重问题"));
        assert!(text.contains("- 蛋白质: 30% (摄入: 21g, 标准: 70g)"));
        assert!(text.contains("注意事项"));
        assert!(text.contains("- 碳水: 70%"));
        assert!(text.contains("【重要】蛋白质严重缺乏（30%）"));
    }

    #[test]
    fn test_text_export_skips_score_without_statistics() {
        let options = ReportOptions { include_statistics: false, ..ReportOptions::default() };
        let report = assessor().generate_nutrition_report(&[], &options);
        let text = export_report_to_text(&report);
        assert!(!text.contains("健康评分"));
        assert!(text.contains("整体状态"));
    }

    #[test]
    fn test_assess_by_category_skips_absent_keys() {
        let mut intake = IntakeData::new();
        intake.insert(NutrientKey::Energy, 2200.0); // adequate
        intake.insert(NutrientKey::Fat, 20.0); // 33.3% deficient
        intake.insert(NutrientKey::VitaminC, 100.0); // adequate
        intake.insert(NutrientKey::Calcium, 400.0); // 50% deficient

        let results = assessor().assess_by_category(&intake);

        let macros = &results[&NutrientCategory::Macronutrients];
        assert_eq!(macros.summary.total, 2);
        assert_eq!(macros.summary.adequate, 1);
        assert_eq!(macros.summary.deficient, 1);
        assert!(macros.nutrients.contains_key(&NutrientKey::Fat));
        assert!(!macros.nutrients.contains_key(&NutrientKey::Protein));

        let vitamins = &results[&NutrientCategory::Vitamins];
        assert_eq!(vitamins.summary.total, 1);
        assert_eq!(vitamins.summary.adequate, 1);

        let minerals = &results[&NutrientCategory::Minerals];
        assert_eq!(minerals.summary.total, 1);
        assert_eq!(minerals.summary.deficient, 1);
    }
}
