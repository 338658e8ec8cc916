//! Per-nutrient scoring and snapshot comparison
//!
//! Maps an assessment to a 0-100 score, then diffs two assessment
//! snapshots (e.g. today vs. yesterday) into improved/worsened/unchanged
//! buckets plus the nutrients that appeared or disappeared.

use std::collections::BTreeMap;

use serde::Serialize;

use super::assessment::NutrientAssessment;
use super::nutrients::NutrientKey;
use super::status::NutritionStatus;

/// A nutrient whose score moved between two snapshots
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreChange {
    pub nutrient: NutrientKey,
    pub nutrient_name: &'static str,
    pub previous_score: u32,
    pub current_score: u32,
    /// Magnitude of the move, positive in both directions
    pub change: u32,
}

/// A nutrient whose score held steady between two snapshots
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub nutrient: NutrientKey,
    pub nutrient_name: &'static str,
    pub score: u32,
}

/// Result of diffing a current snapshot against a previous one
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentComparison {
    pub improved: Vec<ScoreChange>,
    pub worsened: Vec<ScoreChange>,
    pub unchanged: Vec<ScoreEntry>,
    pub new_nutrients: Vec<NutrientKey>,
    pub removed_nutrients: Vec<NutrientKey>,
}

/// Score one assessment on a 0-100 scale.
///
/// Adequate intakes score by closeness to 100%, insufficient ones by how
/// far they fell short. Deficient and excessive intakes both score zero.
pub fn calculate_nutrient_score(assessment: &NutrientAssessment) -> u32 {
    let percentage = assessment.percentage;
    match assessment.status {
        NutritionStatus::Adequate => {
            if (90.0..=110.0).contains(&percentage) {
                100
            } else if (80.0..90.0).contains(&percentage) {
                90
            } else if percentage > 110.0 && percentage <= 120.0 {
                85
            } else {
                100
            }
        }
        NutritionStatus::Insufficient => {
            if percentage >= 60.0 {
                60
            } else if percentage >= 40.0 {
                40
            } else {
                20
            }
        }
        NutritionStatus::Deficient | NutritionStatus::Excessive => 0,
    }
}

/// Score every assessment in a snapshot
pub fn generate_nutrient_scores(
    assessments: &BTreeMap<NutrientKey, NutrientAssessment>,
) -> BTreeMap<NutrientKey, u32> {
    assessments
        .iter()
        .map(|(key, assessment)| (*key, calculate_nutrient_score(assessment)))
        .collect()
}

/// Diff two assessment snapshots by score
pub fn compare_with_previous(
    current: &BTreeMap<NutrientKey, NutrientAssessment>,
    previous: &BTreeMap<NutrientKey, NutrientAssessment>,
) -> AssessmentComparison {
    let mut comparison = AssessmentComparison::default();

    for (key, assessment) in current {
        let Some(previous_assessment) = previous.get(key) else {
            comparison.new_nutrients.push(*key);
            continue;
        };

        let current_score = calculate_nutrient_score(assessment);
        let previous_score = calculate_nutrient_score(previous_assessment);

        if current_score > previous_score {
            comparison.improved.push(ScoreChange {
                nutrient: *key,
                nutrient_name: assessment.nutrient_name,
                previous_score,
                current_score,
                change: current_score - previous_score,
            });
        } else if current_score < previous_score {
            comparison.worsened.push(ScoreChange {
                nutrient: *key,
                nutrient_name: assessment.nutrient_name,
                previous_score,
                current_score,
                change: previous_score - current_score,
            });
        } else {
            comparison.unchanged.push(ScoreEntry {
                nutrient: *key,
                nutrient_name: assessment.nutrient_name,
                score: current_score,
            });
        }
    }

    comparison.removed_nutrients =
        previous.keys().filter(|key| !current.contains_key(key)).copied().collect();

    comparison
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::assessment::NutritionAssessor;

    fn assess(key: NutrientKey, intake: f64) -> NutrientAssessment {
        NutritionAssessor::with_daily_reference().assess_nutrient_status_with_details(Some(intake), key)
    }

    #[test]
    fn test_adequate_score_ladder() {
        // protein standard is 70g
        assert_eq!(calculate_nutrient_score(&assess(NutrientKey::Protein, 70.0)), 100); // 100%
        assert_eq!(calculate_nutrient_score(&assess(NutrientKey::Protein, 63.0)), 100); // 90%
        assert_eq!(calculate_nutrient_score(&assess(NutrientKey::Protein, 77.0)), 100); // 110%
        assert_eq!(calculate_nutrient_score(&assess(NutrientKey::Protein, 59.5)), 90); // 85%
        assert_eq!(calculate_nutrient_score(&assess(NutrientKey::Protein, 56.0)), 90); // 80%
        assert_eq!(calculate_nutrient_score(&assess(NutrientKey::Protein, 80.5)), 85); // 115%
        assert_eq!(calculate_nutrient_score(&assess(NutrientKey::Protein, 84.0)), 85); // 120%
    }

    #[test]
    fn test_adequate_fallback_scores_full() {
        // an adequate status with an out-of-band percentage still scores 100
        let mut assessment = assess(NutrientKey::Protein, 70.0);
        assessment.percentage = 130.0;
        assert_eq!(calculate_nutrient_score(&assessment), 100);
    }

    #[test]
    fn test_insufficient_score_ladder() {
        assert_eq!(calculate_nutrient_score(&assess(NutrientKey::Protein, 45.5)), 60); // 65%
        assert_eq!(calculate_nutrient_score(&assess(NutrientKey::Protein, 42.0)), 60); // 60%

        // the 40-59 and sub-40 rungs are reachable through the defensive path
        let mut assessment = assess(NutrientKey::Protein, 42.0);
        assessment.percentage = 45.0;
        assert_eq!(calculate_nutrient_score(&assessment), 40);

        let floor = NutritionAssessor::with_daily_reference()
            .assess_nutrient_status_with_details(Some(-5.0), NutrientKey::Protein);
        assert_eq!(floor.percentage, 0.0);
        assert_eq!(calculate_nutrient_score(&floor), 20);
    }

    #[test]
    fn test_deficient_and_excessive_score_zero() {
        assert_eq!(calculate_nutrient_score(&assess(NutrientKey::Protein, 21.0)), 0); // 30%
        assert_eq!(calculate_nutrient_score(&assess(NutrientKey::Salt, 10.0)), 0); // 200%
    }

    #[test]
    fn test_generate_scores_covers_snapshot() {
        let mut snapshot = BTreeMap::new();
        snapshot.insert(NutrientKey::Protein, assess(NutrientKey::Protein, 70.0));
        snapshot.insert(NutrientKey::Salt, assess(NutrientKey::Salt, 10.0));

        let scores = generate_nutrient_scores(&snapshot);
        assert_eq!(scores[&NutrientKey::Protein], 100);
        assert_eq!(scores[&NutrientKey::Salt], 0);
    }

    #[test]
    fn test_comparison_buckets() {
        // current: protein (new), energy 100 pts, salt 100 pts
        let mut current = BTreeMap::new();
        current.insert(NutrientKey::Protein, assess(NutrientKey::Protein, 70.0));
        current.insert(NutrientKey::Energy, assess(NutrientKey::Energy, 2200.0));
        current.insert(NutrientKey::Salt, assess(NutrientKey::Salt, 5.0));

        // previous: energy 0 pts, salt 100 pts, carbohydrate (removed)
        let mut previous = BTreeMap::new();
        previous.insert(NutrientKey::Energy, assess(NutrientKey::Energy, 660.0));
        previous.insert(NutrientKey::Salt, assess(NutrientKey::Salt, 5.0));
        previous.insert(NutrientKey::Carbohydrate, assess(NutrientKey::Carbohydrate, 300.0));

        let comparison = compare_with_previous(&current, &previous);

        assert_eq!(comparison.new_nutrients, vec![NutrientKey::Protein]);
        assert_eq!(comparison.removed_nutrients, vec![NutrientKey::Carbohydrate]);

        assert_eq!(comparison.improved.len(), 1);
        let improved = &comparison.improved[0];
        assert_eq!(improved.nutrient, NutrientKey::Energy);
        assert_eq!(improved.previous_score, 0);
        assert_eq!(improved.current_score, 100);
        assert_eq!(improved.change, 100);

        assert!(comparison.worsened.is_empty());
        assert_eq!(comparison.unchanged.len(), 1);
        assert_eq!(comparison.unchanged[0].nutrient, NutrientKey::Salt);
        assert_eq!(comparison.unchanged[0].score, 100);
    }

    #[test]
    fn test_comparison_worsened_change_is_positive() {
        let mut current = BTreeMap::new();
        current.insert(NutrientKey::Energy, assess(NutrientKey::Energy, 660.0)); // 0 pts

        let mut previous = BTreeMap::new();
        previous.insert(NutrientKey::Energy, assess(NutrientKey::Energy, 2200.0)); // 100 pts

        let comparison = compare_with_previous(&current, &previous);
        assert_eq!(comparison.worsened.len(), 1);
        assert_eq!(comparison.worsened[0].change, 100);
    }
}
