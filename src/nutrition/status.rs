//! Nutrition status bands and classification
//!
//! Maps intake percentages to one of four status bands and carries the
//! display metadata (level, labels, colors, recommendation text) for each band.

use serde::{Deserialize, Serialize};

// ============================================================================
// Classification Thresholds (percent of daily reference value)
// ============================================================================

/// Below this percentage the intake is deficient
pub const DEFICIENT_BELOW: f64 = 60.0;
/// Below this percentage (and at/above DEFICIENT_BELOW) the intake is insufficient
pub const INSUFFICIENT_BELOW: f64 = 80.0;
/// Above this percentage the intake is excessive
pub const EXCESSIVE_ABOVE: f64 = 120.0;

/// Nutrition status band for a single nutrient
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutritionStatus {
    /// Severe under-intake (< 60%)
    Deficient,
    /// Mild under-intake (60% - <80%)
    Insufficient,
    /// Target band (80% - 120% inclusive)
    Adequate,
    /// Over-intake (> 120%)
    Excessive,
}

impl NutritionStatus {
    /// All bands in level order
    pub const ALL: [NutritionStatus; 4] = [
        NutritionStatus::Deficient,
        NutritionStatus::Insufficient,
        NutritionStatus::Adequate,
        NutritionStatus::Excessive,
    ];

    /// Wire name used in serialized reports
    pub fn as_str(&self) -> &'static str {
        match self {
            NutritionStatus::Deficient => "deficient",
            NutritionStatus::Insufficient => "insufficient",
            NutritionStatus::Adequate => "adequate",
            NutritionStatus::Excessive => "excessive",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "deficient" => Some(NutritionStatus::Deficient),
            "insufficient" => Some(NutritionStatus::Insufficient),
            "adequate" => Some(NutritionStatus::Adequate),
            "excessive" => Some(NutritionStatus::Excessive),
            _ => None,
        }
    }

    /// Display metadata for this band
    pub fn level(&self) -> StatusLevel {
        match self {
            NutritionStatus::Deficient => StatusLevel {
                level: 1,
                name: "缺乏",
                severity: Severity::High,
                description: "营养素严重不足，需要立即补充",
                recommendation: "建议增加富含该营养素的食物摄入，或考虑营养补充剂",
            },
            NutritionStatus::Insufficient => StatusLevel {
                level: 2,
                name: "不足",
                severity: Severity::Medium,
                description: "营养素摄入偏低，需要注意",
                recommendation: "建议适当增加该营养素的食物摄入",
            },
            NutritionStatus::Adequate => StatusLevel {
                level: 3,
                name: "适宜",
                severity: Severity::Low,
                description: "营养素摄入量符合推荐标准",
                recommendation: "继续保持当前的饮食习惯",
            },
            NutritionStatus::Excessive => StatusLevel {
                level: 4,
                name: "过量",
                severity: Severity::High,
                description: "营养素摄入过多，可能对健康造成影响",
                recommendation: "建议减少该营养素的摄入，避免过量",
            },
        }
    }

    /// Badge color triple for this band
    pub fn color(&self) -> StatusColor {
        match self {
            NutritionStatus::Deficient => StatusColor {
                bg: "#fee2e2",
                text: "#dc2626",
                border: "#ef4444",
                name: "缺乏",
            },
            NutritionStatus::Insufficient => StatusColor {
                bg: "#fef3c7",
                text: "#d97706",
                border: "#f59e0b",
                name: "不足",
            },
            NutritionStatus::Adequate => StatusColor {
                bg: "#d1fae5",
                text: "#059669",
                border: "#10b981",
                name: "适宜",
            },
            NutritionStatus::Excessive => StatusColor {
                bg: "#dbeafe",
                text: "#2563eb",
                border: "#3b82f6",
                name: "过量",
            },
        }
    }
}

/// Severity tag attached to a status band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// Display metadata for a status band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusLevel {
    pub level: u8,
    pub name: &'static str,
    pub severity: Severity,
    pub description: &'static str,
    pub recommendation: &'static str,
}

/// Badge colors (hex) for rendering a status band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusColor {
    pub bg: &'static str,
    pub text: &'static str,
    pub border: &'static str,
    pub name: &'static str,
}

/// Classify an intake percentage into a status band.
///
/// Boundaries are inclusive on the lower side: exactly 60 is insufficient,
/// exactly 80 and exactly 120 are adequate.
pub fn evaluate_nutrition_status(percentage: f64) -> NutritionStatus {
    if percentage < DEFICIENT_BELOW {
        NutritionStatus::Deficient
    } else if percentage < INSUFFICIENT_BELOW {
        NutritionStatus::Insufficient
    } else if percentage <= EXCESSIVE_ABOVE {
        NutritionStatus::Adequate
    } else {
        NutritionStatus::Excessive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_boundaries() {
        assert_eq!(evaluate_nutrition_status(59.9), NutritionStatus::Deficient);
        assert_eq!(evaluate_nutrition_status(60.0), NutritionStatus::Insufficient);
        assert_eq!(evaluate_nutrition_status(79.9), NutritionStatus::Insufficient);
        assert_eq!(evaluate_nutrition_status(80.0), NutritionStatus::Adequate);
        assert_eq!(evaluate_nutrition_status(120.0), NutritionStatus::Adequate);
        assert_eq!(evaluate_nutrition_status(120.1), NutritionStatus::Excessive);
    }

    #[test]
    fn test_status_extremes() {
        assert_eq!(evaluate_nutrition_status(0.0), NutritionStatus::Deficient);
        assert_eq!(evaluate_nutrition_status(100.0), NutritionStatus::Adequate);
        assert_eq!(evaluate_nutrition_status(500.0), NutritionStatus::Excessive);
    }

    #[test]
    fn test_status_str_round_trip() {
        for status in NutritionStatus::ALL {
            assert_eq!(NutritionStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(NutritionStatus::from_str("bogus"), None);
    }

    #[test]
    fn test_level_metadata() {
        let deficient = NutritionStatus::Deficient.level();
        assert_eq!(deficient.level, 1);
        assert_eq!(deficient.name, "缺乏");
        assert_eq!(deficient.severity, Severity::High);

        let adequate = NutritionStatus::Adequate.level();
        assert_eq!(adequate.level, 3);
        assert_eq!(adequate.severity, Severity::Low);
    }

    #[test]
    fn test_color_triples() {
        let color = NutritionStatus::Insufficient.color();
        assert_eq!(color.bg, "#fef3c7");
        assert_eq!(color.text, "#d97706");
        assert_eq!(color.border, "#f59e0b");
        assert_eq!(color.name, "不足");
    }
}
