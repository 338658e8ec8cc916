//! Daily nutrition reference standards
//!
//! Immutable table mapping each nutrient to its reference daily value, unit,
//! and display name. Built once and injected into the assessor; a key absent
//! from a custom table degrades to a zero-valued placeholder instead of
//! failing the assessment.

use std::collections::BTreeMap;

use serde::Serialize;

use super::nutrients::NutrientKey;

/// Reference daily intake for one nutrient
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NutritionStandard {
    pub daily_value: f64,
    pub unit: &'static str,
    /// Localized display label
    pub name: &'static str,
}

/// Reference daily intake table for a standard adult diet
const DAILY_REFERENCE: [(NutrientKey, NutritionStandard); 29] = [
    (NutrientKey::Energy, NutritionStandard { daily_value: 2200.0, unit: "kcal", name: "能量" }),
    (NutrientKey::Protein, NutritionStandard { daily_value: 70.0, unit: "g", name: "蛋白质" }),
    (NutrientKey::Fat, NutritionStandard { daily_value: 60.0, unit: "g", name: "脂肪" }),
    (NutrientKey::TransFat, NutritionStandard { daily_value: 2.0, unit: "g", name: "反式脂肪酸" }),
    (NutrientKey::SaturatedFat, NutritionStandard { daily_value: 22.0, unit: "g", name: "饱和脂肪" }),
    (NutrientKey::Carbohydrate, NutritionStandard { daily_value: 300.0, unit: "g", name: "碳水" }),
    (NutrientKey::AddedSugar, NutritionStandard { daily_value: 50.0, unit: "g", name: "添加糖" }),
    (NutrientKey::Salt, NutritionStandard { daily_value: 5.0, unit: "g", name: "食盐" }),
    (NutrientKey::DietaryFiber, NutritionStandard { daily_value: 25.0, unit: "g", name: "膳食纤维" }),
    (NutrientKey::VitaminA, NutritionStandard { daily_value: 800.0, unit: "μg", name: "维生素A" }),
    (NutrientKey::VitaminC, NutritionStandard { daily_value: 100.0, unit: "mg", name: "维生素C" }),
    (NutrientKey::VitaminD, NutritionStandard { daily_value: 10.0, unit: "μg", name: "维生素D" }),
    (NutrientKey::VitaminE, NutritionStandard { daily_value: 14.0, unit: "mg", name: "维生素E" }),
    (NutrientKey::VitaminK, NutritionStandard { daily_value: 80.0, unit: "μg", name: "维生素K" }),
    (NutrientKey::VitaminB1, NutritionStandard { daily_value: 1.4, unit: "mg", name: "维生素B1" }),
    (NutrientKey::VitaminB2, NutritionStandard { daily_value: 1.4, unit: "mg", name: "维生素B2" }),
    (NutrientKey::VitaminB6, NutritionStandard { daily_value: 1.4, unit: "mg", name: "维生素B6" }),
    (NutrientKey::VitaminB12, NutritionStandard { daily_value: 2.4, unit: "μg", name: "维生素B12" }),
    (NutrientKey::Niacin, NutritionStandard { daily_value: 15.0, unit: "mg", name: "烟酸" }),
    (NutrientKey::Folate, NutritionStandard { daily_value: 400.0, unit: "μg", name: "叶酸" }),
    (NutrientKey::Calcium, NutritionStandard { daily_value: 800.0, unit: "mg", name: "钙" }),
    (NutrientKey::Iron, NutritionStandard { daily_value: 12.0, unit: "mg", name: "铁" }),
    (NutrientKey::Zinc, NutritionStandard { daily_value: 12.5, unit: "mg", name: "锌" }),
    (NutrientKey::Magnesium, NutritionStandard { daily_value: 330.0, unit: "mg", name: "镁" }),
    (NutrientKey::Potassium, NutritionStandard { daily_value: 2000.0, unit: "mg", name: "钾" }),
    (NutrientKey::Sodium, NutritionStandard { daily_value: 1500.0, unit: "mg", name: "钠" }),
    (NutrientKey::Phosphorus, NutritionStandard { daily_value: 720.0, unit: "mg", name: "磷" }),
    (NutrientKey::Iodine, NutritionStandard { daily_value: 120.0, unit: "μg", name: "碘" }),
    (NutrientKey::Selenium, NutritionStandard { daily_value: 60.0, unit: "μg", name: "硒" }),
];

/// Immutable per-nutrient standards table
#[derive(Debug, Clone)]
pub struct NutritionStandards {
    entries: BTreeMap<NutrientKey, NutritionStandard>,
}

impl NutritionStandards {
    /// Build a table from explicit entries
    pub fn new(entries: BTreeMap<NutrientKey, NutritionStandard>) -> Self {
        Self { entries }
    }

    /// The built-in adult daily reference table
    pub fn daily_reference() -> Self {
        Self {
            entries: DAILY_REFERENCE.into_iter().collect(),
        }
    }

    /// Look up the standard for a nutrient
    pub fn get(&self, key: NutrientKey) -> Option<&NutritionStandard> {
        self.entries.get(&key)
    }

    /// Look up a standard, degrading to a zero placeholder when absent.
    ///
    /// The placeholder uses the wire name as display name, an empty unit,
    /// and a zero daily value, which classifies as a zero percentage
    /// downstream rather than failing the call.
    pub fn resolve(&self, key: NutrientKey) -> NutritionStandard {
        self.entries.get(&key).copied().unwrap_or_else(|| {
            tracing::warn!("No daily standard for '{}'. Reporting zero percentage.", key);
            NutritionStandard {
                daily_value: 0.0,
                unit: "",
                name: key.as_str(),
            }
        })
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&NutrientKey, &NutritionStandard)> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for NutritionStandards {
    fn default() -> Self {
        Self::daily_reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_reference_covers_all_keys() {
        let standards = NutritionStandards::daily_reference();
        assert_eq!(standards.len(), NutrientKey::ALL.len());
        for key in NutrientKey::ALL {
            assert!(standards.get(key).is_some(), "missing standard for {}", key);
        }
    }

    #[test]
    fn test_core_values() {
        let standards = NutritionStandards::daily_reference();
        let energy = standards.get(NutrientKey::Energy).unwrap();
        assert_eq!(energy.daily_value, 2200.0);
        assert_eq!(energy.unit, "kcal");
        assert_eq!(energy.name, "能量");

        let salt = standards.get(NutrientKey::Salt).unwrap();
        assert_eq!(salt.daily_value, 5.0);
        assert_eq!(salt.unit, "g");
    }

    #[test]
    fn test_resolve_missing_key_degrades() {
        let mut entries = BTreeMap::new();
        entries.insert(
            NutrientKey::Protein,
            NutritionStandard { daily_value: 70.0, unit: "g", name: "蛋白质" },
        );
        let standards = NutritionStandards::new(entries);

        let fallback = standards.resolve(NutrientKey::Iron);
        assert_eq!(fallback.daily_value, 0.0);
        assert_eq!(fallback.unit, "");
        assert_eq!(fallback.name, "iron");

        let present = standards.resolve(NutrientKey::Protein);
        assert_eq!(present.daily_value, 70.0);
    }
}
