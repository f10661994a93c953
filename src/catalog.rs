use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Nutrition facts for one food item, and the unit meal totals are summed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fiber_g: f64,
}

impl Nutrition {
    pub const fn new(calories: f64, protein_g: f64, carbs_g: f64, fiber_g: f64) -> Self {
        Self { calories, protein_g, carbs_g, fiber_g }
    }

    /// Field-wise accumulation; no unit conversion.
    pub fn add(&mut self, other: &Nutrition) {
        self.calories += other.calories;
        self.protein_g += other.protein_g;
        self.carbs_g += other.carbs_g;
        self.fiber_g += other.fiber_g;
    }

    /// Totals rounded to 2 decimals for report output.
    pub fn rounded(&self) -> Self {
        Self {
            calories: round2(self.calories),
            protein_g: round2(self.protein_g),
            carbs_g: round2(self.carbs_g),
            fiber_g: round2(self.fiber_g),
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Static food name → nutrition lookup table. Defined once at startup,
/// never mutated; lookups are case-sensitive exact matches.
#[derive(Debug, Clone, Serialize)]
pub struct FoodCatalog {
    items: BTreeMap<String, Nutrition>,
}

impl FoodCatalog {
    pub fn builtin() -> Self {
        let entries = [
            ("Jeera Rice", Nutrition::new(250.0, 5.0, 45.0, 2.0)),
            ("Dal", Nutrition::new(180.0, 12.0, 20.0, 5.0)),
            ("Cucumber", Nutrition::new(16.0, 1.0, 4.0, 1.0)),
            ("Roti", Nutrition::new(120.0, 3.0, 25.0, 3.0)),
            ("Chicken Curry", Nutrition::new(300.0, 25.0, 8.0, 1.0)),
            ("Paneer", Nutrition::new(265.0, 18.0, 6.0, 0.0)),
            ("Salad", Nutrition::new(25.0, 2.0, 5.0, 3.0)),
            ("Rice", Nutrition::new(205.0, 4.0, 45.0, 1.0)),
        ];
        Self {
            items: entries
                .into_iter()
                .map(|(name, n)| (name.to_string(), n))
                .collect(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Nutrition> {
        self.items.get(name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &BTreeMap<String, Nutrition> {
        &self.items
    }
}
