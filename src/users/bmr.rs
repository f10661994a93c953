use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Parses user input, lowercased first. Anything but male/female is a
    /// validation failure upstream.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }
}

/// Basal metabolic rate, Harris-Benedict (revised) formula.
/// Pure arithmetic; callers validate ranges before getting here.
pub fn compute_bmr(gender: Gender, weight_kg: f64, height_cm: f64, age_years: f64) -> f64 {
    match gender {
        Gender::Male => 88.362 + (13.397 * weight_kg) + (4.799 * height_cm) - (5.677 * age_years),
        Gender::Female => 447.593 + (9.247 * weight_kg) + (3.098 * height_cm) - (4.33 * age_years),
    }
}
