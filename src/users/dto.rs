use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::users::bmr::Gender;
use crate::users::repo::UserProfile;

/// Raw registration body. Fields stay optional so every missing or
/// out-of-range field can be reported by name in one response.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub age: Option<f64>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub gender: Option<String>,
    pub goal: Option<String>,
}

/// Validated registration input, ready for BMR derivation.
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub age: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub gender: Gender,
    pub goal: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<NewUser, ApiError> {
        let mut errors = Vec::new();

        let name = match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Some(name.to_string()),
            _ => {
                errors.push("name is required".to_string());
                None
            }
        };

        let age = match self.age {
            Some(age) if age.fract() == 0.0 && (1.0..=150.0).contains(&age) => Some(age as u32),
            Some(_) => {
                errors.push("age must be a whole number between 1 and 150".to_string());
                None
            }
            None => {
                errors.push("age is required".to_string());
                None
            }
        };

        let weight_kg = match self.weight {
            Some(w) if w > 0.0 && w <= 500.0 => Some(w),
            Some(_) => {
                errors.push("weight must be between 1 and 500 kg".to_string());
                None
            }
            None => {
                errors.push("weight is required".to_string());
                None
            }
        };

        let height_cm = match self.height {
            Some(h) if h > 0.0 && h <= 300.0 => Some(h),
            Some(_) => {
                errors.push("height must be between 1 and 300 cm".to_string());
                None
            }
            None => {
                errors.push("height is required".to_string());
                None
            }
        };

        let gender = match self.gender.as_deref() {
            Some(g) => match Gender::parse(g) {
                Some(g) => Some(g),
                None => {
                    errors.push("gender must be 'male' or 'female'".to_string());
                    None
                }
            },
            None => {
                errors.push("gender is required".to_string());
                None
            }
        };

        let goal = match self.goal.as_deref().map(str::trim) {
            Some(goal) if !goal.is_empty() => Some(goal.to_string()),
            _ => {
                errors.push("goal is required".to_string());
                None
            }
        };

        match (name, age, weight_kg, height_cm, gender, goal) {
            (Some(name), Some(age), Some(weight_kg), Some(height_cm), Some(gender), Some(goal))
                if errors.is_empty() =>
            {
                Ok(NewUser { name, age, weight_kg, height_cm, gender, goal })
            }
            _ => Err(ApiError::InvalidInput(errors.join("; "))),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisteredResponse {
    pub message: String,
    pub user: UserProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> RegisterRequest {
        RegisterRequest {
            name: Some("ravi".into()),
            age: Some(25.0),
            weight: Some(70.0),
            height: Some(175.0),
            gender: Some("male".into()),
            goal: Some("maintain".into()),
        }
    }

    #[test]
    fn valid_request_passes() {
        let new_user = full_request().validate().expect("valid");
        assert_eq!(new_user.name, "ravi");
        assert_eq!(new_user.age, 25);
        assert_eq!(new_user.gender, Gender::Male);
    }

    #[test]
    fn missing_fields_are_each_named() {
        let req = RegisterRequest {
            name: None,
            age: None,
            weight: Some(70.0),
            height: Some(175.0),
            gender: Some("female".into()),
            goal: None,
        };
        let err = req.validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("name is required"));
        assert!(msg.contains("age is required"));
        assert!(msg.contains("goal is required"));
        assert!(!msg.contains("weight"));
    }

    #[test]
    fn out_of_range_fields_are_rejected() {
        let mut req = full_request();
        req.age = Some(151.0);
        assert!(req.validate().unwrap_err().to_string().contains("age"));

        let mut req = full_request();
        req.age = Some(25.5);
        assert!(req.validate().unwrap_err().to_string().contains("age"));

        let mut req = full_request();
        req.weight = Some(0.0);
        assert!(req.validate().unwrap_err().to_string().contains("weight"));

        let mut req = full_request();
        req.weight = Some(500.5);
        assert!(req.validate().unwrap_err().to_string().contains("weight"));

        let mut req = full_request();
        req.height = Some(301.0);
        assert!(req.validate().unwrap_err().to_string().contains("height"));

        let mut req = full_request();
        req.gender = Some("unknown".into());
        assert!(req.validate().unwrap_err().to_string().contains("gender"));
    }

    #[test]
    fn unknown_fields_are_rejected_by_serde() {
        let raw = r#"{"name":"ravi","age":25,"weight":70,"height":175,
                      "gender":"male","goal":"maintain","extra":1}"#;
        assert!(serde_json::from_str::<RegisterRequest>(raw).is_err());
    }
}
