use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ApiError;

/// Parses a free-text meal message of the shape
/// `log <meal_type>: <item1>, <item2>, ...`.
///
/// The meal type comes back lowercased; item names keep their exact case so
/// catalog matching behaves the same as on the structured endpoint. All
/// further validation is the logging pipeline's job.
pub fn parse_meal_message(message: &str) -> Result<(String, Vec<String>), ApiError> {
    lazy_static! {
        static ref MESSAGE_RE: Regex = Regex::new(r"^log\s+([^:]+):\s*(.*)$").unwrap();
    }

    let message = message.trim();
    if !message.starts_with("log") {
        return Err(ApiError::InvalidFormat(
            "message must start with 'log'".to_string(),
        ));
    }
    if !message.contains(':') {
        return Err(ApiError::InvalidFormat(
            "missing ':' between meal type and food items".to_string(),
        ));
    }

    let caps = MESSAGE_RE.captures(message).ok_or_else(|| {
        ApiError::InvalidFormat("use: 'log <meal_type>: <item1>, <item2>'".to_string())
    })?;

    let meal_type = caps[1].trim().to_lowercase();
    let items: Vec<String> = caps[2]
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if items.is_empty() {
        return Err(ApiError::InvalidInput(
            "no food items in message".to_string(),
        ));
    }

    Ok((meal_type, items))
}
