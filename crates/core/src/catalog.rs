//! Service and station catalogue validation.
//!
//! Services are the billable offerings (matrix rows); stations are the work
//! locations a service can be performed at (matrix columns). These checks
//! run before a create/update reaches the repository layer.

use crate::error::CoreError;

/// Maximum length of a service or station name.
pub const MAX_NAME_LEN: usize = 120;

/// Maximum length of a service description.
pub const MAX_DESCRIPTION_LEN: usize = 2_000;

fn validate_name(kind: &str, name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!(
            "{kind} name must not be empty"
        )));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "{kind} name must not exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a service name: non-blank, at most [`MAX_NAME_LEN`] characters.
pub fn validate_service_name(name: &str) -> Result<(), CoreError> {
    validate_name("Service", name)
}

/// Validate a station name: non-blank, at most [`MAX_NAME_LEN`] characters.
pub fn validate_station_name(name: &str) -> Result<(), CoreError> {
    validate_name("Station", name)
}

/// Base prices are whole currency amounts and may not be negative.
pub fn validate_base_price(base_price: i32) -> Result<(), CoreError> {
    if base_price < 0 {
        return Err(CoreError::Validation(format!(
            "base_price must be non-negative, got {base_price}"
        )));
    }
    Ok(())
}

pub fn validate_description(description: Option<&str>) -> Result<(), CoreError> {
    match description {
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LEN => Err(CoreError::Validation(
            format!("description must not exceed {MAX_DESCRIPTION_LEN} characters"),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected() {
        assert!(validate_service_name("").is_err());
        assert!(validate_service_name("   ").is_err());
        assert!(validate_station_name("\t").is_err());
    }

    #[test]
    fn long_names_are_rejected() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        let msg = validate_station_name(&long).unwrap_err().to_string();
        assert!(msg.contains("Station"));
        assert!(validate_service_name(&"y".repeat(MAX_NAME_LEN)).is_ok());
    }

    #[test]
    fn negative_base_price_is_rejected() {
        assert!(validate_base_price(-1).is_err());
        assert!(validate_base_price(0).is_ok());
        assert!(validate_base_price(4500).is_ok());
    }

    #[test]
    fn description_length_is_bounded() {
        assert!(validate_description(None).is_ok());
        assert!(validate_description(Some("Wash and dry")).is_ok());
        assert!(validate_description(Some(&"d".repeat(MAX_DESCRIPTION_LEN + 1))).is_err());
    }
}
