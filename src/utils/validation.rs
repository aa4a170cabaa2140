use crate::utils::error::{AccessError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AccessError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_route(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(AccessError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Route cannot be empty".to_string(),
        });
    }

    if !path.starts_with('/') {
        return Err(AccessError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Route must start with '/'".to_string(),
        });
    }

    if path.chars().any(char::is_whitespace) {
        return Err(AccessError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Route cannot contain whitespace".to_string(),
        });
    }

    Ok(())
}

/// Module slugs: lowercase ascii letters, digits and '-'.
pub fn validate_slug(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;

    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
    {
        return Err(AccessError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Unsupported character '{}' in slug", bad),
        });
    }
    Ok(())
}
