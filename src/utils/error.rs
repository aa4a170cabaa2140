use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccessError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Duplicate entry in {field}: '{value}'")]
    DuplicateEntryError { field: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Parse,
    Configuration,
}

impl AccessError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AccessError::IoError(_) => ErrorCategory::Io,
            AccessError::TomlError(_) => ErrorCategory::Parse,
            AccessError::MissingConfigError { .. }
            | AccessError::InvalidConfigValueError { .. }
            | AccessError::DuplicateEntryError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            AccessError::IoError(_) => {
                "Check that the policy file exists and is readable".to_string()
            }
            AccessError::TomlError(_) => {
                "Fix the TOML syntax; [[modules]] entries need id, title and path".to_string()
            }
            AccessError::MissingConfigError { field } => {
                format!("Add a value for '{}' to the policy file", field)
            }
            AccessError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}'", field)
            }
            AccessError::DuplicateEntryError { field, value } => {
                format!(
                    "Remove one of the '{}' entries in '{}' (keys are compared trimmed and lowercase)",
                    value, field
                )
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("Could not read the access policy: {}", self),
            ErrorCategory::Parse => format!("The access policy could not be parsed: {}", self),
            ErrorCategory::Configuration => format!("The access policy is invalid: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AccessError>;
