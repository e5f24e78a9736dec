use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Failed to load doctor registry from '{source_name}': {message}")]
    RegistryLoadError {
        source_name: String,
        message: String,
    },

    #[error("Taxonomy error: {message}")]
    TaxonomyError { message: String },

    #[error("Invalid constraint '{field}' = {value}: {reason}")]
    InvalidConstraint {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Configuration,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MatchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MatchError::IoError(_) => ErrorCategory::Io,
            MatchError::SerializationError(_)
            | MatchError::RegistryLoadError { .. } => ErrorCategory::Data,
            MatchError::TomlError(_)
            | MatchError::TaxonomyError { .. }
            | MatchError::ConfigValidationError { .. }
            | MatchError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            MatchError::InvalidConstraint { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            MatchError::InvalidConstraint { .. } => ErrorSeverity::Medium,
            MatchError::SerializationError(_)
            | MatchError::ConfigValidationError { .. }
            | MatchError::InvalidConfigValueError { .. }
            | MatchError::TomlError(_) => ErrorSeverity::High,
            // Startup cannot continue without registry and taxonomy.
            MatchError::IoError(_)
            | MatchError::RegistryLoadError { .. }
            | MatchError::TaxonomyError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MatchError::IoError(e) => format!("Could not read or write a file: {}", e),
            MatchError::SerializationError(e) => format!("Could not produce JSON output: {}", e),
            MatchError::TomlError(e) => format!("A TOML file could not be parsed: {}", e),
            MatchError::RegistryLoadError { source_name, message } => {
                format!("The doctor registry '{}' could not be loaded: {}", source_name, message)
            }
            MatchError::TaxonomyError { message } => {
                format!("The specialist taxonomy is invalid: {}", message)
            }
            MatchError::InvalidConstraint { field, reason, .. } => {
                format!("Search constraint '{}' is invalid: {}", field, reason)
            }
            MatchError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            MatchError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Io => "Check that the file path exists and is readable",
            ErrorCategory::Data => {
                "Check the registry header: Name, Specialist, Experience, Location, Contact, Rating"
            }
            ErrorCategory::Configuration => "Review the configuration file and command-line flags",
            ErrorCategory::Input => {
                "Use a non-negative minimum experience and a minimum rating between 0 and 5"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
