use crate::core::ConfigProvider;
use crate::domain::model::{DEFAULT_MIN_EXPERIENCE, DEFAULT_MIN_RATING, MAX_RATING, MIN_RATING};
use crate::utils::error::{MatchError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_REGISTRY_PATH: &str = "data/doctors.csv";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    #[serde(default)]
    pub registry: RegistryConfig,
    pub taxonomy: Option<TaxonomyConfig>,
    pub defaults: Option<DefaultsConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub path: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_REGISTRY_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    pub path: String,
}

/// Signed on purpose: a negative value is reported, not a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub min_experience: Option<i64>,
    pub min_rating: Option<f64>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: Option<LogFormat>,
}

impl MatchConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MatchError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MatchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MatchError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("registry.path", &self.registry.path)?;
        validation::validate_file_extension("registry.path", &self.registry.path, &["csv"])?;

        if let Some(taxonomy) = &self.taxonomy {
            validation::validate_path("taxonomy.path", &taxonomy.path)?;
            validation::validate_file_extension("taxonomy.path", &taxonomy.path, &["toml"])?;
        }

        if let Some(defaults) = &self.defaults {
            if let Some(years) = defaults.min_experience {
                validation::validate_range(
                    "defaults.min_experience",
                    years,
                    0,
                    i64::from(u32::MAX),
                )?;
            }
            if let Some(rating) = defaults.min_rating {
                validation::validate_range("defaults.min_rating", rating, MIN_RATING, MAX_RATING)?;
            }
            if let Some(limit) = defaults.limit {
                validation::validate_range("defaults.limit", limit, 1, usize::MAX)?;
            }
        }

        Ok(())
    }

    pub fn log_format(&self) -> LogFormat {
        self.logging
            .as_ref()
            .and_then(|l| l.format)
            .unwrap_or_default()
    }
}

impl ConfigProvider for MatchConfig {
    fn registry_path(&self) -> &str {
        &self.registry.path
    }

    fn taxonomy_path(&self) -> Option<&str> {
        self.taxonomy.as_ref().map(|t| t.path.as_str())
    }

    fn min_experience(&self) -> u32 {
        self.defaults
            .as_ref()
            .and_then(|d| d.min_experience)
            .and_then(|years| u32::try_from(years).ok())
            .unwrap_or(DEFAULT_MIN_EXPERIENCE)
    }

    fn min_rating(&self) -> f64 {
        self.defaults
            .as_ref()
            .and_then(|d| d.min_rating)
            .unwrap_or(DEFAULT_MIN_RATING)
    }

    fn limit(&self) -> Option<usize> {
        self.defaults.as_ref().and_then(|d| d.limit)
    }
}

impl Validate for MatchConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[registry]
path = "registry/doctors.csv"

[taxonomy]
path = "registry/taxonomy.toml"

[defaults]
min_experience = 5
min_rating = 4.0
limit = 3

[logging]
format = "json"
"#;

        let config = MatchConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.registry_path(), "registry/doctors.csv");
        assert_eq!(config.taxonomy_path(), Some("registry/taxonomy.toml"));
        assert_eq!(config.min_experience(), 5);
        assert_eq!(config.min_rating(), 4.0);
        assert_eq!(config.limit(), Some(3));
        assert_eq!(config.log_format(), LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = MatchConfig::from_toml_str("").unwrap();
        assert_eq!(config.registry_path(), DEFAULT_REGISTRY_PATH);
        assert_eq!(config.taxonomy_path(), None);
        assert_eq!(config.min_experience(), DEFAULT_MIN_EXPERIENCE);
        assert_eq!(config.min_rating(), DEFAULT_MIN_RATING);
        assert_eq!(config.limit(), None);
        assert_eq!(config.log_format(), LogFormat::Compact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("DOCWISE_TEST_REGISTRY", "/srv/docwise/doctors.csv");

        let toml_content = r#"
[registry]
path = "${DOCWISE_TEST_REGISTRY}"
"#;

        let config = MatchConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.registry.path, "/srv/docwise/doctors.csv");

        std::env::remove_var("DOCWISE_TEST_REGISTRY");
    }

    #[test]
    fn test_config_validation() {
        let negative = MatchConfig::from_toml_str("[defaults]\nmin_experience = -1\n").unwrap();
        assert!(negative.validate().is_err());

        let rating = MatchConfig::from_toml_str("[defaults]\nmin_rating = 7.5\n").unwrap();
        assert!(rating.validate().is_err());

        let registry = MatchConfig::from_toml_str("[registry]\npath = \"doctors.xlsx\"\n").unwrap();
        assert!(registry.validate().is_err());

        let limit = MatchConfig::from_toml_str("[defaults]\nlimit = 0\n").unwrap();
        assert!(limit.validate().is_err());
    }

    #[test]
    fn test_unknown_log_format_is_a_parse_error() {
        let err = MatchConfig::from_toml_str("[logging]\nformat = \"xml\"\n").unwrap_err();
        assert!(matches!(err, MatchError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        temp_file
            .write_all(b"[registry]\npath = \"from-file.csv\"\n")
            .unwrap();

        let config = MatchConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.registry_path(), "from-file.csv");
    }
}
