pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::toml_config::{DefaultsConfig, LogFormat, MatchConfig, TaxonomyConfig};
#[cfg(feature = "cli")]
use crate::core::{ConfigProvider, MatchQuery};
#[cfg(feature = "cli")]
use crate::domain::model::{MAX_RATING, MIN_RATING};
#[cfg(feature = "cli")]
use crate::utils::error::{MatchError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "docwise-match")]
#[command(about = "Recommend a medical specialist for symptoms and rank matching doctors")]
pub struct CliConfig {
    /// Symptoms or diagnosis, e.g. "diabetes, headache, fever"
    pub symptoms: String,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Doctor registry CSV (overrides the config file)
    #[arg(long)]
    pub registry: Option<String>,

    /// Taxonomy TOML (overrides the config file; built-in taxonomy when unset)
    #[arg(long)]
    pub taxonomy: Option<String>,

    /// Preferred location, matched as a case-insensitive substring
    #[arg(short, long)]
    pub location: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub min_experience: Option<i64>,

    #[arg(long, allow_negative_numbers = true)]
    pub min_rating: Option<f64>,

    /// Show at most this many doctors
    #[arg(long)]
    pub top: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Also write the JSON report to this file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Print the trigger that decided the specialist
    #[arg(long)]
    pub explain: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn resolve(&self) -> Result<MatchConfig> {
        let mut config = match &self.config {
            Some(path) => MatchConfig::from_file(path)?,
            None => MatchConfig::default(),
        };

        if let Some(registry) = &self.registry {
            config.registry.path = registry.clone();
        }
        if let Some(taxonomy) = &self.taxonomy {
            config.taxonomy = Some(TaxonomyConfig {
                path: taxonomy.clone(),
            });
        }

        let defaults = config.defaults.get_or_insert_with(DefaultsConfig::default);
        if let Some(years) = self.min_experience {
            defaults.min_experience = Some(years);
        }
        if let Some(rating) = self.min_rating {
            defaults.min_rating = Some(rating);
        }
        if let Some(top) = self.top {
            defaults.limit = Some(top);
        }
        if self.json_logs {
            config.logging.get_or_insert_with(Default::default).format = Some(LogFormat::Json);
        }

        Ok(config)
    }

    pub fn query(&self, config: &MatchConfig) -> MatchQuery {
        let mut query = MatchQuery::new(self.symptoms.clone())
            .with_min_experience(config.min_experience())
            .with_min_rating(config.min_rating());
        if let Some(location) = &self.location {
            query = query.with_location(location.clone());
        }
        if let Some(limit) = config.limit() {
            query = query.with_limit(limit);
        }
        query
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("symptoms", &self.symptoms)?;

        if let Some(years) = self.min_experience {
            if years < 0 {
                return Err(MatchError::InvalidConstraint {
                    field: "min_experience".to_string(),
                    value: years.to_string(),
                    reason: "must not be negative".to_string(),
                });
            }
        }
        if let Some(rating) = self.min_rating {
            validation::validate_constraint("min_rating", rating, MIN_RATING, MAX_RATING)?;
        }
        if let Some(top) = self.top {
            validation::validate_range("top", top, 1, usize::MAX)?;
        }
        if let Some(output) = &self.output {
            validation::validate_path("output", output)?;
        }

        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliConfig {
        CliConfig::try_parse_from(std::iter::once("docwise-match").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults_without_config_file() {
        let cli = parse(&["headache"]);
        assert!(cli.validate().is_ok());

        let config = cli.resolve().unwrap();
        assert_eq!(config.registry_path(), toml_config::DEFAULT_REGISTRY_PATH);
        assert_eq!(config.taxonomy_path(), None);

        let query = cli.query(&config);
        assert_eq!(query.raw_text, "headache");
        assert_eq!(query.min_experience, 2);
        assert_eq!(query.min_rating, 3.5);
        assert_eq!(query.location, None);
        assert_eq!(query.limit, None);
    }

    #[test]
    fn test_flags_override_values() {
        let cli = parse(&[
            "chest pain",
            "--registry",
            "other.csv",
            "--taxonomy",
            "tax.toml",
            "--location",
            "Chen",
            "--min-experience",
            "4",
            "--min-rating",
            "4.2",
            "--top",
            "3",
            "--format",
            "json",
            "--json-logs",
        ]);
        assert!(cli.validate().is_ok());
        assert_eq!(cli.format, OutputFormat::Json);

        let config = cli.resolve().unwrap();
        assert_eq!(config.registry_path(), "other.csv");
        assert_eq!(config.taxonomy_path(), Some("tax.toml"));
        assert_eq!(config.log_format(), LogFormat::Json);

        let query = cli.query(&config);
        assert_eq!(query.location.as_deref(), Some("Chen"));
        assert_eq!(query.min_experience, 4);
        assert_eq!(query.min_rating, 4.2);
        assert_eq!(query.limit, Some(3));
    }

    #[test]
    fn test_invalid_constraints_are_rejected() {
        let negative = parse(&["fever", "--min-experience", "-1"]);
        assert!(matches!(
            negative.validate(),
            Err(MatchError::InvalidConstraint { .. })
        ));

        let rating = parse(&["fever", "--min-rating", "9"]);
        assert!(matches!(
            rating.validate(),
            Err(MatchError::InvalidConstraint { .. })
        ));

        let blank = parse(&["   "]);
        assert!(blank.validate().is_err());
    }
}
