pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::MatchConfig};

pub use crate::core::{
    classifier::SpecialistClassifier,
    engine::MatchEngine,
    registry::{DoctorRegistry, SharedRegistry},
    selector::{select, SelectionCriteria},
    taxonomy::SpecialistTaxonomy,
};
pub use domain::model::{Classification, DoctorRecord, MatchQuery, MatchResult};
pub use utils::error::{MatchError, Result};
