pub mod classifier;
pub mod engine;
pub mod registry;
pub mod selector;
pub mod taxonomy;
pub mod text;

pub use crate::domain::model::{
    Classification, DoctorRecord, LoadReport, MatchQuery, MatchResult,
};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
