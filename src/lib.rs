pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{AnnotateCliConfig, CliConfig};

pub use adapters::XlsxStorage;
pub use app::pipelines::{AnnotatePipeline, BirthdayPipeline};
pub use config::{AnnotateSettings, BirthdaySettings, TomlConfig};
pub use crate::core::extractor::{extract_birthday, Extraction, ExtractionWarning};
pub use crate::core::{etl::EtlEngine, RunSummary};
pub use utils::error::{EtlError, Result};
