#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::model::ColumnMapping;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_column, validate_non_empty_string, validate_positive_number, Validate,
};
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
use crate::adapters::xlsx_store::READABLE_EXTENSIONS;
#[cfg(feature = "cli")]
use crate::utils::logger::LogFormat;
#[cfg(feature = "cli")]
use crate::utils::validation::validate_file_extensions;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

pub use toml_config::TomlConfig;

pub const DEFAULT_OUTPUT_SUFFIX: &str = "_with_birthday";
pub const DEFAULT_OUTPUT_DIR: &str = "./output";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BirthdaySettings {
    pub columns: ColumnMapping,
    pub header_rows: usize,
    pub output_suffix: String,
    pub progress_interval: usize,
}

impl Default for BirthdaySettings {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            header_rows: 1,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            progress_interval: 100,
        }
    }
}

impl ConfigProvider for BirthdaySettings {
    fn column_mapping(&self) -> &ColumnMapping {
        &self.columns
    }

    fn header_rows(&self) -> usize {
        self.header_rows
    }

    fn output_suffix(&self) -> &str {
        &self.output_suffix
    }

    fn progress_interval(&self) -> usize {
        self.progress_interval
    }
}

impl Validate for BirthdaySettings {
    fn validate(&self) -> Result<()> {
        validate_column("birthday.columns.input", &self.columns.input)?;
        validate_column("birthday.columns.output", &self.columns.output)?;
        validate_non_empty_string("birthday.output_suffix", &self.output_suffix)?;
        validate_positive_number("birthday.progress_interval", self.progress_interval, 1)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotateSettings {
    /// 刪除標題列
    pub drop_first_row: bool,
    pub counter_column: String,
    pub counter_header: String,
    pub counter_source_column: String,
    pub status_check_column: String,
    pub status_column: String,
    pub status_text: String,
    pub excluded_files: Vec<String>,
}

impl Default for AnnotateSettings {
    fn default() -> Self {
        Self {
            drop_first_row: true,
            counter_column: "W".to_string(),
            counter_header: "计数用".to_string(),
            counter_source_column: "N".to_string(),
            status_check_column: "P".to_string(),
            status_column: "Q".to_string(),
            status_text: "一直离线".to_string(),
            excluded_files: vec!["00汇总表.xlsx".to_string()],
        }
    }
}

impl Validate for AnnotateSettings {
    fn validate(&self) -> Result<()> {
        validate_column("annotate.counter_column", &self.counter_column)?;
        validate_column("annotate.counter_source_column", &self.counter_source_column)?;
        validate_column("annotate.status_check_column", &self.status_check_column)?;
        validate_column("annotate.status_column", &self.status_column)?;
        validate_non_empty_string("annotate.counter_header", &self.counter_header)?;
        validate_non_empty_string("annotate.status_text", &self.status_text)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "sheet-etl")]
#[command(about = "Extract birth dates from ID numbers in Excel workbooks")]
pub struct CliConfig {
    /// Workbooks to process; prompts interactively when omitted
    #[arg(short = 'i', long = "input")]
    pub inputs: Vec<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Column holding the ID number (default D)
    #[arg(long)]
    pub id_column: Option<String>,

    /// Column receiving the birth date (default I)
    #[arg(long)]
    pub birthday_column: Option<String>,

    /// Number of header rows to leave untouched (default 1)
    #[arg(long)]
    pub header_rows: Option<usize>,

    /// Suffix appended to the output file stem (default _with_birthday)
    #[arg(long)]
    pub output_suffix: Option<String>,

    /// Write skipped-row diagnostics to this CSV file
    #[arg(long)]
    pub diagnostics: Option<PathBuf>,

    /// Print run summaries as JSON
    #[arg(long)]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// TOML 設定為底，命令列參數覆蓋
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        let birthday = &mut config.birthday;
        if let Some(column) = &self.id_column {
            birthday.columns.input = column.clone();
        }
        if let Some(column) = &self.birthday_column {
            birthday.columns.output = column.clone();
        }
        if let Some(rows) = self.header_rows {
            birthday.header_rows = rows;
        }
        if let Some(suffix) = &self.output_suffix {
            birthday.output_suffix = suffix.clone();
        }
        if let Some(path) = &self.diagnostics {
            config.output.diagnostics_csv = Some(path.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if !self.inputs.is_empty() {
            validate_file_extensions("input", &self.inputs, READABLE_EXTENSIONS)?;
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "annotate-batch")]
#[command(about = "Add counter and offline-status columns to every workbook in a folder")]
pub struct AnnotateCliConfig {
    /// Folder containing the .xlsx files; prompts interactively when omitted
    pub folder: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory receiving the annotated workbooks (default ./output)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Overwrite the input workbooks instead of writing to the output directory
    #[arg(long, conflicts_with = "output_dir")]
    pub in_place: bool,

    /// Print the batch report as JSON
    #[arg(long)]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

#[cfg(feature = "cli")]
impl AnnotateCliConfig {
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        if let Some(dir) = &self.output_dir {
            config.output.output_dir = Some(dir.clone());
        }
        config.validate()?;
        Ok(config)
    }

    /// `None` 代表原地覆寫
    pub fn output_dir(&self, config: &TomlConfig) -> Option<PathBuf> {
        if self.in_place {
            return None;
        }
        Some(
            config
                .output
                .output_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        )
    }
}
