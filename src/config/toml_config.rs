use crate::config::{AnnotateSettings, BirthdaySettings};
use crate::core::ConfigProvider;
use crate::domain::model::ColumnMapping;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub birthday: BirthdaySettings,
    pub annotate: AnnotateSettings,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// 批次標註的輸出目錄
    pub output_dir: Option<PathBuf>,
    /// 生日擷取的警告報表
    pub diagnostics_csv: Option<PathBuf>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${REPORT_DIR})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        self.birthday.validate()?;
        self.annotate.validate()?;

        if let Some(dir) = &self.output.output_dir {
            validate_path("output.output_dir", dir)?;
        }
        if let Some(path) = &self.output.diagnostics_csv {
            validate_path("output.diagnostics_csv", path)?;
        }
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn column_mapping(&self) -> &ColumnMapping {
        self.birthday.column_mapping()
    }

    fn header_rows(&self) -> usize {
        self.birthday.header_rows()
    }

    fn output_suffix(&self) -> &str {
        self.birthday.output_suffix()
    }

    fn progress_interval(&self) -> usize {
        self.birthday.progress_interval()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
