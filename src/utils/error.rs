use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Spreadsheet read failed: {0}")]
    SpreadsheetReadError(#[from] calamine::Error),

    #[error("Spreadsheet write failed: {0}")]
    SpreadsheetWriteError(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Spreadsheet,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::ValidationError { .. } => ErrorCategory::Configuration,
            EtlError::SpreadsheetReadError(_) | EtlError::SpreadsheetWriteError(_) => {
                ErrorCategory::Spreadsheet
            }
            EtlError::CsvError(e) if e.is_io_error() => ErrorCategory::System,
            EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::ProcessingError { .. } => ErrorCategory::Data,
            EtlError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Spreadsheet => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 給使用者看的下一步建議
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::SpreadsheetReadError(_) => {
                "確認檔案是有效的 Excel 活頁簿，且沒有被其他程式開啟"
            }
            EtlError::SpreadsheetWriteError(_) => "確認輸出目錄可寫入，且目標檔案沒有被 Excel 開啟",
            EtlError::IoError(_) => "檢查檔案路徑與權限",
            EtlError::InvalidConfigValueError { .. } | EtlError::MissingConfigError { .. } => {
                "檢查命令列參數或 TOML 設定檔中的欄位值"
            }
            EtlError::ConfigError { .. } => "檢查 TOML 設定檔格式",
            EtlError::CsvError(_) | EtlError::SerializationError(_) => "檢查報表輸出路徑",
            EtlError::ValidationError { .. } => "檢查輸入的檔案或資料夾路徑與參數",
            EtlError::ProcessingError { .. } => "檢查工作表內容是否符合預期欄位配置",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("設定錯誤: {}", self),
            ErrorCategory::Spreadsheet => format!("無法處理 Excel 檔案: {}", self),
            ErrorCategory::Data => format!("資料處理失敗: {}", self),
            ErrorCategory::System => format!("系統錯誤: {}", self),
        }
    }

    /// 1 設定或驗證失敗，2 活頁簿處理失敗，3 系統 I/O 失敗
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration => 1,
            ErrorCategory::Spreadsheet | ErrorCategory::Data => 2,
            ErrorCategory::System => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
