use crate::core::columns::column_index;
use crate::utils::error::{EtlError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    let text = path.to_string_lossy();
    if text.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: text.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if text.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: text.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_file_extensions(
    field_name: &str,
    files: &[PathBuf],
    allowed_extensions: &[&str],
) -> Result<()> {
    let allowed_set: HashSet<String> = allowed_extensions
        .iter()
        .map(|ext| ext.to_ascii_lowercase())
        .collect();

    for file in files {
        match file.extension().and_then(|ext| ext.to_str()) {
            Some(extension) if allowed_set.contains(&extension.to_ascii_lowercase()) => {}
            Some(extension) => {
                return Err(EtlError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.display().to_string(),
                    reason: format!(
                        "Unsupported file extension: {}. Allowed extensions: {}",
                        extension,
                        allowed_extensions.join(", ")
                    ),
                });
            }
            None => {
                return Err(EtlError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.display().to_string(),
                    reason: "File has no extension or invalid filename".to_string(),
                });
            }
        }
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 欄位字母必須落在 A..=XFD
pub fn validate_column(field_name: &str, letters: &str) -> Result<()> {
    column_index(letters).map(|_| ()).map_err(|e| match e {
        EtlError::InvalidConfigValueError { value, reason, .. } => {
            EtlError::InvalidConfigValueError {
                field: field_name.to_string(),
                value,
                reason,
            }
        }
        other => other,
    })
}
