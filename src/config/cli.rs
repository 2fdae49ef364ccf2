//! Interactive console prompts used when no path is given on the command line.

use crate::utils::error::{EtlError, Result};
use dialoguer::{Confirm, Input};
use std::path::PathBuf;

fn prompt_error(e: dialoguer::Error) -> EtlError {
    EtlError::IoError(std::io::Error::other(e.to_string()))
}

/// 去掉前後空白與檔案總管「複製路徑」帶入的引號
pub fn clean_path_input(raw: &str) -> PathBuf {
    PathBuf::from(raw.trim().trim_matches('"').trim())
}

/// 清理後仍為空的輸入視為缺少必要的路徑
pub fn required_path(field: &str, raw: &str) -> Result<PathBuf> {
    let path = clean_path_input(raw);
    if path.as_os_str().is_empty() {
        return Err(EtlError::MissingConfigError {
            field: field.to_string(),
        });
    }
    Ok(path)
}

pub fn prompt_path(prompt: &str) -> Result<PathBuf> {
    let raw: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_error)?;
    required_path(prompt, &raw)
}

pub fn confirm_continue() -> Result<bool> {
    Confirm::new()
        .with_prompt("Process another file?")
        .default(false)
        .interact()
        .map_err(prompt_error)
}
