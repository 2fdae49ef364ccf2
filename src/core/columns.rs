//! Spreadsheet column addressing: letters (`A`, `W`, `AA`) <-> zero-based indices.

use crate::utils::error::{EtlError, Result};

/// 最後一欄 `XFD` 的索引
pub const MAX_COLUMN_INDEX: usize = 16_383;

/// 將欄位字母轉成從 0 開始的索引，`A` -> 0，`AA` -> 26
pub fn column_index(letters: &str) -> Result<usize> {
    let trimmed = letters.trim();
    let invalid = |reason: &str| EtlError::InvalidConfigValueError {
        field: "column".to_string(),
        value: letters.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("column letter cannot be empty"));
    }

    let mut number: usize = 0;
    for ch in trimmed.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(invalid("column must contain letters A-Z only"));
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        number = number
            .checked_mul(26)
            .and_then(|n| n.checked_add(digit))
            .ok_or_else(|| invalid("column is out of range"))?;
    }

    let index = number - 1;
    if index > MAX_COLUMN_INDEX {
        return Err(invalid("column is beyond XFD"));
    }
    Ok(index)
}

/// 將從 0 開始的索引轉成欄位字母，26 -> `AA`
pub fn column_letter(index: usize) -> String {
    let mut number = index + 1;
    let mut letters = Vec::new();
    while number > 0 {
        let remainder = (number - 1) % 26;
        letters.push((b'A' + remainder as u8) as char);
        number = (number - 1) / 26;
    }
    letters.iter().rev().collect()
}
