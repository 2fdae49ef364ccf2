//! Birth date extraction from 15- and 18-character national ID numbers.
//!
//! [`extract_birthday`] never fails: an unusable identifier yields an empty
//! [`Extraction`] carrying an [`ExtractionWarning`] the caller can log or
//! aggregate.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// 15 位舊式身分證缺少世紀，固定補上 19
pub const LEGACY_CENTURY_PREFIX: &str = "19";

pub const LEGACY_ID_LENGTH: usize = 15;
pub const ID_LENGTH: usize = 18;

pub const OUTPUT_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionWarning {
    #[error("ID number has invalid length {length}: {identifier}")]
    InvalidLength { identifier: String, length: usize },

    #[error("invalid birth date digits {digits}: {reason}")]
    InvalidDate { digits: String, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub birthday: Option<NaiveDate>,
    pub warning: Option<ExtractionWarning>,
}

impl Extraction {
    fn empty() -> Self {
        Self::default()
    }

    fn warn(warning: ExtractionWarning) -> Self {
        Self {
            birthday: None,
            warning: Some(warning),
        }
    }

    /// 空白輸入：沒有日期也沒有警告
    pub fn is_blank(&self) -> bool {
        self.birthday.is_none() && self.warning.is_none()
    }

    /// `YYYY-MM-DD`
    pub fn formatted(&self) -> Option<String> {
        self.birthday
            .map(|date| date.format(OUTPUT_DATE_FORMAT).to_string())
    }
}

/// 從身分證號碼取出生日期
pub fn extract_birthday(raw: Option<&str>) -> Extraction {
    let identifier = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return Extraction::empty(),
    };

    let chars: Vec<char> = identifier.chars().collect();
    let digits: String = match chars.len() {
        LEGACY_ID_LENGTH => {
            let yymmdd: String = chars[6..12].iter().collect();
            format!("{}{}", LEGACY_CENTURY_PREFIX, yymmdd)
        }
        ID_LENGTH => chars[6..14].iter().collect(),
        length => {
            return Extraction::warn(ExtractionWarning::InvalidLength {
                identifier: identifier.to_string(),
                length,
            })
        }
    };

    match parse_yyyymmdd(&digits) {
        Ok(date) => Extraction {
            birthday: Some(date),
            warning: None,
        },
        Err(reason) => Extraction::warn(ExtractionWarning::InvalidDate { digits, reason }),
    }
}

/// 嚴格解析 8 位數字 `YYYYMMDD`
fn parse_yyyymmdd(digits: &str) -> std::result::Result<NaiveDate, String> {
    if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err("expected 8 ASCII digits".to_string());
    }

    let year: i32 = digits[0..4].parse().map_err(|e| format!("year: {}", e))?;
    let month: u32 = digits[4..6].parse().map_err(|e| format!("month: {}", e))?;
    let day: u32 = digits[6..8].parse().map_err(|e| format!("day: {}", e))?;

    if year == 0 {
        return Err("year 0000 is out of range".to_string());
    }
    if !(1..=12).contains(&month) {
        return Err(format!("month {:02} is out of range", month));
    }

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| format!("day {:02} is out of range for {:04}-{:02}", day, year, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatted(raw: &str) -> Option<String> {
        extract_birthday(Some(raw)).formatted()
    }

    #[test]
    fn test_eighteen_digit_id() {
        let result = extract_birthday(Some("110101199003078515"));
        assert_eq!(result.formatted().as_deref(), Some("1990-03-07"));
        assert!(result.warning.is_none());
    }

    #[test]
    fn test_eighteen_digit_id_with_checksum_letter() {
        assert_eq!(formatted("11010120000229123X").as_deref(), Some("2000-02-29"));
    }

    #[test]
    fn test_fifteen_digit_id_gets_century_prefix() {
        let result = extract_birthday(Some("110101900307851"));
        assert_eq!(result.formatted().as_deref(), Some("1990-03-07"));
        assert!(result.warning.is_none());
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(formatted("  110101199003078515\t").as_deref(), Some("1990-03-07"));
    }

    #[test]
    fn test_blank_input_is_empty_without_warning() {
        for raw in [None, Some(""), Some("   "), Some("\t\n")] {
            let result = extract_birthday(raw);
            assert!(result.is_blank(), "input {:?}", raw);
            assert_eq!(result.formatted(), None);
        }
    }

    #[test]
    fn test_wrong_length_warns_once() {
        let result = extract_birthday(Some("12345"));
        assert_eq!(result.birthday, None);
        assert_eq!(
            result.warning,
            Some(ExtractionWarning::InvalidLength {
                identifier: "12345".to_string(),
                length: 5,
            })
        );
    }

    #[test]
    fn test_nineteen_characters_is_a_length_warning() {
        let result = extract_birthday(Some("1101011990133078515"));
        assert!(matches!(
            result.warning,
            Some(ExtractionWarning::InvalidLength { length: 19, .. })
        ));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 18 個字元，但含多位元組字元
        let result = extract_birthday(Some("身份證號碼一199003078515"));
        assert_eq!(result.formatted().as_deref(), Some("1990-03-07"));
    }

    #[test]
    fn test_invalid_month_warns_once() {
        let result = extract_birthday(Some("110101199013078515"));
        assert_eq!(result.birthday, None);
        match result.warning {
            Some(ExtractionWarning::InvalidDate { digits, .. }) => assert_eq!(digits, "19901307"),
            other => panic!("unexpected warning: {:?}", other),
        }
    }

    #[test]
    fn test_impossible_calendar_dates() {
        assert_eq!(formatted("110101199002300000"), None);
        assert_eq!(formatted("110101199001320000"), None);
        assert_eq!(formatted("110101199000100000"), None);
        assert_eq!(formatted("110101000001010000"), None);
        assert_eq!(formatted("110101199902290000"), None);
    }

    #[test]
    fn test_non_digit_date_characters() {
        let result = extract_birthday(Some("1101011990O3078515"));
        assert!(matches!(
            result.warning,
            Some(ExtractionWarning::InvalidDate { .. })
        ));
        assert_eq!(formatted("110101+99003078515"), None);
        assert_eq!(formatted("110101 9900307851"), None);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        for raw in ["110101199003078515", "110101900307851", "12345", ""] {
            assert_eq!(extract_birthday(Some(raw)), extract_birthday(Some(raw)));
        }
    }

    #[test]
    fn test_warning_messages_are_readable() {
        let warning = extract_birthday(Some("12345")).warning.unwrap();
        assert_eq!(warning.to_string(), "ID number has invalid length 5: 12345");
    }
}
