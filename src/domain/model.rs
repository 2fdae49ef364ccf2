use crate::core::extractor::ExtractionWarning;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Number(f64),
    Bool(bool),
    /// Excel 日期序號（1900 系統），寫回時帶日期格式
    DateTime(f64),
}

impl CellValue {
    pub fn text<S: Into<String>>(value: S) -> Self {
        CellValue::Text(value.into())
    }

    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 儲存格的文字內容；整數型浮點數不帶小數位，避免身分證被寫成 `1.1e17`
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Int(i) => Some(i.to_string()),
            CellValue::Number(f) if f.fract() == 0.0 && f.is_finite() => Some(format!("{:.0}", f)),
            CellValue::Number(f) => Some(f.to_string()),
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::DateTime(serial) => Some(match excel_serial_to_datetime(*serial) {
                Some(dt) if serial.fract() == 0.0 => dt.format("%Y-%m-%d").to_string(),
                Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
                None => serial.to_string(),
            }),
        }
    }
}

/// 1900 日期系統的序號轉為日期時間；序號 60 以後已含 Excel 的 1900-02-29
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::try_milliseconds(millis)?)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new<S: Into<String>>(name: S, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 已使用的最大欄數
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// 寫入儲存格，必要時補齊列與欄
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = value;
    }

    pub fn remove_row(&mut self, row: usize) -> Option<Vec<CellValue>> {
        (row < self.rows.len()).then(|| self.rows.remove(row))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// 第一張工作表視為作用中工作表
    pub fn active_sheet(&self) -> Option<&Sheet> {
        self.sheets.first()
    }

    pub fn active_sheet_mut(&mut self) -> Option<&mut Sheet> {
        self.sheets.first_mut()
    }
}

/// 身分證欄與生日欄的欄位字母
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub input: String,
    pub output: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            input: "D".to_string(),
            output: "I".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowDiagnostic {
    /// 從 1 開始，與 Excel 列號一致
    pub row: usize,
    pub column: String,
    pub warning: ExtractionWarning,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub input_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub rows_scanned: usize,
    pub rows_written: usize,
    pub blank_rows: usize,
    /// 標記為離線的列數（annotate）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_rows: Option<usize>,
    pub diagnostics: Vec<RowDiagnostic>,
}

impl RunSummary {
    pub fn new(input_path: PathBuf) -> Self {
        Self {
            input_path,
            ..Self::default()
        }
    }

    pub fn skipped_rows(&self) -> usize {
        self.diagnostics.len()
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub workbook: Workbook,
    pub summary: RunSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text_keeps_integral_floats_whole() {
        assert_eq!(
            CellValue::Number(110101900307851.0).as_text().as_deref(),
            Some("110101900307851")
        );
        assert_eq!(CellValue::Number(1.5).as_text().as_deref(), Some("1.5"));
        assert_eq!(CellValue::Int(42).as_text().as_deref(), Some("42"));
        assert_eq!(CellValue::Empty.as_text(), None);
    }

    #[test]
    fn test_date_cells_read_as_dates() {
        assert_eq!(
            CellValue::DateTime(43952.0).as_text().as_deref(),
            Some("2020-05-01")
        );
        assert_eq!(
            CellValue::DateTime(43952.5).as_text().as_deref(),
            Some("2020-05-01 12:00:00")
        );
        assert!(!CellValue::DateTime(43952.0).is_blank());
        assert_eq!(excel_serial_to_datetime(-1.0), None);
    }

    #[test]
    fn test_blank_cells() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::text("  ").is_blank());
        assert!(!CellValue::text("x").is_blank());
        assert!(!CellValue::Int(0).is_blank());
    }

    #[test]
    fn test_sheet_set_pads_rows_and_columns() {
        let mut sheet = Sheet::new("Sheet1", vec![vec![CellValue::text("a")]]);
        sheet.set(2, 3, CellValue::Int(1));

        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.column_count(), 4);
        assert_eq!(sheet.get(2, 3), Some(&CellValue::Int(1)));
        assert_eq!(sheet.get(1, 0), None);
        assert_eq!(sheet.get(2, 0), Some(&CellValue::Empty));
    }

    #[test]
    fn test_remove_row() {
        let mut sheet = Sheet::new(
            "Sheet1",
            vec![vec![CellValue::text("title")], vec![CellValue::text("header")]],
        );
        assert!(sheet.remove_row(5).is_none());
        assert_eq!(sheet.remove_row(0), Some(vec![CellValue::text("title")]));
        assert_eq!(sheet.get(0, 0), Some(&CellValue::text("header")));
    }
}
