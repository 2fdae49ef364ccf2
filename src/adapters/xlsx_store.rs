//! Workbook storage on the local filesystem.
//!
//! Reading goes through calamine (xlsx, xlsm, xls, xlsb, ods); writing always
//! produces `.xlsx` through rust_xlsxwriter. Only cell values survive a round
//! trip, styles are not carried over.

use crate::core::Storage;
use crate::domain::model::{CellValue, Sheet, Workbook};
use crate::utils::error::{EtlError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Format;
use std::path::{Path, PathBuf};

pub const READABLE_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

const DATE_FORMAT: &str = "yyyy-mm-dd";
const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

#[derive(Debug, Clone, Default)]
pub struct XlsxStorage;

impl XlsxStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Storage for XlsxStorage {
    async fn read_workbook(&self, path: &Path) -> Result<Workbook> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || read_workbook_blocking(&path))
            .await
            .map_err(join_error)?
    }

    async fn write_workbook(&self, path: &Path, workbook: &Workbook) -> Result<()> {
        let path = path.to_path_buf();
        let workbook = workbook.clone();
        tokio::task::spawn_blocking(move || write_workbook_blocking(&path, &workbook))
            .await
            .map_err(join_error)?
    }
}

fn join_error(e: tokio::task::JoinError) -> EtlError {
    EtlError::ProcessingError {
        message: format!("spreadsheet task failed: {}", e),
    }
}

pub fn read_workbook_blocking(path: &Path) -> Result<Workbook> {
    tracing::debug!("Opening workbook: {}", path.display());
    let mut source = open_workbook_auto(path)?;

    let mut sheets = Vec::new();
    for name in source.sheet_names() {
        let range = source.worksheet_range(&name)?;

        // range 從第一個非空儲存格開始，補回前面的空列與空欄以保留絕對位置
        let (start_row, start_col) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); start_row];
        for row in range.rows() {
            let mut cells = vec![CellValue::Empty; start_col];
            cells.extend(row.iter().map(cell_value));
            rows.push(cells);
        }

        tracing::debug!("Sheet '{}': {} row(s)", name, rows.len());
        sheets.push(Sheet::new(name, rows));
    }

    Ok(Workbook::new(sheets))
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        // 期間仍以數值保存，只有日期帶回日期格式
        Data::DateTime(dt) if dt.is_duration() => CellValue::Number(dt.as_f64()),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
    }
}

pub fn write_workbook_blocking(path: &Path, workbook: &Workbook) -> Result<()> {
    let mut output = rust_xlsxwriter::Workbook::new();
    let date_format = Format::new().set_num_format(DATE_FORMAT);
    let datetime_format = Format::new().set_num_format(DATETIME_FORMAT);

    for sheet in &workbook.sheets {
        let worksheet = output.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (row_idx, row) in sheet.rows.iter().enumerate() {
            let row_num = u32::try_from(row_idx).map_err(|_| out_of_range(path, row_idx, 0))?;
            for (col_idx, cell) in row.iter().enumerate() {
                let col_num =
                    u16::try_from(col_idx).map_err(|_| out_of_range(path, row_idx, col_idx))?;
                match cell {
                    CellValue::Empty => {}
                    CellValue::Text(s) => {
                        worksheet.write_string(row_num, col_num, s)?;
                    }
                    CellValue::Int(i) => {
                        worksheet.write_number(row_num, col_num, *i as f64)?;
                    }
                    CellValue::Number(f) => {
                        worksheet.write_number(row_num, col_num, *f)?;
                    }
                    CellValue::Bool(b) => {
                        worksheet.write_boolean(row_num, col_num, *b)?;
                    }
                    CellValue::DateTime(serial) => {
                        let format = if serial.fract() == 0.0 {
                            &date_format
                        } else {
                            &datetime_format
                        };
                        worksheet.write_number_with_format(row_num, col_num, *serial, format)?;
                    }
                }
            }
        }
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    tracing::debug!("Saving workbook: {}", path.display());
    output.save(path)?;
    Ok(())
}

fn out_of_range(path: &Path, row: usize, col: usize) -> EtlError {
    EtlError::ProcessingError {
        message: format!(
            "cell ({}, {}) of {} is outside the worksheet limits",
            row,
            col,
            path.display()
        ),
    }
}

/// `報表.xlsx` + `_with_birthday` -> `報表_with_birthday.xlsx`，與輸入檔同目錄
pub fn suffixed_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}{}.xlsx", stem, suffix))
}
