use anyhow::Result;
use calamine::{open_workbook, Data, DataType, Reader, Xlsx};
use sheet_etl::app::report::write_diagnostics_csv;
use sheet_etl::{BirthdayPipeline, BirthdaySettings, EtlEngine, XlsxStorage};
use std::path::Path;
use tempfile::TempDir;

/// 建立一份名單：A 姓名、D 身分證，I 欄留空
fn write_roster(path: &Path) -> Result<()> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("名單")?;

    sheet.write_string(0, 0, "姓名")?;
    sheet.write_string(0, 3, "身份證號碼")?;
    sheet.write_string(0, 5, "到職日")?;
    sheet.write_string(0, 8, "出生日期")?;
    let date_format = rust_xlsxwriter::Format::new().set_num_format("yyyy-mm-dd");
    // 2020-05-01
    sheet.write_number_with_format(1, 5, 43952.0, &date_format)?;

    let rows: [(&str, Option<&str>); 5] = [
        ("張三", Some("110101199003078515")),
        ("李四", Some("110101900307851")),
        ("王五", None),
        ("趙六", Some("12345")),
        ("錢七", Some("110101199013078515")),
    ];
    for (i, (name, id)) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, *name)?;
        if let Some(id) = id {
            sheet.write_string(row, 3, *id)?;
        }
    }
    // 以數字存放的 15 位身分證
    sheet.write_string(6, 0, "孫八")?;
    sheet.write_number(6, 3, 110101851231002.0)?;

    let other = workbook.add_worksheet();
    other.set_name("備註")?;
    other.write_string(0, 0, "do not touch")?;

    workbook.save(path)?;
    Ok(())
}

fn cell_text(row: &[Data], col: usize) -> String {
    row.get(col).map(|c| c.to_string()).unwrap_or_default()
}

#[tokio::test]
async fn test_end_to_end_birthday_extraction() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("roster.xlsx");
    write_roster(&input)?;

    let pipeline = BirthdayPipeline::new(
        XlsxStorage::new(),
        BirthdaySettings::default(),
        input.clone(),
    );
    let summary = EtlEngine::new(pipeline).run().await?;

    let output = temp_dir.path().join("roster_with_birthday.xlsx");
    assert_eq!(summary.output_path.as_deref(), Some(output.as_path()));
    assert_eq!(summary.rows_scanned, 6);
    assert_eq!(summary.rows_written, 3);
    assert_eq!(summary.blank_rows, 1);
    assert_eq!(summary.skipped_rows(), 2);
    assert_eq!(summary.diagnostics[0].row, 5);
    assert_eq!(summary.diagnostics[1].row, 6);

    let mut workbook: Xlsx<_> = open_workbook(&output)?;
    let range = workbook.worksheet_range("名單")?;
    let rows: Vec<&[Data]> = range.rows().collect();

    assert_eq!(cell_text(rows[0], 8), "出生日期");
    assert_eq!(cell_text(rows[1], 8), "1990-03-07");
    assert_eq!(cell_text(rows[2], 8), "1990-03-07");
    assert_eq!(cell_text(rows[3], 8), "");
    assert_eq!(cell_text(rows[4], 8), "");
    assert_eq!(cell_text(rows[5], 8), "");
    assert_eq!(cell_text(rows[6], 8), "1985-12-31");

    // 其他欄位與工作表保留
    assert_eq!(cell_text(rows[1], 0), "張三");
    assert_eq!(cell_text(rows[1], 3), "110101199003078515");
    assert!(
        matches!(rows[1][5], Data::DateTime(_)),
        "date cell degraded: {:?}",
        rows[1][5]
    );
    assert_eq!(rows[1][5].as_f64(), Some(43952.0));
    let other = workbook.worksheet_range("備註")?;
    assert_eq!(
        other.get_value((0, 0)).map(|c| c.to_string()),
        Some("do not touch".to_string())
    );

    // 原檔不變
    let mut original: Xlsx<_> = open_workbook(&input)?;
    let range = original.worksheet_range("名單")?;
    assert_eq!(cell_text(range.rows().nth(1).unwrap(), 8), "");

    Ok(())
}

#[tokio::test]
async fn test_diagnostics_csv_lists_skipped_rows() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("roster.xlsx");
    write_roster(&input)?;

    let pipeline = BirthdayPipeline::new(
        XlsxStorage::new(),
        BirthdaySettings::default(),
        input.clone(),
    );
    let summary = EtlEngine::new(pipeline).run().await?;

    let report = temp_dir.path().join("diagnostics.csv");
    let count = write_diagnostics_csv(&report, &[summary])?;
    assert_eq!(count, 2);

    let mut reader = csv::Reader::from_path(&report)?;
    let records: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
    assert_eq!(records.len(), 2);
    assert_eq!(&records[0][1], "5");
    assert_eq!(&records[0][3], "length");
    assert_eq!(&records[1][1], "6");
    assert_eq!(&records[1][3], "date");

    Ok(())
}

#[tokio::test]
async fn test_missing_input_fails() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline = BirthdayPipeline::new(
        XlsxStorage::new(),
        BirthdaySettings::default(),
        temp_dir.path().join("missing.xlsx"),
    );

    let result = EtlEngine::new(pipeline).run().await;
    assert!(result.is_err());
    assert!(!temp_dir.path().join("missing_with_birthday.xlsx").exists());
}
