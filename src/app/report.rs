use crate::core::extractor::ExtractionWarning;
use crate::core::RunSummary;
use crate::utils::error::Result;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct DiagnosticRecord<'a> {
    file: String,
    row: usize,
    column: &'a str,
    kind: &'static str,
    message: String,
}

/// 將所有列警告寫成 CSV，方便在 Excel 中檢視被略過的列
pub fn write_diagnostics_csv(path: &Path, summaries: &[RunSummary]) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    let mut count = 0;
    for summary in summaries {
        let file = summary.input_path.display().to_string();
        for diagnostic in &summary.diagnostics {
            writer.serialize(DiagnosticRecord {
                file: file.clone(),
                row: diagnostic.row,
                column: &diagnostic.column,
                kind: match diagnostic.warning {
                    ExtractionWarning::InvalidLength { .. } => "length",
                    ExtractionWarning::InvalidDate { .. } => "date",
                },
                message: diagnostic.warning.to_string(),
            })?;
            count += 1;
        }
    }
    writer.flush()?;

    tracing::info!("📝 Wrote {} diagnostic(s) to {}", count, path.display());
    Ok(count)
}

pub fn summaries_to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
