use crate::adapters::xlsx_store::suffixed_output_path;
use crate::core::columns::{column_index, column_letter};
use crate::core::extractor::extract_birthday;
use crate::core::{ConfigProvider, Pipeline, RunSummary, Storage, TransformResult, Workbook};
use crate::domain::model::{CellValue, RowDiagnostic};
use crate::utils::error::{EtlError, Result};
use std::path::PathBuf;

/// 從身分證欄取出生日期，寫入生日欄
pub struct BirthdayPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) input: PathBuf,
}

impl<S: Storage, C: ConfigProvider> BirthdayPipeline<S, C> {
    pub fn new(storage: S, config: C, input: PathBuf) -> Self {
        Self {
            storage,
            config,
            input,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        suffixed_output_path(&self.input, self.config.output_suffix())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for BirthdayPipeline<S, C> {
    async fn extract(&self) -> Result<Workbook> {
        tracing::info!("📖 Loading workbook: {}", self.input.display());
        self.storage.read_workbook(&self.input).await
    }

    async fn transform(&self, mut workbook: Workbook) -> Result<TransformResult> {
        let mapping = self.config.column_mapping();
        let input_col = column_index(&mapping.input)?;
        let input_letter = column_letter(input_col);
        let output_col = column_index(&mapping.output)?;
        let header_rows = self.config.header_rows();
        let progress_interval = self.config.progress_interval().max(1);

        let mut summary = RunSummary::new(self.input.clone());
        let sheet = workbook
            .active_sheet_mut()
            .ok_or_else(|| EtlError::ProcessingError {
                message: format!("{} has no worksheet", self.input.display()),
            })?;

        tracing::info!(
            "Found {} row(s) in sheet '{}'",
            sheet.row_count(),
            sheet.name
        );

        for row_idx in header_rows..sheet.row_count() {
            summary.rows_scanned += 1;
            let raw = sheet.get(row_idx, input_col).and_then(CellValue::as_text);
            let extraction = extract_birthday(raw.as_deref());

            if let Some(warning) = extraction.warning {
                tracing::warn!("⚠️ Row {}: {}", row_idx + 1, warning);
                summary.diagnostics.push(RowDiagnostic {
                    row: row_idx + 1,
                    column: input_letter.clone(),
                    warning,
                });
            } else if let Some(date) = extraction.formatted() {
                sheet.set(row_idx, output_col, CellValue::Text(date));
                summary.rows_written += 1;
            } else {
                summary.blank_rows += 1;
            }

            if (row_idx + 1) % progress_interval == 0 {
                tracing::info!("Processed {} row(s)...", row_idx + 1);
            }
        }

        Ok(TransformResult { workbook, summary })
    }

    async fn load(&self, result: TransformResult) -> Result<RunSummary> {
        let output_path = self.output_path();
        tracing::info!("💾 Saving workbook: {}", output_path.display());
        self.storage
            .write_workbook(&output_path, &result.workbook)
            .await?;

        let mut summary = result.summary;
        summary.output_path = Some(output_path);
        Ok(summary)
    }
}
