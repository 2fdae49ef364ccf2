use crate::config::AnnotateSettings;
use crate::core::columns::column_index;
use crate::core::{Pipeline, RunSummary, Storage, TransformResult, Workbook};
use crate::domain::model::CellValue;
use crate::utils::error::{EtlError, Result};
use std::path::PathBuf;

/// 計數欄與離線狀態欄的標註
pub struct AnnotatePipeline<S: Storage> {
    pub(crate) storage: S,
    pub(crate) settings: AnnotateSettings,
    pub(crate) input: PathBuf,
    pub(crate) output: PathBuf,
}

struct AnnotateColumns {
    counter: usize,
    counter_source: usize,
    status_check: usize,
    status: usize,
}

impl<S: Storage> AnnotatePipeline<S> {
    pub fn new(storage: S, settings: AnnotateSettings, input: PathBuf, output: PathBuf) -> Self {
        Self {
            storage,
            settings,
            input,
            output,
        }
    }

    fn columns(&self) -> Result<AnnotateColumns> {
        Ok(AnnotateColumns {
            counter: column_index(&self.settings.counter_column)?,
            counter_source: column_index(&self.settings.counter_source_column)?,
            status_check: column_index(&self.settings.status_check_column)?,
            status: column_index(&self.settings.status_column)?,
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for AnnotatePipeline<S> {
    async fn extract(&self) -> Result<Workbook> {
        tracing::info!("📖 Processing: {}", self.input.display());
        self.storage.read_workbook(&self.input).await
    }

    async fn transform(&self, mut workbook: Workbook) -> Result<TransformResult> {
        let cols = self.columns()?;
        let mut summary = RunSummary::new(self.input.clone());

        let sheet = workbook
            .active_sheet_mut()
            .ok_or_else(|| EtlError::ProcessingError {
                message: format!("{} has no worksheet", self.input.display()),
            })?;

        if self.settings.drop_first_row && sheet.row_count() > 1 {
            sheet.remove_row(0);
            tracing::info!("  Removed first row");
        }

        // 表頭補到計數欄為止；空白工作表的已使用範圍仍算 A1
        for col in sheet.column_count().max(1)..cols.counter {
            sheet.set(0, col, CellValue::Text(format!("Unnamed_{}", col)));
        }
        sheet.set(
            0,
            cols.counter,
            CellValue::Text(self.settings.counter_header.clone()),
        );

        let mut status_rows = 0;
        for row in 1..sheet.row_count() {
            summary.rows_scanned += 1;

            let source_blank = sheet
                .get(row, cols.counter_source)
                .map_or(true, CellValue::is_blank);
            if source_blank {
                summary.blank_rows += 1;
            } else {
                sheet.set(row, cols.counter, CellValue::Int(1));
                summary.rows_written += 1;
            }

            let check_blank = sheet
                .get(row, cols.status_check)
                .map_or(true, CellValue::is_blank);
            if check_blank {
                sheet.set(
                    row,
                    cols.status,
                    CellValue::Text(self.settings.status_text.clone()),
                );
                status_rows += 1;
            }
        }

        tracing::info!(
            "  Counter column {} filled for {} row(s)",
            self.settings.counter_column,
            summary.rows_written
        );
        tracing::info!("  Marked {} row(s) as '{}'", status_rows, self.settings.status_text);
        summary.status_rows = Some(status_rows);

        Ok(TransformResult { workbook, summary })
    }

    async fn load(&self, result: TransformResult) -> Result<RunSummary> {
        self.storage
            .write_workbook(&self.output, &result.workbook)
            .await?;
        tracing::info!("  ✅ Saved: {}", self.output.display());

        let mut summary = result.summary;
        summary.output_path = Some(self.output.clone());
        Ok(summary)
    }
}
