use crate::core::{Pipeline, RunSummary};
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::debug!("Extracting workbook...");
        let workbook = self.pipeline.extract().await?;
        tracing::debug!(
            "Extracted {} sheet(s), {} row(s) in active sheet",
            workbook.sheets.len(),
            workbook.active_sheet().map(|s| s.row_count()).unwrap_or(0)
        );

        tracing::debug!("Transforming workbook...");
        let result = self.pipeline.transform(workbook).await?;
        tracing::debug!(
            "Transformed {} row(s), {} written, {} skipped",
            result.summary.rows_scanned,
            result.summary.rows_written,
            result.summary.skipped_rows()
        );

        tracing::debug!("Loading workbook...");
        let summary = self.pipeline.load(result).await?;
        if let Some(path) = &summary.output_path {
            tracing::debug!("Output saved to: {}", path.display());
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{TransformResult, Workbook};
    use crate::domain::model::{CellValue, Sheet};
    use crate::utils::error::EtlError;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingPipeline {
        calls: AtomicUsize,
        fail_transform: bool,
    }

    #[async_trait::async_trait]
    impl Pipeline for CountingPipeline {
        async fn extract(&self) -> Result<Workbook> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Workbook::new(vec![Sheet::new(
                "Sheet1",
                vec![vec![CellValue::text("a")]],
            )]))
        }

        async fn transform(&self, workbook: Workbook) -> Result<TransformResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_transform {
                return Err(EtlError::ProcessingError {
                    message: "boom".to_string(),
                });
            }
            let mut summary = RunSummary::new(PathBuf::from("in.xlsx"));
            summary.rows_scanned = workbook.active_sheet().map(|s| s.row_count()).unwrap_or(0);
            Ok(TransformResult { workbook, summary })
        }

        async fn load(&self, result: TransformResult) -> Result<RunSummary> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut summary = result.summary;
            summary.output_path = Some(PathBuf::from("out.xlsx"));
            Ok(summary)
        }
    }

    #[test]
    fn test_engine_runs_all_phases() {
        let engine = EtlEngine::new(CountingPipeline {
            calls: AtomicUsize::new(0),
            fail_transform: false,
        });

        let summary = tokio_test::block_on(engine.run()).unwrap();

        assert_eq!(engine.pipeline.calls.load(Ordering::SeqCst), 3);
        assert_eq!(summary.rows_scanned, 1);
        assert_eq!(summary.output_path, Some(PathBuf::from("out.xlsx")));
    }

    #[test]
    fn test_engine_stops_on_transform_error() {
        let engine = EtlEngine::new(CountingPipeline {
            calls: AtomicUsize::new(0),
            fail_transform: true,
        });

        let result = tokio_test::block_on(engine.run());

        assert!(matches!(result, Err(EtlError::ProcessingError { .. })));
        assert_eq!(engine.pipeline.calls.load(Ordering::SeqCst), 2);
    }
}
