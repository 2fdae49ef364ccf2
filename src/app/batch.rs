//! Folder-level batch annotation.

use crate::app::pipelines::annotate_pipeline::AnnotatePipeline;
use crate::config::AnnotateSettings;
use crate::core::etl::EtlEngine;
use crate::core::{RunSummary, Storage};
use crate::utils::error::{EtlError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Excel 開啟檔案時留下的鎖定檔前綴
const LOCK_FILE_PREFIX: &str = "~$";

#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub processed: Vec<RunSummary>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// 資料夾內（不含子資料夾）所有 `.xlsx`，依檔名排序
pub fn discover_workbooks(folder: &Path, excluded: &[String]) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(EtlError::ValidationError {
            message: format!("folder '{}' does not exist", folder.display()),
        });
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        let is_xlsx = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if !is_xlsx || name.starts_with(LOCK_FILE_PREFIX) {
            continue;
        }
        if excluded.iter().any(|skip| skip == &name) {
            tracing::debug!("Skipping excluded workbook: {}", name);
            continue;
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}

/// 輸出位置：原地覆寫或寫到輸出目錄下的同名檔
pub fn annotate_output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    match (output_dir, input.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => input.to_path_buf(),
    }
}

/// 逐一標註資料夾內的活頁簿；單一檔案失敗只記錄，不中斷整批
pub async fn annotate_folder<S: Storage + Clone>(
    storage: &S,
    settings: &AnnotateSettings,
    folder: &Path,
    output_dir: Option<&Path>,
) -> Result<BatchReport> {
    let files = discover_workbooks(folder, &settings.excluded_files)?;
    let mut report = BatchReport::default();

    if files.is_empty() {
        tracing::warn!("No .xlsx files to process in {}", folder.display());
        return Ok(report);
    }
    tracing::info!("Found {} workbook(s) to process", files.len());

    for input in files {
        let output = annotate_output_path(&input, output_dir);
        let pipeline = AnnotatePipeline::new(storage.clone(), settings.clone(), input.clone(), output);

        match EtlEngine::new(pipeline).run().await {
            Ok(summary) => report.processed.push(summary),
            Err(e) => {
                tracing::error!("❌ Failed to process {}: {}", input.display(), e);
                report.failures.push(BatchFailure {
                    path: input,
                    error: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        "Batch finished: {} processed, {} failed",
        report.processed.len(),
        report.failures.len()
    );
    Ok(report)
}
