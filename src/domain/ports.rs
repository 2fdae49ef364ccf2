use crate::domain::model::{ColumnMapping, RunSummary, TransformResult, Workbook};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// 活頁簿的讀寫後端
pub trait Storage: Send + Sync {
    fn read_workbook(
        &self,
        path: &Path,
    ) -> impl std::future::Future<Output = Result<Workbook>> + Send;
    fn write_workbook(
        &self,
        path: &Path,
        workbook: &Workbook,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn column_mapping(&self) -> &ColumnMapping;
    /// 跳過的表頭列數
    fn header_rows(&self) -> usize;
    fn output_suffix(&self) -> &str;
    fn progress_interval(&self) -> usize;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Workbook>;
    async fn transform(&self, workbook: Workbook) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<RunSummary>;
}
