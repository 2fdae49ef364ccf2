pub mod columns;
pub mod etl;
pub mod extractor;

pub use crate::domain::model::{RunSummary, TransformResult, Workbook};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
