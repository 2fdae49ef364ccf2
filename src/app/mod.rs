pub mod batch;
pub mod pipelines;
pub mod report;
