pub mod annotate_pipeline;
pub mod birthday_pipeline;

pub use annotate_pipeline::AnnotatePipeline;
pub use birthday_pipeline::BirthdayPipeline;
