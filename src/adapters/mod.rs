// Adapters layer: concrete implementations for external systems.

pub mod xlsx_store;

pub use xlsx_store::XlsxStorage;
