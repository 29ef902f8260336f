// Service exports
pub mod catalog;
pub mod engine_handle;

pub use catalog::{load_catalog, read_catalog, CatalogError, REQUIRED_COLUMNS};
pub use engine_handle::EngineHandle;
