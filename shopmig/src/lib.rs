// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export the runnable phases for callers that wire their own shell
pub use handlers::{CatalogSummary, run_catalog, run_fetch};
