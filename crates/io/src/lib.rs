// Table loading

pub mod cache;
pub mod loader;

pub use cache::{SourceKey, TableCache};
pub use loader::{load_tables, SourcePaths};
