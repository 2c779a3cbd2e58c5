pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{SyncConfig, TestBackendKind, validate_base_url};
