pub mod collection;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod openapi;
pub mod postman;
pub mod runner;
pub mod sync;
pub mod utils;
pub mod variable;

// Re-export commonly used types
pub use error::{Result, SyncError};
