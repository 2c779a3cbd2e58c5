pub mod fetcher;
pub mod types;

pub use fetcher::SpecFetcher;
pub use types::{ApiSpec, Operation, PathEntry, split_path};
