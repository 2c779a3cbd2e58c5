pub mod backend;
pub mod executor;
pub mod newman;
pub mod reporter;
pub mod types;
pub mod walker;

pub use backend::TestBackend;
pub use executor::TestRunner;
pub use newman::NewmanBackend;
pub use reporter::TestReporter;
pub use types::{RunReport, RunSummary, TestResult, TestStatus};
pub use walker::{HttpWalker, build_url};
