pub mod formatter;
pub mod single_flight;

pub use formatter::{format_bytes, format_ms};
pub use single_flight::{FlightGuard, SingleFlight};
