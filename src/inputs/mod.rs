//! Projection inputs: typed parameters, lenient wire requests and loaders

pub mod lenient;
mod params;
mod request;
pub mod loader;

pub use params::*;
pub use request::{ReportInput, ReportRequest};
pub use loader::{load_request, load_requests_csv, load_requests_from_reader};

#[cfg(test)]
pub(crate) use params::fixtures;
