//! Data-presentation core for the NSV pavement dashboard.
//!
//! The modules mirror the browser client's ingest -> filter -> paginate ->
//! render pipeline with host-agnostic components: the GUI shell supplies
//! transport and drawing, this crate owns the working set and its state.

pub mod map;
pub mod model;
pub mod pipeline;
pub mod prelude;
pub mod telemetry;

/// Common error type for dashboard operations.
#[derive(thiserror::Error, Debug)]
pub enum DashboardError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type DashboardResult<T> = Result<T, DashboardError>;
