pub mod envelope;
pub mod point;
pub mod stats;

pub use envelope::{DataEnvelope, ExportPayload};
pub use point::{or_na, MeasurementPoint, Severity};
pub use stats::{SeverityCounts, Statistics};
