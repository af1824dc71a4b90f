pub use crate::map::{LatLngBounds, MapPresenter, MapSurface, Marker, MarkerStyle};
pub use crate::model::{
    DataEnvelope, ExportPayload, MeasurementPoint, Severity, SeverityCounts, Statistics,
};
pub use crate::pipeline::{
    apply_local, build_csv, DataStore, ExportColumn, FilterCriteria, FilterOutcome, PageState,
    PaginationController,
};
pub use crate::{DashboardError, DashboardResult};
