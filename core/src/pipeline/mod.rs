pub mod export;
pub mod filter;
pub mod paginate;
pub mod store;

pub use export::{build_csv, ExportColumn};
pub use filter::{apply_local, FilterCriteria, FilterOutcome};
pub use paginate::{PageState, PaginationController, SeveritySection, PAGE_SIZE};
pub use store::DataStore;
