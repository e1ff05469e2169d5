//! Ingestion of the circulation log.
//!
//! Most callers should use [`ingest_from_path`] (from [`unified`]) which:
//!
//! - reads the semicolon-delimited export into an immutable [`crate::types::LoanStore`]
//! - coerces dates and ages field by field, downgrading bad values to absent
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]
//!
//! Reader-level functions are available under [`csv`], and the coercion rules under [`dates`].

pub mod csv;
pub mod dates;
pub mod observability;
pub mod unified;

pub use csv::LoanCsvFormat;
pub use dates::DateOrder;
pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionEvent, IngestionObserver, IngestionSeverity,
    IngestionStats, LogObserver,
};
pub use unified::{ingest_from_path, IngestionOptions, IngestionRequest};
