//! Path-based ingestion entrypoint.
//!
//! [`ingest_from_path`] reads the circulation log once into an immutable
//! [`crate::types::LoanStore`] and reports the outcome to the observer configured on
//! [`IngestionOptions`], if any.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::IngestionResult;
use crate::types::LoanStore;

use super::csv::{ingest_loans_csv_from_path_with_stats, LoanCsvFormat};
use super::observability::{IngestionContext, IngestionEvent, IngestionObserver, IngestionSeverity};

/// Options controlling ingestion. [`Default`] matches the source system's export.
#[derive(Clone)]
pub struct IngestionOptions {
    pub format: LoanCsvFormat,
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Failures at or above this severity are also reported as [`IngestionEvent::Alert`].
    pub alert_at_or_above: IngestionSeverity,
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: LoanCsvFormat::default(),
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("has_observer", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl IngestionOptions {
    fn report(&self, ctx: &IngestionContext, event: IngestionEvent<'_>) {
        if let Some(obs) = &self.observer {
            obs.on_event(ctx, &event);
        }
    }
}

/// Ingest the circulation log at `path`.
///
/// Only structural failures are returned as errors (see [`crate::IngestionError`]). Malformed
/// cells become absent fields and missing columns are recorded on the store.
///
/// ```no_run
/// use std::sync::Arc;
///
/// use circulation_analytics::ingestion::{ingest_from_path, IngestionOptions, LogObserver};
///
/// # fn main() -> Result<(), circulation_analytics::IngestionError> {
/// let opts = IngestionOptions {
///     observer: Some(Arc::new(LogObserver)),
///     ..Default::default()
/// };
/// let store = ingest_from_path("basededados_biblio_2025.csv", &opts)?;
/// println!("records={}", store.record_count());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(path: impl AsRef<Path>, options: &IngestionOptions) -> IngestionResult<LoanStore> {
    let ctx = IngestionContext {
        path: path.as_ref().to_path_buf(),
        format: options.format,
    };

    match ingest_loans_csv_from_path_with_stats(&ctx.path, &ctx.format) {
        Ok((store, stats)) => {
            options.report(&ctx, IngestionEvent::Loaded { stats: &stats });
            Ok(store)
        }
        Err(error) => {
            options.report(&ctx, IngestionEvent::Failed { error: &error });
            if error.severity() >= options.alert_at_or_above {
                options.report(&ctx, IngestionEvent::Alert { error: &error });
            }
            Err(error)
        }
    }
}

/// An owned ingestion job: a source path plus the options to read it with.
#[derive(Debug, Clone)]
pub struct IngestionRequest {
    pub path: PathBuf,
    pub options: IngestionOptions,
}

impl IngestionRequest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: IngestionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: IngestionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn run(&self) -> IngestionResult<LoanStore> {
        ingest_from_path(&self.path, &self.options)
    }
}
