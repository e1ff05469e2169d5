//! Reporting of ingestion outcomes.
//!
//! [`super::ingest_from_path`] emits one [`IngestionEvent`] per outcome (plus an
//! [`IngestionEvent::Alert`] when a failure crosses the configured threshold) to an optional
//! [`IngestionObserver`].

use std::error::Error as StdError;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::IngestionError;
use crate::types::Column;

use super::csv::LoanCsvFormat;

/// How bad an ingestion outcome is. Ordered, so it can be used as an alert threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// Every row and column came through intact.
    Info,
    /// The store was built, but some values or columns were lost.
    Warning,
    /// The source is not a usable circulation log.
    Error,
    /// The source could not be read at all.
    Critical,
}

impl IngestionError {
    /// Severity of this failure. Anything caused by I/O is `Critical`.
    pub fn severity(&self) -> IngestionSeverity {
        match self {
            IngestionError::Io(_) => IngestionSeverity::Critical,
            IngestionError::Csv(err) if err.is_io_error() || caused_by_io(err) => IngestionSeverity::Critical,
            IngestionError::Csv(_) | IngestionError::EmptySource => IngestionSeverity::Error,
        }
    }
}

fn caused_by_io(err: &(dyn StdError + 'static)) -> bool {
    std::iter::successors(Some(err), |e| (*e).source()).any(|e| e.is::<std::io::Error>())
}

/// Where and how a source was read.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    pub path: PathBuf,
    pub format: LoanCsvFormat,
}

/// Stats reported on successful ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IngestionStats {
    /// Number of ingested rows. Every data row is kept.
    pub rows: usize,
    /// Non-blank date/age cells that were downgraded to absent.
    pub unparsable_values: usize,
    /// Schema columns the source header did not carry.
    pub missing_columns: Vec<Column>,
}

impl IngestionStats {
    /// Severity of a successful ingestion: `Warning` if anything was lost, else `Info`.
    pub fn severity(&self) -> IngestionSeverity {
        if self.unparsable_values > 0 || !self.missing_columns.is_empty() {
            IngestionSeverity::Warning
        } else {
            IngestionSeverity::Info
        }
    }
}

/// One ingestion outcome.
#[derive(Debug, Clone, Copy)]
pub enum IngestionEvent<'a> {
    /// The store was built.
    Loaded { stats: &'a IngestionStats },
    /// Ingestion failed.
    Failed { error: &'a IngestionError },
    /// A failure at or above the alert threshold. Always preceded by `Failed`.
    Alert { error: &'a IngestionError },
}

impl IngestionEvent<'_> {
    pub fn severity(&self) -> IngestionSeverity {
        match self {
            IngestionEvent::Loaded { stats } => stats.severity(),
            IngestionEvent::Failed { error } | IngestionEvent::Alert { error } => error.severity(),
        }
    }
}

impl fmt::Display for IngestionEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestionEvent::Loaded { stats } => write!(
                f,
                "ok rows={} unparsable={} missing_columns={}",
                stats.rows,
                stats.unparsable_values,
                join_columns(&stats.missing_columns)
            ),
            IngestionEvent::Failed { error } => {
                write!(f, "fail severity={:?} err={error}", error.severity())
            }
            IngestionEvent::Alert { error } => {
                write!(f, "ALERT severity={:?} err={error}", error.severity())
            }
        }
    }
}

/// Receives ingestion events. Implemented for plain closures as well.
pub trait IngestionObserver: Send + Sync {
    fn on_event(&self, ctx: &IngestionContext, event: &IngestionEvent<'_>);
}

impl<F> IngestionObserver for F
where
    F: Fn(&IngestionContext, &IngestionEvent<'_>) + Send + Sync,
{
    fn on_event(&self, ctx: &IngestionContext, event: &IngestionEvent<'_>) {
        self(ctx, event)
    }
}

/// Forwards every event to each inner observer, in order.
#[derive(Default)]
pub struct CompositeObserver {
    inner: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    pub fn new(inner: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { inner }
    }

    /// Add another observer to the end of the fan-out list.
    pub fn push(&mut self, observer: Arc<dyn IngestionObserver>) {
        self.inner.push(observer);
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers", &self.inner.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_event(&self, ctx: &IngestionContext, event: &IngestionEvent<'_>) {
        self.inner.iter().for_each(|o| o.on_event(ctx, event));
    }
}

/// Forwards ingestion events to the `log` facade.
#[derive(Debug, Default)]
pub struct LogObserver;

impl IngestionObserver for LogObserver {
    fn on_event(&self, ctx: &IngestionContext, event: &IngestionEvent<'_>) {
        let path = ctx.path.display();
        match (event, event.severity()) {
            (IngestionEvent::Loaded { .. }, IngestionSeverity::Info) => {
                log::info!("[ingest] path={path} {event}")
            }
            (IngestionEvent::Loaded { .. }, _) => log::warn!("[ingest] path={path} {event}"),
            _ => log::error!("[ingest] path={path} {event}"),
        }
    }
}

/// Appends one line per event to a local file.
///
/// The file is opened on the first event and kept open. Write failures are ignored.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl FileObserver {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            file: Mutex::new(None),
        }
    }
}

impl IngestionObserver for FileObserver {
    fn on_event(&self, ctx: &IngestionContext, event: &IngestionEvent<'_>) {
        let Ok(mut slot) = self.file.lock() else {
            return;
        };
        if slot.is_none() {
            *slot = OpenOptions::new().create(true).append(true).open(&self.path).ok();
        }
        if let Some(file) = slot.as_mut() {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let _ = writeln!(file, "{ts} path={} {event}", ctx.path.display());
        }
    }
}

fn join_columns(columns: &[Column]) -> String {
    match columns {
        [] => "-".to_string(),
        _ => columns.iter().map(|c| c.header()).collect::<Vec<_>>().join(","),
    }
}
