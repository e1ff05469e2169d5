use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Top-level queries the engine serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    TimeSeries,
    Heatmap,
    Metrics,
}

impl Query {
    pub fn as_str(&self) -> &'static str {
        match self {
            Query::TimeSeries => "time_series",
            Query::Heatmap => "heatmap",
            Query::Metrics => "metrics",
        }
    }
}

/// Events emitted by the engine around each query.
#[derive(Debug, Clone)]
pub enum QueryEvent {
    QueryStarted { query: Query },
    QueryFinished {
        query: Query,
        elapsed: Duration,
        records_scanned: usize,
        /// The result (or part of it) fell back because of missing columns.
        degraded: bool,
    },
}

/// Observer hook for query events.
pub trait QueryObserver: Send + Sync {
    fn on_event(&self, event: &QueryEvent);
}

/// Logs query events through the `log` facade.
#[derive(Debug, Default)]
pub struct LogQueryObserver;

impl QueryObserver for LogQueryObserver {
    fn on_event(&self, event: &QueryEvent) {
        match event {
            QueryEvent::QueryStarted { query } => log::debug!("[query][start] {}", query.as_str()),
            QueryEvent::QueryFinished {
                query,
                elapsed,
                records_scanned,
                degraded,
            } => {
                if *degraded {
                    log::warn!(
                        "[query][degraded] {} records={} elapsed={:?}",
                        query.as_str(),
                        records_scanned,
                        elapsed
                    );
                } else {
                    log::debug!(
                        "[query][ok] {} records={} elapsed={:?}",
                        query.as_str(),
                        records_scanned,
                        elapsed
                    );
                }
            }
        }
    }
}

/// Cumulative counters across every query an engine has served.
///
/// Safe to read while queries run on other threads.
pub struct QueryMetrics {
    queries: AtomicU64,
    degraded: AtomicU64,
    records_scanned: AtomicU64,
    last_elapsed_ns: AtomicU64,
}

impl QueryMetrics {
    pub fn new() -> Self {
        Self {
            queries: AtomicU64::new(0),
            degraded: AtomicU64::new(0),
            records_scanned: AtomicU64::new(0),
            last_elapsed_ns: AtomicU64::new(0),
        }
    }

    pub fn on_query_finished(&self, elapsed: Duration, records_scanned: usize, degraded: bool) {
        let _ = self.queries.fetch_add(1, Ordering::SeqCst);
        if degraded {
            let _ = self.degraded.fetch_add(1, Ordering::SeqCst);
        }
        let _ = self
            .records_scanned
            .fetch_add(records_scanned as u64, Ordering::SeqCst);
        self.last_elapsed_ns
            .store(elapsed.as_nanos().min(u64::MAX as u128) as u64, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> QueryMetricsSnapshot {
        let last_ns = self.last_elapsed_ns.load(Ordering::SeqCst);
        QueryMetricsSnapshot {
            queries: self.queries.load(Ordering::SeqCst),
            degraded: self.degraded.load(Ordering::SeqCst),
            records_scanned: self.records_scanned.load(Ordering::SeqCst),
            last_elapsed: (last_ns > 0).then(|| Duration::from_nanos(last_ns)),
        }
    }
}

impl Default for QueryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable snapshot of [`QueryMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryMetricsSnapshot {
    pub queries: u64,
    pub degraded: u64,
    pub records_scanned: u64,
    pub last_elapsed: Option<Duration>,
}

impl fmt::Display for QueryMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "queries={}, degraded={}, records_scanned={}, last_elapsed={:?}",
            self.queries, self.degraded, self.records_scanned, self.last_elapsed
        )
    }
}
