//! Query engine serving the dashboard views.
//!
//! This module sits "above" [`crate::analytics`] and provides:
//!
//! - an explicit data context ([`AnalyticsEngine`]) owning the shared store and policy config
//! - observer hooks and cumulative metrics around every query
//! - a JSON snapshot of all views for the serving layer
//!
//! The engine holds no mutable view state. It is `Send + Sync`; concurrent callers need no
//! coordination.

mod observer;

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::analytics::{compute_heatmap, compute_metrics, compute_time_series};
use crate::analytics::{HeadlineMetrics, Heatmap, TimeSeries, ViewResult};
use crate::config::AnalyticsConfig;
use crate::types::LoanStore;

pub use observer::{LogQueryObserver, Query, QueryEvent, QueryMetrics, QueryMetricsSnapshot, QueryObserver};

/// Every view in one response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub time_series: ViewResult<TimeSeries>,
    pub heatmap: ViewResult<Heatmap>,
    pub metrics: HeadlineMetrics,
}

/// Serves the dashboard queries over an immutable [`LoanStore`].
pub struct AnalyticsEngine {
    store: Arc<LoanStore>,
    config: AnalyticsConfig,
    observer: Option<Arc<dyn QueryObserver>>,
    query_metrics: Arc<QueryMetrics>,
}

impl AnalyticsEngine {
    /// Create an engine over a shared store.
    pub fn new(store: Arc<LoanStore>, config: AnalyticsConfig) -> Self {
        log::info!(
            "analytics engine ready: records={} columns={}",
            store.record_count(),
            store.columns().count()
        );
        Self {
            store,
            config,
            observer: None,
            query_metrics: Arc::new(QueryMetrics::new()),
        }
    }

    /// Attach an observer for query events.
    pub fn with_observer(mut self, observer: Arc<dyn QueryObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn store(&self) -> &LoanStore {
        &self.store
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Get a handle to the cumulative query metrics.
    pub fn query_metrics(&self) -> Arc<QueryMetrics> {
        Arc::clone(&self.query_metrics)
    }

    /// Monthly book/notebook series.
    pub fn time_series(&self) -> ViewResult<TimeSeries> {
        self.run(Query::TimeSeries, compute_time_series, |r| !r.is_available())
    }

    /// Weekday × hour grid.
    pub fn heatmap(&self) -> ViewResult<Heatmap> {
        self.run(Query::Heatmap, compute_heatmap, |r| !r.is_available())
    }

    /// Headline metrics, rankings and delay breakdowns.
    pub fn metrics(&self) -> HeadlineMetrics {
        let config = &self.config;
        self.run(
            Query::Metrics,
            |store| compute_metrics(store, config),
            |m| !m.unavailable.is_empty(),
        )
    }

    /// All three views.
    pub fn dashboard(&self) -> Dashboard {
        Dashboard {
            time_series: self.time_series(),
            heatmap: self.heatmap(),
            metrics: self.metrics(),
        }
    }

    /// All three views as a JSON document.
    pub fn dashboard_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.dashboard())
    }

    fn run<T>(
        &self,
        query: Query,
        compute: impl FnOnce(&LoanStore) -> T,
        is_degraded: impl FnOnce(&T) -> bool,
    ) -> T {
        let start = Instant::now();
        self.emit(QueryEvent::QueryStarted { query });

        let out = compute(&self.store);

        let elapsed = start.elapsed();
        let degraded = is_degraded(&out);
        let records_scanned = self.store.record_count();
        self.query_metrics
            .on_query_finished(elapsed, records_scanned, degraded);
        self.emit(QueryEvent::QueryFinished {
            query,
            elapsed,
            records_scanned,
            degraded,
        });
        out
    }

    fn emit(&self, event: QueryEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}
