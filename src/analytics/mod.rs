//! Dashboard aggregations over a [`crate::types::LoanStore`].
//!
//! Every function here is a pure, read-only pass over the store. Calling one twice on the same
//! store yields identical output.
//!
//! Implemented views:
//!
//! - [`compute_time_series()`]: monthly loan counts for books and notebooks
//! - [`compute_heatmap()`]: weekday × hour loan counts on a fixed 5 × 16 grid
//! - [`compute_metrics()`]: headline numbers, rankings and the delay breakdowns
//!
//! Which source columns each view needs is declared once, in [`View::required_columns`]. A view
//! whose columns are missing returns [`ViewResult::Unavailable`] instead of failing.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use circulation_analytics::analytics::{compute_time_series, ViewResult};
//! use circulation_analytics::types::{LoanRecord, LoanStore};
//!
//! let loan = |y, m, d, kind: &str| LoanRecord {
//!     item_type: Some(kind.to_string()),
//!     loan_date: NaiveDate::from_ymd_opt(y, m, d).and_then(|d| d.and_hms_opt(10, 0, 0)),
//!     ..Default::default()
//! };
//! let store = LoanStore::with_all_columns(vec![
//!     loan(2025, 3, 5, "Livros"),
//!     loan(2025, 3, 10, "Notebook"),
//!     loan(2025, 4, 1, "Livros"),
//! ]);
//!
//! let ViewResult::Available(ts) = compute_time_series(&store) else { unreachable!() };
//! assert_eq!(ts.months, vec!["2025-03", "2025-04"]);
//! assert_eq!(ts.livros, vec![1, 1]);
//! assert_eq!(ts.notebook, vec![1, 0]);
//! ```

pub mod delay;
pub mod heatmap;
pub mod metrics;
pub mod ranking;
pub mod time_series;

use serde::Serialize;

use crate::types::{Column, LoanStore};

pub use delay::{compute_delay_by_age, compute_delay_by_gender, AgeBucket, AgeDelay, DelayStats, GenderDelay};
pub use heatmap::{compute_heatmap, Heatmap};
pub use metrics::{compute_metrics, HeadlineMetrics};
pub use ranking::{PersonCount, TitleCount, TopPerson};
pub use time_series::{compute_time_series, TimeSeries};

/// Every view (or independently degrading sub-view) the engine can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    TimeSeries,
    Heatmap,
    UniqueBorrowers,
    CurrentlyLoaned,
    AverageLoanDays,
    TopBooks,
    TopPeople,
    DelayByGenre,
    DelayByAge,
}

impl View {
    /// Source columns this view cannot be computed without.
    pub fn required_columns(self) -> &'static [Column] {
        match self {
            View::TimeSeries => &[Column::LoanDate, Column::ItemType],
            View::Heatmap => &[Column::LoanDate],
            View::UniqueBorrowers => &[Column::BorrowerName],
            View::CurrentlyLoaned => &[Column::ActualReturnDate],
            View::AverageLoanDays => &[Column::LoanDate, Column::ActualReturnDate],
            View::TopBooks => &[Column::ItemTitle],
            View::TopPeople => &[Column::BorrowerName],
            View::DelayByGenre => &[
                Column::ExpectedReturnDate,
                Column::ActualReturnDate,
                Column::BorrowerGender,
            ],
            View::DelayByAge => &[Column::ExpectedReturnDate, Column::ActualReturnDate],
        }
    }
}

/// Marker returned in place of a view whose source columns are missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewUnavailable {
    /// Human-readable reason.
    pub error: String,
    /// Header names of the missing columns.
    pub missing_columns: Vec<&'static str>,
}

/// Outcome of a view computation: the view itself, or a degraded marker.
///
/// Serialized untagged, so the wire shape is either the view object or
/// `{"error": ..., "missing_columns": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ViewResult<T> {
    Available(T),
    Unavailable(ViewUnavailable),
}

impl<T> ViewResult<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, ViewResult::Available(_))
    }

    /// The view, if it could be computed.
    pub fn available(self) -> Option<T> {
        match self {
            ViewResult::Available(v) => Some(v),
            ViewResult::Unavailable(_) => None,
        }
    }

    /// The degraded marker, if the view could not be computed.
    pub fn unavailable(&self) -> Option<&ViewUnavailable> {
        match self {
            ViewResult::Available(_) => None,
            ViewResult::Unavailable(u) => Some(u),
        }
    }
}

/// Check `view`'s required columns against the store.
pub fn require(store: &LoanStore, view: View) -> Result<(), ViewUnavailable> {
    let missing = store.missing_columns(view.required_columns());
    if missing.is_empty() {
        return Ok(());
    }
    let names: Vec<&'static str> = missing.iter().map(|c| c.header()).collect();
    Err(ViewUnavailable {
        error: format!("missing columns: {}", names.join(", ")),
        missing_columns: names,
    })
}

/// Run `compute` if the store carries every column `view` needs.
pub(crate) fn with_required<T>(
    store: &LoanStore,
    view: View,
    compute: impl FnOnce(&LoanStore) -> T,
) -> ViewResult<T> {
    match require(store, view) {
        Ok(()) => ViewResult::Available(compute(store)),
        Err(unavailable) => ViewResult::Unavailable(unavailable),
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
