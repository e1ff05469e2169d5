//! `circulation-analytics` turns a library's circulation log into the aggregate views behind the
//! circulation dashboard.
//!
//! The log is a semicolon-delimited export with one row per loan. It is read once into an
//! immutable [`types::LoanStore`], then queried any number of times through an
//! [`execution::AnalyticsEngine`].
//!
//! ## Ingestion
//!
//! Columns are matched by (trimmed) header name, never by position:
//!
//! | Header                    | Field                  |
//! |---------------------------|------------------------|
//! | `Nome da pessoa`          | borrower name          |
//! | `Título`                  | item title             |
//! | `Nome tipo obra`          | item type              |
//! | `Data de empréstimo`      | loan date              |
//! | `Data devolução prevista` | expected return date   |
//! | `Data devolução efetiva`  | actual return date     |
//! | `Gênero`                  | borrower gender        |
//! | `Idade`                   | borrower age           |
//!
//! Ingestion is tolerant: a date or age that does not parse becomes an absent field, and a row
//! is never dropped. A column missing from the header only disables the views that need it.
//! The only fatal errors are structural ones (unreadable file, no header row); see
//! [`IngestionError`].
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use circulation_analytics::config::AnalyticsConfig;
//! use circulation_analytics::execution::AnalyticsEngine;
//! use circulation_analytics::ingestion::{ingest_from_path, IngestionOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ingest_from_path("basededados_biblio_2025.csv", &IngestionOptions::default())?;
//! let engine = AnalyticsEngine::new(Arc::new(store), AnalyticsConfig::default());
//!
//! let metrics = engine.metrics();
//! println!("on loan now: {}", metrics.currently_loaned);
//! println!("{}", engine.dashboard_json()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Views
//!
//! - **Time series**: monthly loan counts for `Livros` and `Notebook`.
//! - **Heatmap**: Monday–Friday × 07:00–22:00 loan counts, always 5 × 16.
//! - **Headline metrics**: totals, unique borrowers, loans still out, average loan length,
//!   top books (minus a configurable denylist), top borrowers, and return-delay breakdowns by
//!   gender and age bucket.
//!
//! A view whose columns are missing returns [`analytics::ViewResult::Unavailable`] naming them.
//! Headline sub-metrics fall back one by one to `0`, `[]` or `null` instead.
//!
//! ## Working with synthetic data
//!
//! ```rust
//! use chrono::NaiveDate;
//! use circulation_analytics::analytics::compute_metrics;
//! use circulation_analytics::config::AnalyticsConfig;
//! use circulation_analytics::types::{LoanRecord, LoanStore};
//!
//! let day = |d| NaiveDate::from_ymd_opt(2025, 1, d).and_then(|d| d.and_hms_opt(0, 0, 0));
//! let store = LoanStore::with_all_columns(vec![
//!     LoanRecord {
//!         borrower_name: Some("Ana".into()),
//!         expected_return_date: day(10),
//!         actual_return_date: day(12),
//!         ..Default::default()
//!     },
//!     LoanRecord {
//!         borrower_name: Some("Ana".into()),
//!         ..Default::default()
//!     },
//! ]);
//!
//! let m = compute_metrics(&store, &AnalyticsConfig::default());
//! assert_eq!(m.currently_loaned, 1);
//! assert_eq!(m.top_person.person.as_deref(), Some("Ana"));
//! assert_eq!(m.delay_by_age[0].stats.delayed, 1);
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: reading the export, value coercion, ingestion observers
//! - [`types`]: loan records and the record store
//! - [`analytics`]: the pure view computations
//! - [`execution`]: the query engine with observer hooks and metrics
//! - [`config`]: ranking length and title denylist
//! - [`error`]: error types

pub mod analytics;
pub mod config;
pub mod error;
pub mod execution;
pub mod ingestion;
pub mod types;

pub use error::{ConfigError, ConfigResult, IngestionError, IngestionResult};
