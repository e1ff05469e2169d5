//! Monthly loan counts for the two tracked item types.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;

use crate::types::LoanStore;

use super::{with_required, View, ViewResult};

/// Item type of book loans.
pub const BOOK_ITEM_TYPE: &str = "Livros";
/// Item type of notebook (device) loans.
pub const NOTEBOOK_ITEM_TYPE: &str = "Notebook";

/// Loans per calendar month, split by item type.
///
/// The three vectors are parallel: `livros[i]` and `notebook[i]` belong to `months[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSeries {
    /// `YYYY-MM`, chronological. Only months with at least one tracked loan appear.
    pub months: Vec<String>,
    pub livros: Vec<usize>,
    pub notebook: Vec<usize>,
}

/// Count book and notebook loans per month.
///
/// Records need both a parsed loan date and an item type of exactly [`BOOK_ITEM_TYPE`] or
/// [`NOTEBOOK_ITEM_TYPE`]; anything else is left out.
pub fn compute_time_series(store: &LoanStore) -> ViewResult<TimeSeries> {
    with_required(store, View::TimeSeries, |store| {
        let mut by_month: BTreeMap<(i32, u32), (usize, usize)> = BTreeMap::new();
        for record in store.records() {
            let (Some(date), Some(kind)) = (record.loan_date, record.item_type.as_deref()) else {
                continue;
            };
            let counts = match kind {
                BOOK_ITEM_TYPE | NOTEBOOK_ITEM_TYPE => {
                    by_month.entry((date.year(), date.month())).or_default()
                }
                _ => continue,
            };
            if kind == BOOK_ITEM_TYPE {
                counts.0 += 1;
            } else {
                counts.1 += 1;
            }
        }

        let mut series = TimeSeries {
            months: Vec::with_capacity(by_month.len()),
            livros: Vec::with_capacity(by_month.len()),
            notebook: Vec::with_capacity(by_month.len()),
        };
        for ((year, month), (livros, notebook)) in by_month {
            series.months.push(format!("{year:04}-{month:02}"));
            series.livros.push(livros);
            series.notebook.push(notebook);
        }
        series
    })
}
