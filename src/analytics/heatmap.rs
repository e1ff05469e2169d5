//! Weekday × hour loan counts.

use chrono::{Datelike, Timelike, Weekday};
use serde::Serialize;

use crate::types::LoanStore;

use super::{with_required, View, ViewResult};

/// First hour column (inclusive).
pub const FIRST_HOUR: u32 = 7;
/// Last hour column (inclusive).
pub const LAST_HOUR: u32 = 22;
/// Number of hour columns.
pub const HOUR_COUNT: usize = (LAST_HOUR - FIRST_HOUR + 1) as usize;

/// Row order of the grid.
pub const WEEKDAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

/// Local-language weekday name shown on the dashboard.
pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Segunda",
        Weekday::Tue => "Terça",
        Weekday::Wed => "Quarta",
        Weekday::Thu => "Quinta",
        Weekday::Fri => "Sexta",
        Weekday::Sat => "Sábado",
        Weekday::Sun => "Domingo",
    }
}

/// Loan counts on a fixed grid: Monday–Friday rows, 07:00–22:00 columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heatmap {
    pub weekdays: [&'static str; 5],
    pub hours: [u32; HOUR_COUNT],
    /// `values[row][col]` counts loans on `weekdays[row]` during hour `hours[col]`.
    pub values: [[usize; HOUR_COUNT]; 5],
}

impl Heatmap {
    fn empty() -> Self {
        Self {
            weekdays: WEEKDAYS.map(weekday_label),
            hours: std::array::from_fn(|i| FIRST_HOUR + i as u32),
            values: [[0; HOUR_COUNT]; 5],
        }
    }

    /// Sum of all cells.
    pub fn total(&self) -> usize {
        self.values.iter().flatten().sum()
    }
}

/// Count dated loans by weekday and hour.
///
/// Weekend loans and loans outside [`FIRST_HOUR`]..=[`LAST_HOUR`] are not counted. The grid is
/// always complete; empty cells are zero.
pub fn compute_heatmap(store: &LoanStore) -> ViewResult<Heatmap> {
    with_required(store, View::Heatmap, |store| {
        let mut grid = Heatmap::empty();
        for date in store.records().iter().filter_map(|r| r.loan_date) {
            let row = date.weekday().num_days_from_monday() as usize;
            let hour = date.hour();
            if row >= WEEKDAYS.len() || !(FIRST_HOUR..=LAST_HOUR).contains(&hour) {
                continue;
            }
            grid.values[row][(hour - FIRST_HOUR) as usize] += 1;
        }
        grid
    })
}
