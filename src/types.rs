//! Core data model for the circulation log.
//!
//! Ingestion turns the source table into a [`LoanStore`]: an immutable, ordered list of
//! [`LoanRecord`]s plus the set of source [`Column`]s that were actually present.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDateTime;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// A source column the loan schema knows about.
///
/// Headers are matched by name (after trimming), never by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    /// `Nome da pessoa`
    BorrowerName,
    /// `Título`
    ItemTitle,
    /// `Nome tipo obra`
    ItemType,
    /// `Data de empréstimo`
    LoanDate,
    /// `Data devolução prevista`
    ExpectedReturnDate,
    /// `Data devolução efetiva`
    ActualReturnDate,
    /// `Gênero`
    BorrowerGender,
    /// `Idade`
    BorrowerAge,
}

impl Column {
    /// Every column of the loan schema, in declaration order.
    pub const ALL: [Column; 8] = [
        Column::BorrowerName,
        Column::ItemTitle,
        Column::ItemType,
        Column::LoanDate,
        Column::ExpectedReturnDate,
        Column::ActualReturnDate,
        Column::BorrowerGender,
        Column::BorrowerAge,
    ];

    /// The header name used by the source system.
    pub fn header(self) -> &'static str {
        match self {
            Column::BorrowerName => "Nome da pessoa",
            Column::ItemTitle => "Título",
            Column::ItemType => "Nome tipo obra",
            Column::LoanDate => "Data de empréstimo",
            Column::ExpectedReturnDate => "Data devolução prevista",
            Column::ActualReturnDate => "Data devolução efetiva",
            Column::BorrowerGender => "Gênero",
            Column::BorrowerAge => "Idade",
        }
    }

    /// Resolve a raw header cell. Surrounding whitespace is ignored.
    pub fn from_header(raw: &str) -> Option<Self> {
        let name = raw.trim();
        Self::ALL.into_iter().find(|c| c.header() == name)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// One borrowing event.
///
/// Every field is optional: a value that was blank or failed to parse is `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoanRecord {
    pub borrower_name: Option<String>,
    pub item_title: Option<String>,
    pub item_type: Option<String>,
    pub loan_date: Option<NaiveDateTime>,
    pub expected_return_date: Option<NaiveDateTime>,
    /// `None` means the item is still out on loan.
    pub actual_return_date: Option<NaiveDateTime>,
    pub borrower_gender: Option<String>,
    pub borrower_age: Option<f64>,
}

/// Lateness of a returned loan relative to its expected return date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanDelay {
    /// `actual - expected` in fractional days. Negative for early returns.
    pub delay_days: f64,
    /// Strictly positive delay. A same-day return is not delayed.
    pub is_delayed: bool,
}

impl LoanRecord {
    /// True when no actual return date was recorded.
    pub fn is_on_loan(&self) -> bool {
        self.actual_return_date.is_none()
    }

    /// Days between loan and actual return, if both are known.
    pub fn loan_days(&self) -> Option<f64> {
        let start = self.loan_date?;
        let end = self.actual_return_date?;
        Some(days_between(start, end))
    }

    /// Delay against the expected return date, if both return dates are known.
    pub fn delay(&self) -> Option<LoanDelay> {
        let expected = self.expected_return_date?;
        let actual = self.actual_return_date?;
        let delay_days = days_between(expected, actual);
        Some(LoanDelay {
            delay_days,
            is_delayed: delay_days > 0.0,
        })
    }
}

fn days_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Immutable in-memory record store.
///
/// Built once by ingestion (or directly, for synthetic data) and shared read-only with the
/// analytics engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoanStore {
    records: Vec<LoanRecord>,
    columns: BTreeSet<Column>,
}

impl LoanStore {
    /// Create a store from records and the set of columns present in the source.
    pub fn new(records: Vec<LoanRecord>, columns: impl IntoIterator<Item = Column>) -> Self {
        Self {
            records,
            columns: columns.into_iter().collect(),
        }
    }

    /// Create a store whose source is assumed to carry every column.
    pub fn with_all_columns(records: Vec<LoanRecord>) -> Self {
        Self::new(records, Column::ALL)
    }

    /// Records in source order.
    pub fn records(&self) -> &[LoanRecord] {
        &self.records
    }

    /// Number of records in the store.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Columns present in the source.
    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.columns.iter().copied()
    }

    /// Whether `column` was present in the source header.
    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// The subset of `required` that the source lacks, in the order given.
    pub fn missing_columns(&self, required: &[Column]) -> Vec<Column> {
        required
            .iter()
            .copied()
            .filter(|c| !self.has_column(*c))
            .collect()
    }

    /// Iterate records matching `predicate`, without copying.
    pub fn filter_records<'a, F>(&'a self, mut predicate: F) -> impl Iterator<Item = &'a LoanRecord>
    where
        F: FnMut(&LoanRecord) -> bool + 'a,
    {
        self.records.iter().filter(move |r| predicate(r))
    }

    /// Fold all records into an accumulator value.
    pub fn reduce_records<A, F>(&self, init: A, mut reducer: F) -> A
    where
        F: FnMut(A, &LoanRecord) -> A,
    {
        self.records.iter().fold(init, |acc, r| reducer(acc, r))
    }
}
