//! Delimited-text ingestion of the circulation log.

use std::borrow::Cow;
use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{Column, LoanRecord, LoanStore};

use super::dates::{parse_age, parse_timestamp, DateOrder};
use super::observability::IngestionStats;

/// Layout of the source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanCsvFormat {
    /// Field delimiter. The source system exports with `;`.
    pub delimiter: u8,
    /// How ambiguous slash dates are read.
    pub date_order: DateOrder,
}

impl Default for LoanCsvFormat {
    fn default() -> Self {
        Self {
            delimiter: b';',
            date_order: DateOrder::DayFirst,
        }
    }
}

impl LoanCsvFormat {
    /// A `csv` reader builder configured for this layout.
    ///
    /// Rows may be shorter than the header; the missing cells read as absent.
    pub fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(true)
            .delimiter(self.delimiter)
            .flexible(true);
        builder
    }
}

/// Ingest a delimited file into a [`LoanStore`].
///
/// Rules:
///
/// - The file must have a header row.
/// - Columns are matched by trimmed header name; order does not matter.
/// - Unknown columns are ignored; known columns that are absent are recorded as missing.
/// - A cell that fails to parse is stored as absent; the row is always kept.
pub fn ingest_loans_csv_from_path(
    path: impl AsRef<Path>,
    format: &LoanCsvFormat,
) -> IngestionResult<LoanStore> {
    ingest_loans_csv_from_path_with_stats(path, format).map(|(store, _)| store)
}

/// Like [`ingest_loans_csv_from_path`], also returning ingestion stats.
pub fn ingest_loans_csv_from_path_with_stats(
    path: impl AsRef<Path>,
    format: &LoanCsvFormat,
) -> IngestionResult<(LoanStore, IngestionStats)> {
    let mut rdr = format.reader_builder().from_path(path)?;
    ingest_loans_csv_from_reader_with_stats(&mut rdr, format.date_order)
}

/// Ingest loan rows from an existing CSV reader.
pub fn ingest_loans_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    date_order: DateOrder,
) -> IngestionResult<LoanStore> {
    ingest_loans_csv_from_reader_with_stats(rdr, date_order).map(|(store, _)| store)
}

/// Ingest loan rows from an existing CSV reader, also returning ingestion stats.
pub fn ingest_loans_csv_from_reader_with_stats<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    date_order: DateOrder,
) -> IngestionResult<(LoanStore, IngestionStats)> {
    let headers = rdr.byte_headers()?.clone();
    if headers.is_empty() || headers.iter().all(|h| h.iter().all(u8::is_ascii_whitespace)) {
        return Err(IngestionError::EmptySource);
    }

    // Schema column -> source index. The first matching header wins.
    let mut col_idxs: [Option<usize>; Column::ALL.len()] = [None; Column::ALL.len()];
    for (idx, raw) in headers.iter().enumerate() {
        if let Some(col) = Column::from_header(&String::from_utf8_lossy(raw)) {
            let slot = &mut col_idxs[col as usize];
            if slot.is_none() {
                *slot = Some(idx);
            }
        }
    }

    let present: Vec<Column> = Column::ALL
        .into_iter()
        .filter(|c| col_idxs[*c as usize].is_some())
        .collect();
    let missing: Vec<Column> = Column::ALL
        .into_iter()
        .filter(|c| col_idxs[*c as usize].is_none())
        .collect();
    for col in &missing {
        log::warn!("source has no '{col}' column; views that need it will be unavailable");
    }

    let mut records = Vec::new();
    let mut unparsable_values = 0usize;
    for (row_idx0, result) in rdr.byte_records().enumerate() {
        // 1-based, +1 again for the header row.
        let user_row = row_idx0 + 2;
        let record = result?;

        let cell = |col: Column| -> Option<Cow<'_, str>> {
            col_idxs[col as usize]
                .and_then(|i| record.get(i))
                .map(String::from_utf8_lossy)
        };

        let mut timestamp = |col: Column| {
            let raw = cell(col)?;
            let parsed = parse_timestamp(&raw, date_order);
            if parsed.is_none() && !raw.trim().is_empty() {
                unparsable_values += 1;
                log::debug!("row {user_row}: unparsable date in '{col}' (raw='{raw}')");
            }
            parsed
        };
        let loan_date = timestamp(Column::LoanDate);
        let expected_return_date = timestamp(Column::ExpectedReturnDate);
        let actual_return_date = timestamp(Column::ActualReturnDate);

        let borrower_age = cell(Column::BorrowerAge).and_then(|raw| {
            let parsed = parse_age(&raw);
            if parsed.is_none() && !raw.trim().is_empty() {
                unparsable_values += 1;
                log::debug!(
                    "row {user_row}: unparsable age in '{}' (raw='{raw}')",
                    Column::BorrowerAge
                );
            }
            parsed
        });

        records.push(LoanRecord {
            borrower_name: text(cell(Column::BorrowerName)),
            item_title: text(cell(Column::ItemTitle)),
            item_type: text(cell(Column::ItemType)),
            loan_date,
            expected_return_date,
            actual_return_date,
            borrower_gender: text(cell(Column::BorrowerGender)),
            borrower_age,
        });
    }

    let stats = IngestionStats {
        rows: records.len(),
        unparsable_values,
        missing_columns: missing,
    };
    Ok((LoanStore::new(records, present), stats))
}

fn text(raw: Option<Cow<'_, str>>) -> Option<String> {
    let raw = raw?;
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw.into_owned())
    }
}
