//! Headline numbers shown at the top of the dashboard.
//!
//! Each sub-metric is computed on its own. When a sub-metric's columns are missing it falls back
//! to its empty value (`0`, `[]` or `null`) and the sub-view is listed in
//! [`HeadlineMetrics::unavailable`]; the rest of the response is unaffected.

use std::collections::HashSet;

use serde::Serialize;

use crate::config::AnalyticsConfig;
use crate::types::LoanStore;

use super::delay::{compute_delay_by_age, compute_delay_by_gender, AgeDelay, GenderDelay};
use super::ranking::{top_n_by_frequency, PersonCount, TitleCount, TopPerson};
use super::{round_to, with_required, View, ViewResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlineMetrics {
    pub total_records: usize,
    pub unique_borrowers: usize,
    pub currently_loaned: usize,
    /// Mean loan duration in days, 2 decimals. `None` when no loan has both dates.
    pub average_loan_days: Option<f64>,
    pub top_books: Vec<TitleCount>,
    pub top_people: Vec<PersonCount>,
    pub top_person: TopPerson,
    pub delay_by_genre: Vec<GenderDelay>,
    pub delay_by_age: Vec<AgeDelay>,
    /// Sub-views that fell back to their empty value.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unavailable: Vec<View>,
}

/// Distinct non-blank borrower names.
pub fn count_unique_borrowers(store: &LoanStore) -> ViewResult<usize> {
    with_required(store, View::UniqueBorrowers, |store| {
        store
            .records()
            .iter()
            .filter_map(|r| r.borrower_name.as_deref())
            .collect::<HashSet<_>>()
            .len()
    })
}

/// Records with no actual return date.
pub fn count_currently_loaned(store: &LoanStore) -> ViewResult<usize> {
    with_required(store, View::CurrentlyLoaned, |store| {
        store.filter_records(|r| r.is_on_loan()).count()
    })
}

/// Mean of `actual_return - loan_date` in days, over records with both dates.
pub fn average_loan_days(store: &LoanStore) -> ViewResult<Option<f64>> {
    with_required(store, View::AverageLoanDays, |store| {
        let (sum, n) = store.reduce_records((0.0f64, 0usize), |(sum, n), r| match r.loan_days() {
            Some(days) => (sum + days, n + 1),
            None => (sum, n),
        });
        (n > 0).then(|| round_to(sum / n as f64, 2))
    })
}

/// Most borrowed titles, skipping denylisted titles.
pub fn top_books(store: &LoanStore, config: &AnalyticsConfig) -> ViewResult<Vec<TitleCount>> {
    with_required(store, View::TopBooks, |store| {
        let titles = store
            .records()
            .iter()
            .filter_map(|r| r.item_title.as_deref())
            .filter(|t| !config.is_denied_title(t));
        top_n_by_frequency(titles, config.top_n)
            .into_iter()
            .map(|(title, count)| TitleCount {
                title: title.to_string(),
                count,
            })
            .collect()
    })
}

/// Most frequent borrowers.
pub fn top_people(store: &LoanStore, config: &AnalyticsConfig) -> ViewResult<Vec<PersonCount>> {
    with_required(store, View::TopPeople, |store| {
        let names = store
            .records()
            .iter()
            .filter_map(|r| r.borrower_name.as_deref());
        top_n_by_frequency(names, config.top_n)
            .into_iter()
            .map(|(person, count)| PersonCount {
                person: person.to_string(),
                count,
            })
            .collect()
    })
}

/// Compute every headline metric. Never fails; see the module docs for fallbacks.
pub fn compute_metrics(store: &LoanStore, config: &AnalyticsConfig) -> HeadlineMetrics {
    let mut unavailable = Vec::new();
    let mut fallback = Fallback(&mut unavailable);

    let unique_borrowers = fallback.take(View::UniqueBorrowers, count_unique_borrowers(store));
    let currently_loaned = fallback.take(View::CurrentlyLoaned, count_currently_loaned(store));
    let average_loan_days = fallback.take(View::AverageLoanDays, average_loan_days(store));
    let top_books = fallback.take(View::TopBooks, top_books(store, config));
    let top_people = fallback.take(View::TopPeople, top_people(store, config));
    let delay_by_genre = fallback.take(View::DelayByGenre, compute_delay_by_gender(store));
    let delay_by_age = fallback.take(View::DelayByAge, compute_delay_by_age(store));

    HeadlineMetrics {
        total_records: store.record_count(),
        unique_borrowers,
        currently_loaned,
        average_loan_days,
        top_person: TopPerson::from(top_people.first()),
        top_books,
        top_people,
        delay_by_genre,
        delay_by_age,
        unavailable,
    }
}

struct Fallback<'a>(&'a mut Vec<View>);

impl Fallback<'_> {
    fn take<T: Default>(&mut self, view: View, result: ViewResult<T>) -> T {
        match result {
            ViewResult::Available(v) => v,
            ViewResult::Unavailable(u) => {
                log::debug!("{view:?} unavailable: {}", u.error);
                self.0.push(view);
                T::default()
            }
        }
    }
}
