//! Return-delay statistics by gender and by age bucket.
//!
//! Only returned loans with a known expected return date take part. A loan is *delayed* when it
//! came back strictly after the expected date; early returns count toward `avg_delay` with a
//! negative value.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{LoanDelay, LoanRecord, LoanStore};

use super::{round_to, with_required, View, ViewResult};

/// Age ranges used to group borrowers. Lower bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AgeBucket {
    #[serde(rename = "<20")]
    Under20,
    #[serde(rename = "20-29")]
    From20To29,
    #[serde(rename = "30-39")]
    From30To39,
    #[serde(rename = "40-49")]
    From40To49,
    #[serde(rename = "50+")]
    From50,
    /// No usable age on the record.
    Unknown,
}

impl AgeBucket {
    pub fn from_age(age: Option<f64>) -> Self {
        match age {
            Some(a) if a.is_nan() => AgeBucket::Unknown,
            Some(a) if a < 20.0 => AgeBucket::Under20,
            Some(a) if a < 30.0 => AgeBucket::From20To29,
            Some(a) if a < 40.0 => AgeBucket::From30To39,
            Some(a) if a < 50.0 => AgeBucket::From40To49,
            Some(_) => AgeBucket::From50,
            None => AgeBucket::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeBucket::Under20 => "<20",
            AgeBucket::From20To29 => "20-29",
            AgeBucket::From30To39 => "30-39",
            AgeBucket::From40To49 => "40-49",
            AgeBucket::From50 => "50+",
            AgeBucket::Unknown => "Unknown",
        }
    }
}

/// Delay summary for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelayStats {
    pub total: usize,
    pub delayed: usize,
    /// `delayed / total`, 3 decimals. Zero for an empty group.
    pub pct_delayed: f64,
    /// Mean `delay_days`, early returns included. `None` for an empty group.
    pub avg_delay: Option<f64>,
}

/// Delay summary for one gender value, exactly as it appears in the source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderDelay {
    #[serde(rename = "Gênero")]
    pub gender: String,
    #[serde(flatten)]
    pub stats: DelayStats,
}

/// Delay summary for one age bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeDelay {
    pub age_group: AgeBucket,
    #[serde(flatten)]
    pub stats: DelayStats,
}

#[derive(Debug, Default)]
struct DelayAccumulator {
    total: usize,
    delayed: usize,
    delay_sum: f64,
}

impl DelayAccumulator {
    fn push(&mut self, delay: LoanDelay) {
        self.total += 1;
        if delay.is_delayed {
            self.delayed += 1;
        }
        self.delay_sum += delay.delay_days;
    }

    fn finish(self) -> DelayStats {
        if self.total == 0 {
            return DelayStats {
                total: 0,
                delayed: 0,
                pct_delayed: 0.0,
                avg_delay: None,
            };
        }
        let total = self.total as f64;
        DelayStats {
            total: self.total,
            delayed: self.delayed,
            pct_delayed: round_to(self.delayed as f64 / total, 3),
            avg_delay: Some(self.delay_sum / total),
        }
    }
}

fn returned_with_delay(store: &LoanStore) -> impl Iterator<Item = (&LoanRecord, LoanDelay)> {
    store
        .records()
        .iter()
        .filter_map(|r| r.delay().map(|d| (r, d)))
}

/// Delay stats per gender, sorted by gender label.
///
/// Records without a gender value are left out of this breakdown.
pub fn compute_delay_by_gender(store: &LoanStore) -> ViewResult<Vec<GenderDelay>> {
    with_required(store, View::DelayByGenre, |store| {
        let mut groups: BTreeMap<&str, DelayAccumulator> = BTreeMap::new();
        for (record, delay) in returned_with_delay(store) {
            if let Some(gender) = record.borrower_gender.as_deref() {
                groups.entry(gender).or_default().push(delay);
            }
        }
        groups
            .into_iter()
            .map(|(gender, acc)| GenderDelay {
                gender: gender.to_string(),
                stats: acc.finish(),
            })
            .collect()
    })
}

/// Delay stats per age bucket, in bucket order. Every qualifying record lands in a bucket.
pub fn compute_delay_by_age(store: &LoanStore) -> ViewResult<Vec<AgeDelay>> {
    with_required(store, View::DelayByAge, |store| {
        let mut groups: BTreeMap<AgeBucket, DelayAccumulator> = BTreeMap::new();
        for (record, delay) in returned_with_delay(store) {
            groups
                .entry(AgeBucket::from_age(record.borrower_age))
                .or_default()
                .push(delay);
        }
        groups
            .into_iter()
            .map(|(age_group, acc)| AgeDelay {
                age_group,
                stats: acc.finish(),
            })
            .collect()
    })
}
