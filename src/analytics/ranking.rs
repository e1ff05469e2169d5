//! Top-N frequency rankings.

use std::collections::HashMap;

use serde::Serialize;

/// A title and how many times it was borrowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleCount {
    pub title: String,
    pub count: usize,
}

/// A borrower and how many loans they made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonCount {
    pub person: String,
    pub count: usize,
}

/// The single most frequent borrower, or `{person: null, count: 0}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TopPerson {
    pub person: Option<String>,
    pub count: usize,
}

impl From<Option<&PersonCount>> for TopPerson {
    fn from(top: Option<&PersonCount>) -> Self {
        match top {
            Some(p) => Self {
                person: Some(p.person.clone()),
                count: p.count,
            },
            None => Self::default(),
        }
    }
}

/// The `n` most frequent non-blank values with their counts.
///
/// Ordered by count, descending. Equal counts keep the order in which each value was first seen.
pub fn top_n_by_frequency<'a, I>(values: I, n: usize) -> Vec<(&'a str, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut slots: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(&'a str, usize)> = Vec::new();
    for value in values {
        if value.trim().is_empty() {
            continue;
        }
        match slots.get(value) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }
    // Stable sort keeps first-seen order among ties.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}
