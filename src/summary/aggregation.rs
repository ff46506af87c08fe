//! Grouping and bucketing of expense amounts for charts.

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::money::cents_to_major;

/// Entries smaller than this are merged into [OTHER_LABEL] in year summaries, 500.00 in cents.
pub const OTHER_THRESHOLD_CENTS: i64 = 50_000;

/// The label of the entry that collects small amounts.
pub const OTHER_LABEL: &str = "Other";

/// The label of the entry for salary left after expenses and savings.
pub const REMAINING_LABEL: &str = "Remaining";

/// A labelled amount in major currency units, ready for a pie or bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEntry {
    pub name: String,
    pub amount: f64,
}

/// A labelled amount in cents, used while aggregating.
pub(super) type CentsEntry = (String, i64);

/// Sum `amount_cents` per key, keeping the order in which keys first appear.
pub(super) fn sum_by_key<K, L>(
    items: impl IntoIterator<Item = (K, L, i64)>,
) -> Vec<CentsEntry>
where
    K: Eq + Hash,
    L: Into<String>,
{
    let mut index_by_key: HashMap<K, usize> = HashMap::new();
    let mut totals: Vec<CentsEntry> = Vec::new();

    for (key, label, amount_cents) in items {
        match index_by_key.get(&key) {
            Some(&index) => totals[index].1 += amount_cents,
            None => {
                index_by_key.insert(key, totals.len());
                totals.push((label.into(), amount_cents));
            }
        }
    }

    totals
}

/// Sort entries by amount, largest first, and merge entries below
/// [OTHER_THRESHOLD_CENTS] into a trailing [OTHER_LABEL] entry.
///
/// Entries with equal amounts keep their relative order. The [OTHER_LABEL]
/// entry is only added when the merged amount is positive.
pub(super) fn bucket_small_entries(mut entries: Vec<CentsEntry>) -> Vec<CentsEntry> {
    entries.sort_by(|a, b| b.1.cmp(&a.1));

    let (mut main, small): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|(_, amount_cents)| *amount_cents >= OTHER_THRESHOLD_CENTS);

    let other_cents: i64 = small.iter().map(|(_, amount_cents)| amount_cents).sum();

    if other_cents > 0 {
        main.push((OTHER_LABEL.to_owned(), other_cents));
    }

    main
}

/// Convert aggregated cents into chart entries.
pub(super) fn to_chart_entries(entries: Vec<CentsEntry>) -> Vec<ChartEntry> {
    entries
        .into_iter()
        .map(|(name, amount_cents)| ChartEntry {
            name,
            amount: cents_to_major(amount_cents),
        })
        .collect()
}
