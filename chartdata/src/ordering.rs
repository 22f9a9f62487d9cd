//! FILENAME: chartdata/src/ordering.rs
//! Category ordering, applied to a pivoted frame before it becomes a view.
//!
//! All series are reordered in lock-step with the categories: the sort
//! produces one permutation, applied to codes, labels and every series'
//! data alike, so the alignment invariant survives any mode.

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::definition::OrderMode;
use crate::view::Series;

/// Canonical protocol order of reporting countries: the pseudo-aggregate
/// `all` pinned first, then the EU/EA aggregates, member states in protocol
/// order, then EFTA and candidate countries. Codes not listed keep their
/// source order after these.
pub const PROTOCOL_ORDER: &[&str] = &[
    "all", "EU27_2020", "EA",
    "BE", "BG", "CZ", "DK", "DE", "EE", "IE", "EL", "ES", "FR", "HR", "IT",
    "CY", "LV", "LT", "LU", "HU", "MT", "NL", "AT", "PL", "PT", "RO", "SI",
    "SK", "FI", "SE",
    "IS", "LI", "NO", "ME", "MK", "AL", "RS", "TR", "BA", "XK", "MD", "UA",
    "GE",
];

static PROTO_RANK: Lazy<FxHashMap<&'static str, usize>> = Lazy::new(|| {
    PROTOCOL_ORDER
        .iter()
        .enumerate()
        .map(|(rank, code)| (*code, rank))
        .collect()
});

/// Reorders a pivoted frame in place.
///
/// `summary` selects the value-sort key: the sole series' value per
/// category in summary mode, the sum across series in detail mode.
pub fn apply_order(
    mode: OrderMode,
    codes: &mut Vec<String>,
    labels: &mut Vec<String>,
    series: &mut [Series],
    summary: bool,
) {
    let count = codes.len();
    let mut permutation: Vec<usize> = (0..count).collect();

    match mode {
        OrderMode::Proto => {
            permutation.sort_by_key(|&i| {
                PROTO_RANK
                    .get(codes[i].as_str())
                    .copied()
                    .unwrap_or(usize::MAX)
            });
        }
        OrderMode::Alfa => {
            let folded: Vec<String> = labels.iter().map(|l| fold_label(l)).collect();
            permutation.sort_by(|&a, &b| folded[a].cmp(&folded[b]));
        }
        OrderMode::Asc | OrderMode::Desc => {
            let keys: Vec<f64> = (0..count).map(|i| sort_key(series, i, summary)).collect();
            permutation.sort_by(|&a, &b| compare_keys(keys[a], keys[b], mode, summary));
        }
    }

    *codes = permute(codes, &permutation);
    *labels = permute(labels, &permutation);
    for series in series.iter_mut() {
        series.data = permute(&series.data, &permutation);
    }
}

/// Value key for one category.
fn sort_key(series: &[Series], index: usize, summary: bool) -> f64 {
    if summary {
        series
            .first()
            .and_then(|s| s.data.get(index).copied().flatten())
            .unwrap_or(0.0)
    } else {
        series
            .iter()
            .filter_map(|s| s.data.get(index).copied().flatten())
            .sum()
    }
}

/// Value comparison for asc/desc. On an exact tie in summary mode an even
/// integer part sorts before an odd one, otherwise the stable sort keeps
/// source order. Kept for backward compatibility, pinned by test.
fn compare_keys(a: f64, b: f64, mode: OrderMode, summary: bool) -> Ordering {
    let primary = match mode {
        OrderMode::Desc => b.partial_cmp(&a),
        _ => a.partial_cmp(&b),
    }
    .unwrap_or(Ordering::Equal);

    if primary == Ordering::Equal && summary {
        parity(a).cmp(&parity(b))
    } else {
        primary
    }
}

fn parity(value: f64) -> u8 {
    if (value as i64) % 2 == 0 {
        0
    } else {
        1
    }
}

/// Case- and punctuation-insensitive collation key.
fn fold_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn permute<T: Clone>(items: &[T], permutation: &[usize]) -> Vec<T> {
    permutation.iter().map(|&i| items[i].clone()).collect()
}
