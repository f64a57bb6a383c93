//! Display ordering of siblings.
//!
//! Stored `children` keep insertion order. Sorting only ever happens on
//! copies handed to presentation code.

use std::cmp::Ordering;

use crate::model::event::TimelineEvent;
use crate::util::date::{from_scalar, sort_key, to_scalar, today_string};

/// Ascending by signed year, then month, then day.
pub fn compare_dates(a: &str, b: &str) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}

/// Siblings in display order. Ties keep insertion order.
pub fn sorted_siblings(events: &[TimelineEvent]) -> Vec<&TimelineEvent> {
    let mut sorted: Vec<&TimelineEvent> = events.iter().collect();
    sorted.sort_by(|a, b| compare_dates(&a.date, &b.date));
    sorted
}

/// Propose a date between two neighbouring dates.
///
/// With both neighbours the midpoint month is used. With one neighbour the
/// date lands one month past it. With none, today.
pub fn date_between(prev: Option<&str>, next: Option<&str>) -> String {
    match (prev, next) {
        (Some(a), Some(b)) => {
            // the midpoint of two i64 values always fits back into i64
            let (lo, hi) = (i128::from(to_scalar(a)), i128::from(to_scalar(b)));
            let mid = lo + (hi - lo).div_euclid(2);
            from_scalar(i64::try_from(mid).unwrap_or(if mid < 0 { i64::MIN } else { i64::MAX }))
        }
        (Some(a), None) => from_scalar(to_scalar(a).saturating_add(1)),
        (None, Some(b)) => from_scalar(to_scalar(b).saturating_sub(1)),
        (None, None) => today_string(),
    }
}

/// Date for a new sibling placed right after `after_id` in the sorted view.
/// `None` if `after_id` is not among `siblings`.
pub fn date_after(siblings: &[TimelineEvent], after_id: &str) -> Option<String> {
    let sorted = sorted_siblings(siblings);
    let idx = sorted.iter().position(|e| e.id == after_id)?;
    let prev = sorted[idx].date.as_str();
    let next = sorted.get(idx + 1).map(|e| e.date.as_str());
    Some(date_between(Some(prev), next))
}
