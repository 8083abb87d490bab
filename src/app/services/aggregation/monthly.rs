//! Monthly activity series

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, Months, NaiveDate};

use crate::app::models::{CanonicalView, MonthlyBucket};
use crate::app::services::reporter::Reporter;
use crate::config::MonthlyOptions;

/// Count views per calendar month, including empty months in between
///
/// Months come from each view's local wall-clock time with the offset
/// discarded. The result runs from the earliest to the latest month,
/// ascending, one row per month.
pub fn bucket_by_month(
    views: &[CanonicalView],
    options: &MonthlyOptions,
    reporter: &Reporter<'_>,
) -> Vec<MonthlyBucket> {
    if options.warn_on_offset_loss {
        let offsets: HashSet<i32> = views
            .iter()
            .map(|view| view.viewed_at.offset().local_minus_utc())
            .collect();
        if offsets.len() > 1 {
            reporter.warn(format!(
                "Views span {} UTC offsets; monthly counts use local wall-clock months",
                offsets.len()
            ));
        }
    }

    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for view in views {
        if let Some(month) = month_start(view.viewed_at.date_naive()) {
            *counts.entry(month).or_default() += 1;
        }
    }

    let (Some((&first, _)), Some((&last, _))) = (counts.first_key_value(), counts.last_key_value())
    else {
        return Vec::new();
    };

    let mut buckets = Vec::new();
    let mut month = first;
    while month <= last {
        buckets.push(MonthlyBucket {
            month: month.and_time(chrono::NaiveTime::MIN),
            count: counts.get(&month).copied().unwrap_or(0),
        });
        match month.checked_add_months(Months::new(1)) {
            Some(next) => month = next,
            None => break,
        }
    }

    reporter.count(buckets.len(), "months");
    buckets
}

fn month_start(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)
}
