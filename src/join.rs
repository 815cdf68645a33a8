//! Ordered inner join of one primary source against date-keyed auxiliaries.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tracing::debug;

use crate::observation::RawObservation;
use crate::stats::JoinStats;

/// A day on which every source had a valid reading.
///
/// `values[0]` is the primary source, followed by each auxiliary in the order
/// they were passed to [`join`].
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRecord {
    pub date: NaiveDate,
    pub values: Vec<f64>,
}

/// Drops records whose value at `column` is strictly below `min`.
#[derive(Debug, Clone, Copy)]
pub struct LowerBound {
    pub column: usize,
    pub min: f64,
}

impl LowerBound {
    pub fn primary(min: f64) -> Self {
        LowerBound { column: 0, min }
    }

    fn admits(&self, values: &[f64]) -> bool {
        values[self.column] >= self.min
    }
}

/// Exact-date lookup over one source's observations.
///
/// When a source lists a date more than once, the first occurrence wins.
#[derive(Debug, Clone)]
pub struct DateIndex {
    name: &'static str,
    by_date: HashMap<NaiveDate, RawObservation>,
}

impl DateIndex {
    pub fn new(name: &'static str, observations: &[RawObservation]) -> Self {
        let mut by_date = HashMap::with_capacity(observations.len());
        let mut duplicates = 0usize;
        for o in observations {
            if by_date.contains_key(&o.date) {
                duplicates += 1;
                continue;
            }
            by_date.insert(o.date, *o);
        }
        if duplicates > 0 {
            debug!(source = name, duplicates, "Ignoring repeated dates");
        }
        DateIndex { name, by_date }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The present reading for `date`, if the source has one.
    pub fn reading(&self, date: NaiveDate) -> Option<f64> {
        self.by_date.get(&date).and_then(RawObservation::reading)
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}

/// Joins `primary` against every auxiliary, in primary order.
///
/// Per primary row: repeated dates are dropped, then a missing primary
/// reading, then any auxiliary without a present reading, then every bound is
/// checked.
///
/// # Panics
///
/// If a bound names a column past the last auxiliary.
pub fn join(
    primary: &[RawObservation],
    auxiliaries: &[DateIndex],
    bounds: &[LowerBound],
) -> (Vec<JoinedRecord>, JoinStats) {
    for b in bounds {
        assert!(
            b.column <= auxiliaries.len(),
            "lower bound on column {} but only {} columns are joined",
            b.column,
            auxiliaries.len() + 1
        );
    }

    let mut stats = JoinStats::with_auxiliaries(auxiliaries.len());
    let mut seen = HashSet::with_capacity(primary.len());
    let mut joined = Vec::with_capacity(primary.len());

    'rows: for o in primary {
        stats.primary_rows += 1;

        if !seen.insert(o.date) {
            stats.duplicate_dates += 1;
            continue;
        }
        if o.missing {
            stats.missing_primary += 1;
            continue;
        }

        let mut values = Vec::with_capacity(auxiliaries.len() + 1);
        values.push(o.value);
        for (i, aux) in auxiliaries.iter().enumerate() {
            match aux.reading(o.date) {
                Some(v) => values.push(v),
                None => {
                    stats.missing_auxiliary[i] += 1;
                    continue 'rows;
                }
            }
        }

        if !bounds.iter().all(|b| b.admits(&values)) {
            stats.out_of_range += 1;
            continue;
        }

        joined.push(JoinedRecord { date: o.date, values });
    }

    stats.joined = joined.len();
    (joined, stats)
}
