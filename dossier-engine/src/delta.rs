//! Projection of cumulative snapshots into per-step deltas.
use crate::record::{Counter, ServiceLog};

/// Change in one counter between consecutive snapshots of a single unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta {
    /// Scenario the later snapshot was recorded under.
    pub scenario: String,
    /// Signed change; negative when the later cumulative value is smaller.
    pub value: i64,
}

/// Project a unit's log into per-step deltas of one counter.
///
/// The first delta is the first snapshot's raw value (progress since the unit
/// was raised); each later delta is the difference against the previous
/// snapshot in the log's own order. This models "progress since the last
/// recorded scenario", not since the start of the campaign; scenarios the
/// unit skipped are folded into the next delta.
///
/// Non-monotonic counters are passed through as negative deltas, not clamped
/// or flagged: the editing layer allows arbitrary correction of history and
/// the projection must not second-guess it.
#[must_use]
pub fn deltas(log: &ServiceLog, counter: Counter) -> Vec<Delta> {
    let mut previous: Option<i64> = None;
    log.iter()
        .map(|record| {
            let value = i64::from(counter.of(record));
            let delta = value - previous.unwrap_or(0);
            previous = Some(value);
            Delta {
                scenario: record.scenario.clone(),
                value: delta,
            }
        })
        .collect()
}
