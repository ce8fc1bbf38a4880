//! Alignment of unit service logs onto the campaign timeline.
use thiserror::Error;

use crate::record::{Record, ServiceLog};
use crate::scenario::Campaign;

/// A service-log entry positioned on the campaign timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignedRecord<'a> {
    /// 0-based position of the matching timeline entry.
    pub position: usize,
    pub record: &'a Record,
}

/// Data-integrity failures raised while joining logs to the timeline.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AlignmentError {
    /// A snapshot names a scenario absent from the campaign timeline.
    ///
    /// Silently dropping such a record would corrupt every downstream sum,
    /// so the whole query fails instead.
    #[error("unit \"{unit}\" has a record for \"{scenario}\", which is not on the campaign timeline")]
    MissingScenario { unit: String, scenario: String },
}

/// Map each entry of a unit's log to its timeline position.
///
/// Output pairs keep the log's own order, which is allowed to disagree with
/// ascending timeline order; delta queries rely on the former and positional
/// queries on the latter. Each record binds to the first timeline entry with
/// a matching name (see [`Campaign::position_of`] for the duplicate-name
/// caveat).
///
/// # Errors
///
/// Returns [`AlignmentError::MissingScenario`] when any record names a
/// scenario the timeline does not carry. `unit` is only used to label that
/// error.
pub fn align<'a>(
    unit: &str,
    log: &'a ServiceLog,
    campaign: &Campaign,
) -> Result<Vec<AlignedRecord<'a>>, AlignmentError> {
    log.iter()
        .map(|record| match campaign.position_of(&record.scenario) {
            Some(position) => Ok(AlignedRecord { position, record }),
            None => Err(AlignmentError::MissingScenario {
                unit: unit.to_string(),
                scenario: record.scenario.clone(),
            }),
        })
        .collect()
}
