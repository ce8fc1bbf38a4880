//! Aggregate statistics over the roster, aligned to the campaign timeline.
//!
//! Every query here is a pure function of the current roster, timeline and
//! service-log snapshots. Nothing is cached between calls and nothing is
//! mutated; callers re-query whenever their snapshot changes, and they own
//! the serialization of bulk writes against queries.
use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::align::{AlignedRecord, AlignmentError, align};
use crate::delta::deltas;
use crate::numbers::{i64_to_f64, mean, round_to_unit};
use crate::roster::{ElementId, Roster};
use crate::scenario::Campaign;
use crate::statistic::{Statistic, kill_ratio};

/// One labelled value of an output series.
///
/// The emitted order is authoritative: it encodes timeline or category
/// ordering, and consumers must not re-sort it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatPoint {
    pub label: String,
    pub value: f64,
}

impl StatPoint {
    fn new(label: &str, value: f64) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

/// How per-category figures are folded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupMode {
    /// Mean of current values, rounded to the nearest integer.
    Average,
    /// Exact sum of current values.
    Total,
}

/// Current-value statistics grouped by element category.
///
/// Each included unit contributes its most recent cumulative counter value
/// (zero when it has no records) to exactly one category group. Groups are
/// emitted by descending category sort key, a display convention the
/// consumers rely on.
#[must_use]
pub fn by_category(
    roster: &Roster,
    units: &[ElementId],
    stat: Statistic,
    mode: GroupMode,
) -> Vec<StatPoint> {
    let Some(counter) = stat.counter() else {
        let kills = by_category(roster, units, Statistic::Kills, mode);
        let losses = by_category(roster, units, Statistic::Losses, mode);
        return compose_ratio(kills, &losses);
    };
    debug!("per-category {stat} ({mode:?}) over {} unit(s)", units.len());

    let mut groups: BTreeMap<&str, (i64, usize)> = BTreeMap::new();
    for id in units {
        let Some(element) = roster.get(*id) else {
            continue;
        };
        let Some(log) = element.log() else {
            continue;
        };
        let entry = groups.entry(element.category.as_str()).or_insert((0, 0));
        entry.0 += i64::from(log.current(counter));
        entry.1 += 1;
    }

    let mut points: Vec<StatPoint> = groups
        .into_iter()
        .map(|(category, (sum, count))| {
            let value = match mode {
                GroupMode::Average => round_to_unit(mean(sum, count)),
                GroupMode::Total => i64_to_f64(sum),
            };
            StatPoint::new(category, value)
        })
        .collect();
    points.reverse();
    points
}

/// Summed per-scenario change of one statistic across the included units.
///
/// Each unit's log is projected into deltas; the union of all delta series is
/// grouped by scenario and emitted in timeline order. A unit that skipped a
/// scenario simply contributes no term there; its progress surfaces in the
/// delta of its next recorded scenario instead.
///
/// # Errors
///
/// Fails with [`AlignmentError`] when any included record names a scenario
/// missing from the timeline; no partial series is returned.
pub fn per_scenario(
    roster: &Roster,
    units: &[ElementId],
    campaign: &Campaign,
    stat: Statistic,
) -> Result<Vec<StatPoint>, AlignmentError> {
    let Some(counter) = stat.counter() else {
        let kills = per_scenario(roster, units, campaign, Statistic::Kills)?;
        let losses = per_scenario(roster, units, campaign, Statistic::Losses)?;
        return Ok(compose_ratio(kills, &losses));
    };
    debug!("per-scenario {stat} over {} unit(s)", units.len());

    // Grouping by scenario name and grouping by aligned position coincide:
    // every record with the same name binds to the same (first) position.
    let mut sums: BTreeMap<usize, i64> = BTreeMap::new();
    for id in units {
        let Some(element) = roster.get(*id) else {
            continue;
        };
        let Some(log) = element.log() else {
            continue;
        };
        let aligned = align(&element.name, log, campaign)?;
        for (pair, delta) in aligned.iter().zip(deltas(log, counter)) {
            *sums.entry(pair.position).or_insert(0) += delta.value;
        }
    }

    Ok(sums
        .into_iter()
        .map(|(position, sum)| StatPoint::new(scenario_label(campaign, position), i64_to_f64(sum)))
        .collect())
}

/// Running total of one statistic as of each timeline position.
///
/// At position `i` every included unit contributes its most recently recorded
/// cumulative value at or before `i` (carry-forward); units that had not yet
/// reported by `i` contribute nothing. One point is emitted per timeline
/// entry, in timeline order. An empty unit set yields an empty series.
///
/// # Errors
///
/// Fails with [`AlignmentError`] when any included record names a scenario
/// missing from the timeline; no partial series is returned.
pub fn progression(
    roster: &Roster,
    units: &[ElementId],
    campaign: &Campaign,
    stat: Statistic,
) -> Result<Vec<StatPoint>, AlignmentError> {
    let Some(counter) = stat.counter() else {
        let kills = progression(roster, units, campaign, Statistic::Kills)?;
        let losses = progression(roster, units, campaign, Statistic::Losses)?;
        return Ok(compose_ratio(kills, &losses));
    };
    debug!("progression of {stat} over {} unit(s)", units.len());
    if units.is_empty() {
        return Ok(Vec::new());
    }

    let mut alignments: Vec<Vec<AlignedRecord<'_>>> = Vec::with_capacity(units.len());
    for id in units {
        let Some(element) = roster.get(*id) else {
            continue;
        };
        let Some(log) = element.log() else {
            continue;
        };
        alignments.push(align(&element.name, log, campaign)?);
    }

    let mut points = Vec::with_capacity(campaign.len());
    for position in 0..campaign.len() {
        let mut sum = 0i64;
        for aligned in &alignments {
            // Last qualifying entry in the log's own order: the most recently
            // recorded snapshot at or before this position.
            if let Some(pair) = aligned.iter().rev().find(|pair| pair.position <= position) {
                sum += i64::from(counter.of(pair.record));
            }
        }
        points.push(StatPoint::new(scenario_label(campaign, position), i64_to_f64(sum)));
    }
    Ok(points)
}

/// Combine kills and losses series element-wise into the ratio statistic.
fn compose_ratio(kills: Vec<StatPoint>, losses: &[StatPoint]) -> Vec<StatPoint> {
    debug_assert_eq!(kills.len(), losses.len());
    kills
        .into_iter()
        .zip(losses)
        .map(|(k, l)| {
            debug_assert_eq!(k.label, l.label);
            StatPoint {
                value: kill_ratio(k.value, l.value),
                label: k.label,
            }
        })
        .collect()
}

fn scenario_label<'a>(campaign: &'a Campaign, position: usize) -> &'a str {
    campaign.get(position).map_or("", |s| s.name.as_str())
}
