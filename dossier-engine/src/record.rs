//! Unit service logs: ordered cumulative battle snapshots.
use serde::{Deserialize, Serialize};

/// One cumulative snapshot of a unit's counters, tagged with the scenario it
/// was recorded under.
///
/// Counters are running totals since the unit was raised, not per-battle
/// figures. Well-formed data keeps them non-decreasing along a unit's own log,
/// but nothing here enforces that: the editing layer allows arbitrary manual
/// correction of historical values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Name of the scenario this snapshot was taken under.
    pub scenario: String,
    #[serde(default)]
    pub experience: u32,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub losses: u32,
    /// Acquisition cost of the unit's current equipment and transport.
    #[serde(default)]
    pub cost: u32,
}

impl Record {
    /// Create a zeroed snapshot for the given scenario.
    #[must_use]
    pub fn new(scenario: &str) -> Self {
        Self {
            scenario: scenario.to_string(),
            ..Self::default()
        }
    }
}

/// Selector for one of a record's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Counter {
    Experience,
    Kills,
    Losses,
    Cost,
}

impl Counter {
    /// Read this counter out of a record.
    #[must_use]
    pub const fn of(self, record: &Record) -> u32 {
        match self {
            Self::Experience => record.experience,
            Self::Kills => record.kills,
            Self::Losses => record.losses,
            Self::Cost => record.cost,
        }
    }
}

/// A unit's ordered service log, one entry per scenario the unit fought in.
///
/// Entries keep the order they were recorded in. That order is conceptually a
/// subsequence of the campaign timeline but is stored independently and joined
/// only by scenario name; consumers must not assume the two agree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceLog {
    entries: Vec<Record>,
}

impl ServiceLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the unit has no recorded snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in recorded order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.entries.iter()
    }

    /// Entries in recorded order.
    #[must_use]
    pub fn entries(&self) -> &[Record] {
        &self.entries
    }

    /// The most recent snapshot, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&Record> {
        self.entries.last()
    }

    /// The most recent value of one counter, zero when the log is empty.
    #[must_use]
    pub fn current(&self, counter: Counter) -> u32 {
        self.latest().map_or(0, |record| counter.of(record))
    }

    /// Append a snapshot at the end of the log.
    pub fn push(&mut self, record: Record) {
        self.entries.push(record);
    }

    /// Remove the snapshot at `index`, preserving the order of the rest.
    pub fn remove(&mut self, index: usize) -> Option<Record> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }
}

impl<'a> IntoIterator for &'a ServiceLog {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Record> for ServiceLog {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
