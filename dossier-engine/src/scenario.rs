//! Campaign timeline: the user-ordered, global sequence of scenarios.
use serde::{Deserialize, Serialize};

/// Outcome tag attached to a fought scenario.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Victory,
    #[default]
    Draw,
    Defeat,
}

/// One entry on the campaign timeline.
///
/// Names are display labels and are not required to be unique; the entry's
/// position on the timeline is what defines chronology.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub prestige: i32,
    #[serde(default)]
    pub outcome: Outcome,
}

impl Scenario {
    /// Create a timeline entry with default prestige and outcome.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// Tally of scenario outcomes across the timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTally {
    pub victories: usize,
    pub draws: usize,
    pub defeats: usize,
}

/// The global, user-ordered list of scenarios.
///
/// The 0-based position of an entry is the canonical chronology for every
/// statistics query. Positions change only through the explicit reordering
/// operations here, driven by the user; the read-side queries never reorder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Campaign {
    scenarios: Vec<Scenario>,
}

impl Campaign {
    /// Create an empty timeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of scenarios on the timeline.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// True when no scenarios have been fought yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Entry at a timeline position.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Scenario> {
        self.scenarios.get(position)
    }

    /// Iterate entries in timeline order.
    pub fn iter(&self) -> std::slice::Iter<'_, Scenario> {
        self.scenarios.iter()
    }

    /// Position of the first entry with the given name.
    ///
    /// Names are not required to be unique; when the timeline carries two
    /// entries with the same name, every lookup binds to the earliest one.
    /// This is a known ambiguity kept for compatibility with existing
    /// dossiers, not a guarantee that duplicates are meaningful.
    #[must_use]
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.scenarios.iter().position(|s| s.name == name)
    }

    /// Append a scenario at the end of the timeline.
    pub fn push(&mut self, scenario: Scenario) {
        self.scenarios.push(scenario);
    }

    /// Remove the entry at a position, shifting later entries up.
    pub fn remove(&mut self, position: usize) -> Option<Scenario> {
        if position < self.scenarios.len() {
            Some(self.scenarios.remove(position))
        } else {
            None
        }
    }

    /// Swap an entry one position earlier. Returns false when it is already
    /// first or out of range.
    pub fn move_up(&mut self, position: usize) -> bool {
        if position == 0 || position >= self.scenarios.len() {
            return false;
        }
        self.scenarios.swap(position - 1, position);
        true
    }

    /// Swap an entry one position later. Returns false when it is already
    /// last or out of range.
    pub fn move_down(&mut self, position: usize) -> bool {
        if position + 1 >= self.scenarios.len() {
            return false;
        }
        self.scenarios.swap(position, position + 1);
        true
    }

    /// Sum of prestige over the whole timeline.
    #[must_use]
    pub fn total_prestige(&self) -> i64 {
        self.scenarios.iter().map(|s| i64::from(s.prestige)).sum()
    }

    /// Count outcomes across the timeline.
    #[must_use]
    pub fn outcome_tally(&self) -> OutcomeTally {
        let mut tally = OutcomeTally::default();
        for scenario in &self.scenarios {
            match scenario.outcome {
                Outcome::Victory => tally.victories += 1,
                Outcome::Draw => tally.draws += 1,
                Outcome::Defeat => tally.defeats += 1,
            }
        }
        tally
    }
}

impl<'a> IntoIterator for &'a Campaign {
    type Item = &'a Scenario;
    type IntoIter = std::slice::Iter<'a, Scenario>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Scenario> for Campaign {
    fn from_iter<I: IntoIterator<Item = Scenario>>(iter: I) -> Self {
        Self {
            scenarios: iter.into_iter().collect(),
        }
    }
}
