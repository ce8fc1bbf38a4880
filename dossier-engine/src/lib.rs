//! Dossier Statistics Engine
//!
//! Read-side statistics core for Dossier, a record-keeping tool for a
//! hierarchical roster of units fighting through a named campaign. The engine
//! aligns each unit's sparse service log to the global scenario timeline,
//! derives per-scenario deltas from cumulative snapshots, carries last-known
//! values forward, and aggregates the results per category and across the
//! whole tree. It never mutates the model and keeps no state between queries.

pub mod aggregate;
pub mod align;
pub mod delta;
pub mod numbers;
pub mod record;
pub mod roster;
pub mod scenario;
pub mod statistic;

// Re-export commonly used types
pub use aggregate::{GroupMode, StatPoint, by_category, per_scenario, progression};
pub use align::{AlignedRecord, AlignmentError, align};
pub use delta::{Delta, deltas};
pub use record::{Counter, Record, ServiceLog};
pub use roster::{ChildList, Element, ElementId, ElementKind, Report, Roster};
pub use scenario::{Campaign, Outcome, OutcomeTally, Scenario};
pub use statistic::{Statistic, kill_ratio};

use serde::{Deserialize, Serialize};

/// Everything a loaded dossier holds: the roster tree and the campaign
/// timeline. Service logs live inside the roster's units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dossier {
    pub roster: Roster,
    pub campaign: Campaign,
}

impl Dossier {
    /// Create an empty dossier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-category current-value statistics for the active units under
    /// `root`.
    #[must_use]
    pub fn by_category(&self, root: ElementId, stat: Statistic, mode: GroupMode) -> Vec<StatPoint> {
        let units = self.roster.active_units_under(root);
        by_category(&self.roster, &units, stat, mode)
    }

    /// Summed per-scenario change of `stat` for the active units under
    /// `root`, in timeline order.
    ///
    /// # Errors
    ///
    /// Returns [`AlignmentError`] when any record names a scenario missing
    /// from the timeline.
    pub fn per_scenario(
        &self,
        root: ElementId,
        stat: Statistic,
    ) -> Result<Vec<StatPoint>, AlignmentError> {
        let units = self.roster.active_units_under(root);
        per_scenario(&self.roster, &units, &self.campaign, stat)
    }

    /// Carry-forward running total of `stat` as of each timeline position,
    /// for the active units under `root`.
    ///
    /// # Errors
    ///
    /// Returns [`AlignmentError`] when any record names a scenario missing
    /// from the timeline.
    pub fn progression(
        &self,
        root: ElementId,
        stat: Statistic,
    ) -> Result<Vec<StatPoint>, AlignmentError> {
        let units = self.roster.active_units_under(root);
        progression(&self.roster, &units, &self.campaign, stat)
    }
}

/// Trait for abstracting dossier persistence.
/// Platform-specific implementations should provide this.
pub trait DossierStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load a dossier by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the dossier cannot be loaded or parsed.
    fn load_dossier(&self, name: &str) -> Result<Option<Dossier>, Self::Error>;

    /// Save a dossier under a name.
    ///
    /// # Errors
    ///
    /// Returns an error if the dossier cannot be saved.
    fn save_dossier(&self, name: &str, dossier: &Dossier) -> Result<(), Self::Error>;

    /// Delete a saved dossier.
    ///
    /// # Errors
    ///
    /// Returns an error if the dossier cannot be deleted.
    fn delete_dossier(&self, name: &str) -> Result<(), Self::Error>;
}

/// Engine facade pairing a storage backend with the statistics queries.
pub struct DossierEngine<S>
where
    S: DossierStore,
{
    store: S,
}

impl<S> DossierEngine<S>
where
    S: DossierStore,
{
    /// Create an engine over the provided storage backend.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Load a dossier, or start an empty one when the name is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to load the dossier.
    pub fn open(&self, name: &str) -> Result<Dossier, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let dossier = self.store.load_dossier(name).map_err(Into::into)?;
        Ok(dossier.unwrap_or_default())
    }

    /// Save a dossier.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to save the dossier.
    pub fn save(&self, name: &str, dossier: &Dossier) -> Result<(), S::Error> {
        self.store.save_dossier(name, dossier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::convert::Infallible;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct MemoryStore {
        saves: Rc<RefCell<HashMap<String, Dossier>>>,
    }

    impl DossierStore for MemoryStore {
        type Error = Infallible;

        fn load_dossier(&self, name: &str) -> Result<Option<Dossier>, Self::Error> {
            Ok(self.saves.borrow().get(name).cloned())
        }

        fn save_dossier(&self, name: &str, dossier: &Dossier) -> Result<(), Self::Error> {
            self.saves
                .borrow_mut()
                .insert(name.to_string(), dossier.clone());
            Ok(())
        }

        fn delete_dossier(&self, name: &str) -> Result<(), Self::Error> {
            self.saves.borrow_mut().remove(name);
            Ok(())
        }
    }

    fn fixture() -> (Dossier, ElementId) {
        let mut dossier = Dossier::new();
        dossier.campaign.push(Scenario::new("Poland"));
        dossier.campaign.push(Scenario::new("France"));
        let root = dossier.roster.add_formation(None, "Army", "hq").unwrap();
        let unit = dossier
            .roster
            .add_unit(Some(root), "1st Panzer", "tank", false)
            .unwrap();
        dossier.roster.record_for(
            unit,
            Record {
                kills: 3,
                losses: 1,
                ..Record::new("Poland")
            },
        );
        (dossier, root)
    }

    #[test]
    fn engine_roundtrips_dossiers() {
        let engine = DossierEngine::new(MemoryStore::default());
        let (dossier, _) = fixture();
        engine.save("campaign-west", &dossier).unwrap();

        let loaded = engine.open("campaign-west").unwrap();
        assert_eq!(loaded, dossier);
        // Unknown names open as a fresh dossier rather than failing.
        let fresh = engine.open("missing").unwrap();
        assert!(fresh.roster.is_empty());
        assert!(fresh.campaign.is_empty());
    }

    #[test]
    fn dossier_queries_delegate_with_active_units() {
        let (dossier, root) = fixture();
        let series = dossier.per_scenario(root, Statistic::Kills).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].label, "Poland");

        let run = dossier.progression(root, Statistic::Kills).unwrap();
        let values: Vec<_> = run.iter().map(|p| p.value).collect();
        assert_eq!(values, [3.0, 3.0]);

        let cats = dossier.by_category(root, Statistic::Kills, GroupMode::Total);
        assert_eq!(cats[0].label, "tank");
    }
}
