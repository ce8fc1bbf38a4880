//! Order of battle: the hierarchical roster of tracked elements.
//!
//! The roster is an arena: elements live in a flat list and refer to each
//! other by index-based ids. Ownership runs strictly parent to children; the
//! parent link is a plain back-index kept for traversal and never owns
//! anything.
use log::debug;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::record::{Counter, Record, ServiceLog};

/// Identifier of an element within its roster.
///
/// Ids are only meaningful against the roster that issued them and stay
/// stable for the life of that roster (elements are never compacted away).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(usize);

/// Child ids stored inline for the small formations that dominate rosters.
pub type ChildList = SmallVec<[ElementId; 4]>;

/// What an element is: a grouping formation or a fighting unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Internal node grouping subordinate elements, in user-chosen order.
    Formation {
        #[serde(default)]
        children: ChildList,
    },
    /// Leaf node carrying the unit's service log.
    Unit {
        #[serde(default)]
        log: ServiceLog,
    },
}

/// One node of the roster tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Display name; not required to be unique.
    pub name: String,
    /// Categorical attribute used for grouped statistics (e.g. unit type).
    pub category: String,
    /// Reserve elements are excluded from aggregate statistics.
    #[serde(default)]
    pub reserve: bool,
    kind: ElementKind,
    #[serde(default)]
    parent: Option<ElementId>,
}

impl Element {
    /// True for leaf units.
    #[must_use]
    pub const fn is_unit(&self) -> bool {
        matches!(self.kind, ElementKind::Unit { .. })
    }

    /// True for grouping formations.
    #[must_use]
    pub const fn is_formation(&self) -> bool {
        matches!(self.kind, ElementKind::Formation { .. })
    }

    /// The unit's service log, or `None` for formations.
    #[must_use]
    pub fn log(&self) -> Option<&ServiceLog> {
        match &self.kind {
            ElementKind::Unit { log } => Some(log),
            ElementKind::Formation { .. } => None,
        }
    }

    /// Subordinate ids in user order; empty for units.
    #[must_use]
    pub fn children(&self) -> &[ElementId] {
        match &self.kind {
            ElementKind::Formation { children } => children,
            ElementKind::Unit { .. } => &[],
        }
    }

    /// The parent element, or `None` for roots.
    #[must_use]
    pub const fn parent(&self) -> Option<ElementId> {
        self.parent
    }
}

/// A new-record report applied across many units at once.
///
/// Counter fields are increments over each unit's latest snapshot; cost is a
/// current-equipment figure and carries forward unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub scenario: String,
    #[serde(default)]
    pub experience: u32,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub losses: u32,
}

/// The full roster tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    elements: Vec<Element>,
    #[serde(default)]
    roots: ChildList,
}

impl Roster {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of elements, formations included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True when no elements have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Top-level element ids in user order.
    #[must_use]
    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    /// Look up an element by id.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    /// Add a grouping formation under `parent` (or as a root).
    ///
    /// Returns `None` when the parent id is unknown or refers to a unit;
    /// units cannot have subordinates.
    pub fn add_formation(
        &mut self,
        parent: Option<ElementId>,
        name: &str,
        category: &str,
    ) -> Option<ElementId> {
        self.attach(
            parent,
            Element {
                name: name.to_string(),
                category: category.to_string(),
                reserve: false,
                kind: ElementKind::Formation {
                    children: ChildList::new(),
                },
                parent,
            },
        )
    }

    /// Add a leaf unit under `parent` (or as a root).
    ///
    /// Returns `None` when the parent id is unknown or refers to a unit.
    pub fn add_unit(
        &mut self,
        parent: Option<ElementId>,
        name: &str,
        category: &str,
        reserve: bool,
    ) -> Option<ElementId> {
        self.attach(
            parent,
            Element {
                name: name.to_string(),
                category: category.to_string(),
                reserve,
                kind: ElementKind::Unit {
                    log: ServiceLog::new(),
                },
                parent,
            },
        )
    }

    fn attach(&mut self, parent: Option<ElementId>, element: Element) -> Option<ElementId> {
        let id = ElementId(self.elements.len());
        match parent {
            Some(parent_id) => match self.elements.get_mut(parent_id.0)?.kind {
                ElementKind::Formation { ref mut children } => children.push(id),
                ElementKind::Unit { .. } => return None,
            },
            None => self.roots.push(id),
        }
        self.elements.push(element);
        Some(id)
    }

    /// Append a snapshot to a unit's service log. Returns false for unknown
    /// ids and for formations.
    pub fn record_for(&mut self, id: ElementId, record: Record) -> bool {
        match self.elements.get_mut(id.0) {
            Some(Element {
                kind: ElementKind::Unit { log },
                ..
            }) => {
                log.push(record);
                true
            }
            _ => false,
        }
    }

    /// Mark or clear the reserve flag on an element.
    pub fn set_reserve(&mut self, id: ElementId, reserve: bool) -> bool {
        match self.elements.get_mut(id.0) {
            Some(element) => {
                element.reserve = reserve;
                true
            }
            None => false,
        }
    }

    /// Swap a child one slot earlier within its siblings.
    ///
    /// `parent == None` reorders the roots. Returns false when the index is
    /// already first or out of range.
    pub fn move_child_up(&mut self, parent: Option<ElementId>, index: usize) -> bool {
        let Some(siblings) = self.sibling_list_mut(parent) else {
            return false;
        };
        if index == 0 || index >= siblings.len() {
            return false;
        }
        siblings.swap(index - 1, index);
        true
    }

    /// Swap a child one slot later within its siblings.
    pub fn move_child_down(&mut self, parent: Option<ElementId>, index: usize) -> bool {
        let Some(siblings) = self.sibling_list_mut(parent) else {
            return false;
        };
        if index + 1 >= siblings.len() {
            return false;
        }
        siblings.swap(index, index + 1);
        true
    }

    fn sibling_list_mut(&mut self, parent: Option<ElementId>) -> Option<&mut ChildList> {
        match parent {
            None => Some(&mut self.roots),
            Some(id) => match self.elements.get_mut(id.0)?.kind {
                ElementKind::Formation { ref mut children } => Some(children),
                ElementKind::Unit { .. } => None,
            },
        }
    }

    /// Leaf units under `root` in pre-order. A unit passed as the root is
    /// its own singleton result. Unknown ids yield nothing.
    #[must_use]
    pub fn units_under(&self, root: ElementId) -> Vec<ElementId> {
        let mut units = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(element) = self.get(id) else {
                continue;
            };
            match &element.kind {
                ElementKind::Unit { .. } => units.push(id),
                ElementKind::Formation { children } => {
                    stack.extend(children.iter().rev().copied());
                }
            }
        }
        units
    }

    /// Leaf units under `root` with reserve elements filtered out: the
    /// conventional entity set for every aggregate query.
    #[must_use]
    pub fn active_units_under(&self, root: ElementId) -> Vec<ElementId> {
        self.units_under(root)
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(|e| !e.reserve))
            .collect()
    }

    /// Active units across every root, in root order.
    #[must_use]
    pub fn active_units(&self) -> Vec<ElementId> {
        self.roots
            .iter()
            .flat_map(|root| self.active_units_under(*root))
            .collect()
    }

    /// Apply a report to every active unit under `root`: each unit gets one
    /// new snapshot extending its latest counters by the report's increments,
    /// with cost carried forward.
    ///
    /// This is the bulk write path; callers serialize it against queries.
    pub fn apply_report(&mut self, root: ElementId, report: &Report) {
        let units = self.active_units_under(root);
        debug!(
            "applying report for \"{}\" to {} unit(s)",
            report.scenario,
            units.len()
        );
        for id in units {
            let Some(Element {
                kind: ElementKind::Unit { log },
                ..
            }) = self.elements.get_mut(id.0)
            else {
                continue;
            };
            let record = Record {
                scenario: report.scenario.clone(),
                experience: log.current(Counter::Experience) + report.experience,
                kills: log.current(Counter::Kills) + report.kills,
                losses: log.current(Counter::Losses) + report.losses,
                cost: log.current(Counter::Cost),
            };
            log.push(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_roster() -> (Roster, ElementId) {
        let mut roster = Roster::new();
        let corps = roster.add_formation(None, "II Corps", "hq").unwrap();
        let armor = roster
            .add_formation(Some(corps), "1st Armor", "hq")
            .unwrap();
        roster
            .add_unit(Some(armor), "1st Panzer", "tank", false)
            .unwrap();
        roster
            .add_unit(Some(armor), "2nd Panzer", "tank", false)
            .unwrap();
        roster
            .add_unit(Some(corps), "7th Infantry", "infantry", false)
            .unwrap();
        (roster, corps)
    }

    #[test]
    fn walk_is_preorder_and_leaf_only() {
        let (roster, corps) = sample_roster();
        let names: Vec<_> = roster
            .units_under(corps)
            .into_iter()
            .map(|id| roster.get(id).unwrap().name.clone())
            .collect();
        assert_eq!(names, ["1st Panzer", "2nd Panzer", "7th Infantry"]);
    }

    #[test]
    fn unit_as_walk_root_is_singleton() {
        let mut roster = Roster::new();
        let lone = roster.add_unit(None, "Recon", "recon", false).unwrap();
        assert_eq!(roster.units_under(lone), vec![lone]);
        assert_eq!(roster.active_units(), vec![lone]);
    }

    #[test]
    fn reserve_units_are_filtered() {
        let (mut roster, corps) = sample_roster();
        let depot = roster
            .add_unit(Some(corps), "Depot Guard", "infantry", true)
            .unwrap();
        assert_eq!(roster.units_under(corps).len(), 4);
        assert_eq!(roster.active_units_under(corps).len(), 3);
        assert!(roster.set_reserve(depot, false));
        assert_eq!(roster.active_units_under(corps).len(), 4);
    }

    #[test]
    fn units_reject_subordinates() {
        let mut roster = Roster::new();
        let unit = roster.add_unit(None, "1st Panzer", "tank", false).unwrap();
        assert!(roster.add_unit(Some(unit), "nested", "tank", false).is_none());
        assert!(roster.add_formation(Some(unit), "nested", "hq").is_none());
    }

    #[test]
    fn child_order_is_user_controlled() {
        let (mut roster, corps) = sample_roster();
        let before: Vec<_> = roster.get(corps).unwrap().children().to_vec();
        assert!(roster.move_child_down(Some(corps), 0));
        let after = roster.get(corps).unwrap().children();
        assert_eq!(after[0], before[1]);
        assert_eq!(after[1], before[0]);
        assert!(!roster.move_child_down(Some(corps), 1));
        assert!(!roster.move_child_up(Some(corps), 0));
    }

    #[test]
    fn parent_links_follow_structure() {
        let (roster, corps) = sample_roster();
        let armor = roster.get(corps).unwrap().children()[0];
        let panzer = roster.get(armor).unwrap().children()[0];
        assert_eq!(roster.get(panzer).unwrap().parent(), Some(armor));
        assert_eq!(roster.get(armor).unwrap().parent(), Some(corps));
        assert_eq!(roster.get(corps).unwrap().parent(), None);
    }

    #[test]
    fn apply_report_extends_latest_counters() {
        let (mut roster, corps) = sample_roster();
        let panzer = roster.units_under(corps)[0];
        roster.record_for(
            panzer,
            Record {
                experience: 100,
                kills: 4,
                losses: 1,
                cost: 480,
                ..Record::new("Poland")
            },
        );
        roster.apply_report(
            corps,
            &Report {
                scenario: "France".to_string(),
                experience: 50,
                kills: 2,
                losses: 1,
            },
        );

        let log = roster.get(panzer).unwrap().log().unwrap();
        let latest = log.latest().unwrap();
        assert_eq!(latest.scenario, "France");
        assert_eq!(latest.experience, 150);
        assert_eq!(latest.kills, 6);
        assert_eq!(latest.losses, 2);
        assert_eq!(latest.cost, 480);

        // Units with no prior records start from zero.
        let infantry = roster.units_under(corps)[2];
        let log = roster.get(infantry).unwrap().log().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.current(Counter::Kills), 2);
        assert_eq!(log.current(Counter::Cost), 0);
    }
}
