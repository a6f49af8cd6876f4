//! Two-pane employee transfer list.
//!
//! The list partitions the employee universe into an "available" pane and a
//! "selected" pane. Each pane has its own highlight set: entries marked for
//! the next move but not yet moved.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, RegistryResult};
use crate::models::Employee;

/// One side of the transfer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pane {
    /// Employees not in the selection.
    Available,
    /// Employees in the selection.
    Selected,
}

impl Pane {
    /// Returns the snake_case name of the pane.
    pub fn as_str(self) -> &'static str {
        match self {
            Pane::Available => "available",
            Pane::Selected => "selected",
        }
    }
}

/// A move between panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    /// Select every employee.
    AllRight,
    /// Deselect every employee.
    AllLeft,
    /// Select the highlighted available employees.
    SelectedRight,
    /// Deselect the highlighted selected employees.
    SelectedLeft,
}

/// An employee as listed in a pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEntry {
    /// Employee id.
    pub id: String,
    /// Employee name.
    pub name: String,
}

impl From<&Employee> for TransferEntry {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id.clone(),
            name: employee.name.clone(),
        }
    }
}

/// Working copy of the employee selection.
///
/// # Example
///
/// ```
/// use std::collections::BTreeSet;
/// use deduction_registry::selection::{Pane, TransferEntry, TransferList};
///
/// let universe = ["E1", "E2", "E3"].map(|id| TransferEntry {
///     id: id.to_string(),
///     name: format!("Employee {}", id),
/// });
/// let current = BTreeSet::from(["E1".to_string()]);
///
/// let mut list = TransferList::new(universe, &current);
/// list.toggle_highlight(Pane::Available, "E2").unwrap();
/// list.move_selected_right();
///
/// assert_eq!(list.save(), BTreeSet::from(["E1".to_string(), "E2".to_string()]));
/// ```
#[derive(Debug, Clone)]
pub struct TransferList {
    universe: Vec<TransferEntry>,
    selected: BTreeSet<String>,
    highlighted_available: BTreeSet<String>,
    highlighted_selected: BTreeSet<String>,
}

impl TransferList {
    /// Creates a working copy of `current` over `universe`.
    ///
    /// Ids in `current` that are not in the universe are dropped.
    pub fn new(
        universe: impl IntoIterator<Item = TransferEntry>,
        current: &BTreeSet<String>,
    ) -> Self {
        let universe: Vec<TransferEntry> = universe.into_iter().collect();
        let selected = universe
            .iter()
            .filter(|entry| current.contains(&entry.id))
            .map(|entry| entry.id.clone())
            .collect();

        Self {
            universe,
            selected,
            highlighted_available: BTreeSet::new(),
            highlighted_selected: BTreeSet::new(),
        }
    }

    /// Returns true if `id` is in the universe.
    fn contains(&self, id: &str) -> bool {
        self.universe.iter().any(|entry| entry.id == id)
    }

    /// Returns the pane that currently holds `id`, if it is in the universe.
    pub fn pane_of(&self, id: &str) -> Option<Pane> {
        if self.selected.contains(id) {
            Some(Pane::Selected)
        } else if self.contains(id) {
            Some(Pane::Available)
        } else {
            None
        }
    }

    /// Returns the available employees, in universe order.
    pub fn available(&self) -> impl Iterator<Item = &TransferEntry> {
        self.universe
            .iter()
            .filter(|entry| !self.selected.contains(&entry.id))
    }

    /// Returns the available employees whose name contains `search`,
    /// ignoring case.
    pub fn available_matching(&self, search: &str) -> Vec<&TransferEntry> {
        let search = search.to_lowercase();
        self.available()
            .filter(|entry| entry.name.to_lowercase().contains(&search))
            .collect()
    }

    /// Returns the selected employees, in universe order.
    pub fn selected(&self) -> impl Iterator<Item = &TransferEntry> {
        self.universe
            .iter()
            .filter(|entry| self.selected.contains(&entry.id))
    }

    /// Returns the ids of the selected employees.
    pub fn selected_ids(&self) -> &BTreeSet<String> {
        &self.selected
    }

    /// Returns the highlight set of `pane`.
    pub fn highlighted(&self, pane: Pane) -> &BTreeSet<String> {
        match pane {
            Pane::Available => &self.highlighted_available,
            Pane::Selected => &self.highlighted_selected,
        }
    }

    /// Flips the highlight of `id` in `pane`.
    ///
    /// Returns whether `id` is highlighted afterwards. Fails if `id` is not
    /// currently in `pane`.
    pub fn toggle_highlight(&mut self, pane: Pane, id: &str) -> RegistryResult<bool> {
        if self.pane_of(id) != Some(pane) {
            return Err(RegistryError::NotInPane {
                employee_id: id.to_string(),
                pane: pane.as_str().to_string(),
            });
        }

        let highlights = match pane {
            Pane::Available => &mut self.highlighted_available,
            Pane::Selected => &mut self.highlighted_selected,
        };
        if highlights.remove(id) {
            Ok(false)
        } else {
            highlights.insert(id.to_string());
            Ok(true)
        }
    }

    /// Selects every employee and clears the available highlights.
    pub fn move_all_right(&mut self) -> usize {
        let before = self.selected.len();
        self.selected = self.universe.iter().map(|entry| entry.id.clone()).collect();
        self.highlighted_available.clear();
        self.selected.len() - before
    }

    /// Deselects every employee and clears the selected highlights.
    pub fn move_all_left(&mut self) -> usize {
        let moved = self.selected.len();
        self.selected.clear();
        self.highlighted_selected.clear();
        moved
    }

    /// Selects the highlighted available employees.
    ///
    /// Does nothing when none are highlighted.
    pub fn move_selected_right(&mut self) -> usize {
        let moving = std::mem::take(&mut self.highlighted_available);
        let moved = moving.len();
        self.selected.extend(moving);
        moved
    }

    /// Deselects the highlighted selected employees.
    ///
    /// Does nothing when none are highlighted.
    pub fn move_selected_left(&mut self) -> usize {
        let moving = std::mem::take(&mut self.highlighted_selected);
        for id in &moving {
            self.selected.remove(id);
        }
        moving.len()
    }

    /// Performs the move in `direction`, returning how many employees moved.
    pub fn apply(&mut self, direction: MoveDirection) -> usize {
        match direction {
            MoveDirection::AllRight => self.move_all_right(),
            MoveDirection::AllLeft => self.move_all_left(),
            MoveDirection::SelectedRight => self.move_selected_right(),
            MoveDirection::SelectedLeft => self.move_selected_left(),
        }
    }

    /// Commits the working selection, discarding highlights.
    pub fn save(self) -> BTreeSet<String> {
        self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(id: &str, name: &str) -> TransferEntry {
        TransferEntry {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn ids(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn three_employee_list(selected: &[&str]) -> TransferList {
        TransferList::new(
            vec![
                entry("E1", "Sarah Jenkins"),
                entry("E2", "Michael Chen"),
                entry("E3", "Elena Rodriguez"),
            ],
            &ids(selected),
        )
    }

    fn available_ids(list: &TransferList) -> BTreeSet<String> {
        list.available().map(|e| e.id.clone()).collect()
    }

    fn assert_partition(list: &TransferList) {
        let available = available_ids(list);
        let selected = list.selected_ids().clone();
        let universe: BTreeSet<String> = list.universe.iter().map(|e| e.id.clone()).collect();

        assert!(available.is_disjoint(&selected));
        assert_eq!(&available | &selected, universe);
        assert!(list.highlighted(Pane::Available).is_subset(&available));
        assert!(list.highlighted(Pane::Selected).is_subset(&selected));
    }

    #[test]
    fn test_highlight_and_move_right_scenario() {
        let mut list = three_employee_list(&["E1"]);
        assert!(list.toggle_highlight(Pane::Available, "E2").unwrap());

        assert_eq!(list.move_selected_right(), 1);
        assert_eq!(list.selected_ids(), &ids(&["E1", "E2"]));
        assert!(list.highlighted(Pane::Available).is_empty());
        assert_partition(&list);
    }

    #[test]
    fn test_move_selected_right_without_highlights_is_noop() {
        let mut list = three_employee_list(&["E1"]);
        assert_eq!(list.move_selected_right(), 0);
        assert_eq!(list.selected_ids(), &ids(&["E1"]));
    }

    #[test]
    fn test_move_selected_left() {
        let mut list = three_employee_list(&["E1", "E2", "E3"]);
        list.toggle_highlight(Pane::Selected, "E1").unwrap();
        list.toggle_highlight(Pane::Selected, "E3").unwrap();

        assert_eq!(list.move_selected_left(), 2);
        assert_eq!(list.selected_ids(), &ids(&["E2"]));
        assert!(list.highlighted(Pane::Selected).is_empty());
        assert_partition(&list);
    }

    #[test]
    fn test_move_all_left_then_right_restores_universe() {
        let mut list = three_employee_list(&["E1", "E2"]);
        list.toggle_highlight(Pane::Selected, "E1").unwrap();
        list.toggle_highlight(Pane::Available, "E3").unwrap();

        assert_eq!(list.move_all_left(), 2);
        assert!(list.selected_ids().is_empty());
        assert!(list.highlighted(Pane::Selected).is_empty());

        assert_eq!(list.move_all_right(), 3);
        assert_eq!(list.selected_ids(), &ids(&["E1", "E2", "E3"]));
        assert!(list.highlighted(Pane::Available).is_empty());
        assert!(list.highlighted(Pane::Selected).is_empty());
    }

    #[test]
    fn test_toggle_highlight_twice_unhighlights() {
        let mut list = three_employee_list(&[]);
        assert!(list.toggle_highlight(Pane::Available, "E1").unwrap());
        assert!(!list.toggle_highlight(Pane::Available, "E1").unwrap());
        assert!(list.highlighted(Pane::Available).is_empty());
    }

    #[test]
    fn test_toggle_highlight_in_wrong_pane_is_rejected() {
        let mut list = three_employee_list(&["E1"]);

        match list.toggle_highlight(Pane::Available, "E1") {
            Err(RegistryError::NotInPane { employee_id, pane }) => {
                assert_eq!(employee_id, "E1");
                assert_eq!(pane, "available");
            }
            other => panic!("Expected NotInPane, got {:?}", other),
        }
        assert!(list.toggle_highlight(Pane::Selected, "E9").is_err());
    }

    #[test]
    fn test_panes_keep_universe_order() {
        let list = three_employee_list(&["E3", "E1"]);
        let selected: Vec<&str> = list.selected().map(|e| e.id.as_str()).collect();
        assert_eq!(selected, vec!["E1", "E3"]);
    }

    #[test]
    fn test_available_matching_filters_by_name() {
        let list = three_employee_list(&["E1"]);
        let matches: Vec<&str> = list
            .available_matching("CHEN")
            .into_iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(matches, vec!["E2"]);
        assert_eq!(list.available_matching("").len(), 2);
    }

    #[test]
    fn test_unknown_current_ids_are_dropped() {
        let list = three_employee_list(&["E1", "E9"]);
        assert_eq!(list.selected_ids(), &ids(&["E1"]));
    }

    #[test]
    fn test_save_returns_selection() {
        let mut list = three_employee_list(&["E1"]);
        list.move_all_right();
        assert_eq!(list.save(), ids(&["E1", "E2", "E3"]));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Toggle(Pane, usize),
        Move(MoveDirection),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        let pane = prop_oneof![Just(Pane::Available), Just(Pane::Selected)];
        let direction = prop_oneof![
            Just(MoveDirection::AllRight),
            Just(MoveDirection::AllLeft),
            Just(MoveDirection::SelectedRight),
            Just(MoveDirection::SelectedLeft),
        ];
        prop_oneof![
            (pane, 0..6usize).prop_map(|(pane, index)| Op::Toggle(pane, index)),
            direction.prop_map(Op::Move),
        ]
    }

    proptest! {
        #[test]
        fn prop_panes_partition_universe(
            initial in proptest::collection::btree_set(0..6usize, 0..6),
            ops in proptest::collection::vec(op_strategy(), 0..40),
        ) {
            let universe: Vec<TransferEntry> = (0..6)
                .map(|i| entry(&format!("E{}", i), &format!("Employee {}", i)))
                .collect();
            let current: BTreeSet<String> = initial.iter().map(|i| format!("E{}", i)).collect();
            let mut list = TransferList::new(universe, &current);
            assert_partition(&list);

            for op in ops {
                match op {
                    Op::Toggle(pane, index) => {
                        let _ = list.toggle_highlight(pane, &format!("E{}", index));
                    }
                    Op::Move(direction) => {
                        list.apply(direction);
                    }
                }
                assert_partition(&list);
            }
        }
    }
}
