//! The in-memory workspace.
//!
//! The workspace owns everything the service mutates: the deduction list,
//! the committed employee selection, and the open wizard and transfer list
//! sessions. The roster is read-only.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::ConfigLoader;
use crate::error::{RegistryError, RegistryResult};
use crate::models::{Deduction, Employee};
use crate::selection::{TransferEntry, TransferList, employee_counts, enrolled_employees};
use crate::wizard::{DeductionWizard, FinishedDeduction, GenerationRequest};

use super::{DeductionRegistry, SessionMap};

/// Most wizards, and separately most transfer lists, open at once. Opening
/// one more evicts the oldest.
pub const MAX_OPEN_SESSIONS: usize = 256;

/// All mutable registry state.
#[derive(Debug, Clone)]
pub struct Workspace {
    registry: DeductionRegistry,
    roster: Vec<Employee>,
    selected: BTreeSet<String>,
    wizards: SessionMap<DeductionWizard>,
    transfers: SessionMap<TransferList>,
}

impl Workspace {
    /// Creates a workspace from its parts.
    pub fn new(
        deductions: Vec<Deduction>,
        roster: Vec<Employee>,
        selected: BTreeSet<String>,
    ) -> Self {
        Self {
            registry: DeductionRegistry::new(deductions),
            roster,
            selected,
            wizards: SessionMap::new(MAX_OPEN_SESSIONS),
            transfers: SessionMap::new(MAX_OPEN_SESSIONS),
        }
    }

    /// Creates a workspace seeded from configuration.
    pub fn from_config(config: &ConfigLoader) -> Self {
        Self::new(
            config.deductions().to_vec(),
            config.roster().to_vec(),
            config.initial_selection().clone(),
        )
    }

    /// Returns the deduction list.
    pub fn registry(&self) -> &DeductionRegistry {
        &self.registry
    }

    /// Returns the employee universe.
    pub fn roster(&self) -> &[Employee] {
        &self.roster
    }

    /// Returns the committed employee selection.
    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    /// Returns the selected employees whose name contains `search`.
    pub fn selected_employees(&self, search: &str) -> Vec<&Employee> {
        self.roster
            .iter()
            .filter(|e| self.selected.contains(&e.id) && e.name_matches(search))
            .collect()
    }

    /// Returns the deductions matching `search`, each carrying its live
    /// employee count.
    pub fn deductions_with_counts(&self, search: &str) -> Vec<Deduction> {
        let counts = employee_counts(self.registry.list(), &self.roster, &self.selected);
        self.registry
            .filter(search)
            .into_iter()
            .map(|d| Deduction {
                employee_count: counts.get(&d.id).copied().unwrap_or(0),
                ..d.clone()
            })
            .collect()
    }

    /// Returns a copy of one deduction carrying its live employee count.
    pub fn deduction(&self, deduction_id: &str) -> RegistryResult<Deduction> {
        let deduction = self.registry.get(deduction_id)?;
        Ok(Deduction {
            employee_count: enrolled_employees(deduction, &self.roster, &self.selected).len(),
            ..deduction.clone()
        })
    }

    /// Returns the selected employees enrolled in the given deduction.
    pub fn deduction_members(&self, deduction_id: &str) -> RegistryResult<Vec<&Employee>> {
        let deduction = self.registry.get(deduction_id)?;
        Ok(enrolled_employees(deduction, &self.roster, &self.selected))
    }

    /// Flips a deduction between active and inactive.
    pub fn toggle_status(&mut self, deduction_id: &str) -> RegistryResult<&Deduction> {
        let deduction = self.registry.toggle_status(deduction_id)?;
        info!(
            deduction_id = %deduction.id,
            status = ?deduction.status,
            "Deduction status toggled"
        );
        Ok(deduction)
    }

    /// Opens a wizard for a new deduction.
    pub fn open_create_wizard(&mut self) -> Uuid {
        let (id, evicted) = self.wizards.open(DeductionWizard::new());
        log_eviction("wizard", evicted);
        debug!(session_id = %id, "Opened create wizard");
        id
    }

    /// Opens a wizard editing an existing deduction.
    pub fn open_edit_wizard(&mut self, deduction_id: &str) -> RegistryResult<Uuid> {
        let existing = self.registry.get(deduction_id)?.clone();
        let (id, evicted) = self.wizards.open(DeductionWizard::edit(existing));
        log_eviction("wizard", evicted);
        debug!(session_id = %id, deduction_id, "Opened edit wizard");
        Ok(id)
    }

    /// Gets an open wizard.
    pub fn wizard(&self, session_id: Uuid) -> RegistryResult<&DeductionWizard> {
        self.wizards.get(session_id)
    }

    /// Gets an open wizard for modification.
    pub fn wizard_mut(&mut self, session_id: Uuid) -> RegistryResult<&mut DeductionWizard> {
        self.wizards.get_mut(session_id)
    }

    /// Closes a wizard without saving. Any outstanding code suggestion for it
    /// is discarded when it arrives.
    pub fn close_wizard(&mut self, session_id: Uuid) -> RegistryResult<()> {
        self.wizards.close(session_id).map(|_| ())
    }

    /// Starts a payroll code suggestion for a wizard.
    pub fn begin_generation(&mut self, session_id: Uuid) -> RegistryResult<GenerationRequest> {
        self.wizard_mut(session_id)?.begin_generation()
    }

    /// Delivers a payroll code suggestion to a wizard.
    ///
    /// Returns whether the outcome was applied. Fails with `SessionNotFound`
    /// if the wizard has been closed in the meantime.
    pub fn complete_generation(
        &mut self,
        session_id: Uuid,
        ticket: u64,
        outcome: Result<&str, &RegistryError>,
    ) -> RegistryResult<bool> {
        let wizard = self.wizard_mut(session_id)?;
        Ok(wizard.complete_generation(ticket, outcome))
    }

    /// Finishes a wizard, records the deduction and closes the session.
    ///
    /// On failure the wizard stays open.
    pub fn finish_wizard(&mut self, session_id: Uuid) -> RegistryResult<(bool, Deduction)> {
        let finished = self.wizard_mut(session_id)?.finish()?;
        let created = matches!(finished, FinishedDeduction::Created(_));
        let deduction = self.registry.apply(finished)?.clone();
        self.wizards.close(session_id)?;

        info!(
            session_id = %session_id,
            deduction_id = %deduction.id,
            payroll_code = %deduction.payroll_code,
            created,
            "Deduction saved"
        );
        Ok((created, deduction))
    }

    /// Opens a transfer list over the committed selection.
    pub fn open_transfer(&mut self) -> Uuid {
        let list = TransferList::new(self.roster.iter().map(TransferEntry::from), &self.selected);
        let (id, evicted) = self.transfers.open(list);
        log_eviction("transfer list", evicted);
        debug!(session_id = %id, "Opened transfer list");
        id
    }

    /// Gets an open transfer list.
    pub fn transfer(&self, session_id: Uuid) -> RegistryResult<&TransferList> {
        self.transfers.get(session_id)
    }

    /// Gets an open transfer list for modification.
    pub fn transfer_mut(&mut self, session_id: Uuid) -> RegistryResult<&mut TransferList> {
        self.transfers.get_mut(session_id)
    }

    /// Commits a transfer list as the new selection and closes it.
    pub fn save_transfer(&mut self, session_id: Uuid) -> RegistryResult<&BTreeSet<String>> {
        let list = self.transfers.close(session_id)?;
        self.selected = list.save();
        info!(
            session_id = %session_id,
            selected = self.selected.len(),
            "Employee selection saved"
        );
        Ok(&self.selected)
    }

    /// Discards a transfer list, leaving the committed selection untouched.
    pub fn cancel_transfer(&mut self, session_id: Uuid) -> RegistryResult<()> {
        self.transfers.close(session_id).map(|_| ())
    }
}

fn log_eviction(kind: &str, evicted: Option<Uuid>) {
    if let Some(session_id) = evicted {
        warn!(session_id = %session_id, kind, "Evicted oldest open session");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, DeductionStatus};
    use crate::selection::{MoveDirection, Pane};
    use crate::wizard::DetailsUpdate;

    fn workspace() -> Workspace {
        Workspace::from_config(&ConfigLoader::load("./config/default").unwrap())
    }

    fn details(plan: &str, provider: &str) -> DetailsUpdate {
        DetailsUpdate {
            plan_name: Some(plan.to_string()),
            provider_name: Some(provider.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_counts_reflect_seed_selection() {
        let workspace = workspace();
        let deductions = workspace.deductions_with_counts("");

        let count = |id: &str| {
            deductions
                .iter()
                .find(|d| d.id == id)
                .map(|d| d.employee_count)
                .unwrap()
        };
        assert_eq!(count("1"), 11);
        assert_eq!(count("2"), 0);
        assert_eq!(count("3"), 10);
    }

    #[test]
    fn test_finish_create_wizard_adds_deduction_first() {
        let mut workspace = workspace();
        let session = workspace.open_create_wizard();
        {
            let wizard = workspace.wizard_mut(session).unwrap();
            wizard.choose_category(Category::Vision).unwrap();
            wizard.choose_subtype("Vision PPO").unwrap();
            wizard.update_details(details("Vision Gold", "VSP")).unwrap();
        }

        let (created, deduction) = workspace.finish_wizard(session).unwrap();
        assert!(created);
        assert_eq!(deduction.payroll_code, "VSP-VISI");
        assert_eq!(workspace.registry().list()[0].id, deduction.id);
        assert!(workspace.wizard(session).is_err());

        let members = workspace.deduction_members(&deduction.id).unwrap();
        assert_eq!(members.len(), 10);
    }

    #[test]
    fn test_blocked_finish_keeps_wizard_open() {
        let mut workspace = workspace();
        let session = workspace.open_create_wizard();

        assert!(workspace.finish_wizard(session).is_err());
        assert!(workspace.wizard(session).is_ok());
        assert_eq!(workspace.registry().list().len(), 3);
    }

    #[test]
    fn test_finish_edit_wizard_updates_in_place() {
        let mut workspace = workspace();
        let session = workspace.open_edit_wizard("2").unwrap();
        workspace
            .wizard_mut(session)
            .unwrap()
            .update_details(DetailsUpdate {
                plan_name: Some("401k Contribution".to_string()),
                ..Default::default()
            })
            .unwrap();

        let (created, deduction) = workspace.finish_wizard(session).unwrap();
        assert!(!created);
        assert_eq!(deduction.id, "2");
        assert_eq!(deduction.payroll_code, "RET-FID-01");
        assert_eq!(workspace.registry().list().len(), 3);
        assert_eq!(workspace.deduction_members("2").unwrap().len(), 11);
    }

    #[test]
    fn test_toggle_during_edit_survives_finish() {
        let mut workspace = workspace();
        let session = workspace.open_edit_wizard("1").unwrap();

        let toggled = workspace.toggle_status("1").unwrap().status;
        assert_eq!(toggled, DeductionStatus::Inactive);

        workspace
            .wizard_mut(session)
            .unwrap()
            .update_details(DetailsUpdate {
                plan_name: Some("Basic PPO 2025".to_string()),
                ..Default::default()
            })
            .unwrap();
        let (_, deduction) = workspace.finish_wizard(session).unwrap();

        assert_eq!(deduction.plan_name, "Basic PPO 2025");
        assert_eq!(deduction.status, DeductionStatus::Inactive);
        assert_eq!(
            workspace.registry().get("1").unwrap().status,
            DeductionStatus::Inactive
        );
    }

    #[test]
    fn test_failed_apply_keeps_wizard_open() {
        let mut workspace = workspace();
        let session = workspace.open_edit_wizard("1").unwrap();
        workspace.registry = DeductionRegistry::new(Vec::new());

        assert!(matches!(
            workspace.finish_wizard(session),
            Err(RegistryError::DeductionNotFound { .. })
        ));
        assert!(workspace.wizard(session).is_ok());
    }

    #[test]
    fn test_abandoned_sessions_are_capped() {
        let mut workspace = workspace();
        let first_wizard = workspace.open_create_wizard();
        let first_transfer = workspace.open_transfer();
        let mut last_wizard = first_wizard;
        let mut last_transfer = first_transfer;
        for _ in 0..MAX_OPEN_SESSIONS {
            last_wizard = workspace.open_create_wizard();
            last_transfer = workspace.open_transfer();
        }

        assert_eq!(workspace.wizards.len(), MAX_OPEN_SESSIONS);
        assert_eq!(workspace.transfers.len(), MAX_OPEN_SESSIONS);
        assert!(workspace.wizard(first_wizard).is_err());
        assert!(workspace.transfer(first_transfer).is_err());
        assert!(workspace.wizard(last_wizard).is_ok());
        assert!(workspace.transfer(last_transfer).is_ok());
    }

    #[test]
    fn test_edit_unknown_deduction_returns_error() {
        let mut workspace = workspace();
        assert!(matches!(
            workspace.open_edit_wizard("missing"),
            Err(RegistryError::DeductionNotFound { .. })
        ));
    }

    #[test]
    fn test_generation_result_for_closed_wizard_is_discarded() {
        let mut workspace = workspace();
        let session = workspace.open_create_wizard();
        {
            let wizard = workspace.wizard_mut(session).unwrap();
            wizard.choose_category(Category::Medical).unwrap();
            wizard.choose_subtype("HMO Plan").unwrap();
        }
        let request = workspace.begin_generation(session).unwrap();
        workspace.close_wizard(session).unwrap();

        assert!(matches!(
            workspace.complete_generation(session, request.ticket, Ok("MED-LATE-01")),
            Err(RegistryError::SessionNotFound { .. })
        ));
    }

    #[test]
    fn test_saved_transfer_changes_counts() {
        let mut workspace = workspace();
        let session = workspace.open_transfer();
        workspace
            .transfer_mut(session)
            .unwrap()
            .apply(MoveDirection::AllRight);

        let selected = workspace.save_transfer(session).unwrap();
        assert_eq!(selected.len(), 25);

        let deductions = workspace.deductions_with_counts("basic");
        assert_eq!(deductions.len(), 1);
        assert_eq!(deductions[0].employee_count, 18);
    }

    #[test]
    fn test_cancelled_transfer_leaves_selection() {
        let mut workspace = workspace();
        let before = workspace.selected().clone();

        let session = workspace.open_transfer();
        {
            let list = workspace.transfer_mut(session).unwrap();
            list.toggle_highlight(Pane::Selected, "EMP001").unwrap();
            list.apply(MoveDirection::SelectedLeft);
        }
        workspace.cancel_transfer(session).unwrap();

        assert_eq!(workspace.selected(), &before);
        assert!(workspace.transfer(session).is_err());
    }

    #[test]
    fn test_selected_employees_filters_by_name() {
        let workspace = workspace();
        assert_eq!(workspace.selected_employees("").len(), 15);

        let matches = workspace.selected_employees("jenkins");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "EMP001");

        // Karen Robinson is on the roster but not selected.
        assert!(workspace.selected_employees("robinson").is_empty());
    }
}
