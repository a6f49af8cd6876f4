//! The deduction list.

use crate::error::{RegistryError, RegistryResult};
use crate::models::Deduction;
use crate::wizard::{DeductionEdit, FinishedDeduction};

/// Registered deductions, newest first.
#[derive(Debug, Clone, Default)]
pub struct DeductionRegistry {
    deductions: Vec<Deduction>,
}

impl DeductionRegistry {
    /// Creates a registry holding `deductions`, which are assumed newest first.
    pub fn new(deductions: Vec<Deduction>) -> Self {
        Self { deductions }
    }

    /// Returns every deduction, newest first.
    pub fn list(&self) -> &[Deduction] {
        &self.deductions
    }

    /// Returns the deductions whose plan name, provider name or payroll code
    /// contains `search`, ignoring case.
    pub fn filter(&self, search: &str) -> Vec<&Deduction> {
        self.deductions
            .iter()
            .filter(|d| d.matches_search(search))
            .collect()
    }

    /// Gets a deduction by id.
    pub fn get(&self, id: &str) -> RegistryResult<&Deduction> {
        self.deductions
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| RegistryError::DeductionNotFound { id: id.to_string() })
    }

    fn get_mut(&mut self, id: &str) -> RegistryResult<&mut Deduction> {
        self.deductions
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| RegistryError::DeductionNotFound { id: id.to_string() })
    }

    /// Adds a deduction at the front of the list.
    pub fn add(&mut self, deduction: Deduction) -> &Deduction {
        self.deductions.insert(0, deduction);
        &self.deductions[0]
    }

    /// Applies detail changes to the stored deduction with the edit's id.
    ///
    /// Status, category, subtype, payroll code and creation time are taken
    /// from the stored record, not from when the edit was opened.
    pub fn update(&mut self, edit: &DeductionEdit) -> RegistryResult<&Deduction> {
        let slot = self.get_mut(&edit.id)?;
        edit.apply_to(slot);
        Ok(&*slot)
    }

    /// Flips a deduction between active and inactive.
    pub fn toggle_status(&mut self, id: &str) -> RegistryResult<&Deduction> {
        let deduction = self.get_mut(id)?;
        deduction.toggle_status();
        Ok(&*deduction)
    }

    /// Records the result of a finished wizard.
    pub fn apply(&mut self, finished: FinishedDeduction) -> RegistryResult<&Deduction> {
        match finished {
            FinishedDeduction::Created(deduction) => Ok(self.add(deduction)),
            FinishedDeduction::Updated(edit) => self.update(&edit),
        }
    }
}
