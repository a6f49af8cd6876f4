//! Configuration types for the deduction registry.
//!
//! This module contains the strongly-typed structures deserialized from the
//! YAML seed files, and the assembled [`RegistryConfig`] built from them.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::models::{Category, Contribution, Deduction, DeductionStatus, Employee};

fn default_generation_timeout_ms() -> u64 {
    10_000
}

fn default_navigator_url() -> String {
    "https://www.employeenavigator.com".to_string()
}

/// Service settings from service.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceSettings {
    /// How long to wait for a payroll code suggestion before giving up.
    #[serde(default = "default_generation_timeout_ms")]
    pub generation_timeout_ms: u64,
    /// Where operators map newly created deductions in the benefits system.
    #[serde(default = "default_navigator_url")]
    pub navigator_url: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            generation_timeout_ms: default_generation_timeout_ms(),
            navigator_url: default_navigator_url(),
        }
    }
}

/// A plan offered to employees, shared by every enrollment in it.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanTemplate {
    /// The plan name.
    pub name: String,
    /// The plan type label.
    #[serde(rename = "type")]
    pub plan_type: String,
    /// Contribution frequency.
    pub frequency: String,
    /// Enrollment start date.
    pub start_date: NaiveDate,
    /// Enrollment end date, if any.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Employee contribution.
    pub amount: Contribution,
    /// Employer contribution.
    pub employer_amount: Contribution,
}

/// An employee's enrollment in a [`PlanTemplate`].
#[derive(Debug, Clone, Deserialize)]
pub struct EnrollmentSeed {
    /// Name of the plan template.
    pub plan: String,
    /// Whether the enrollment is synchronised.
    #[serde(default = "default_synced")]
    pub is_synced: bool,
    /// When the enrollment was last synchronised.
    pub last_synced: DateTime<Utc>,
}

fn default_synced() -> bool {
    true
}

/// An employee entry in roster.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeSeed {
    /// Employee id.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Enrollments, in display order.
    #[serde(default)]
    pub enrollments: Vec<EnrollmentSeed>,
}

/// Roster configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterConfig {
    /// Plans employees can be enrolled in.
    pub plans: Vec<PlanTemplate>,
    /// The employee universe, in display order.
    pub employees: Vec<EmployeeSeed>,
    /// Ids of the employees initially managed by the registry.
    #[serde(default)]
    pub selected: Vec<String>,
}

/// A deduction entry in deductions.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct DeductionSeed {
    /// Deduction id.
    pub id: String,
    /// Plan name.
    pub plan_name: String,
    /// Provider name.
    pub provider_name: String,
    /// Category key or display name.
    pub category: String,
    /// Subtype within the category.
    pub subtype: String,
    /// Payroll code.
    pub payroll_code: String,
    /// Status, active unless stated.
    #[serde(default = "default_status")]
    pub status: DeductionStatus,
    /// Whether the deduction is pre-tax.
    #[serde(default)]
    pub is_pre_tax: bool,
}

fn default_status() -> DeductionStatus {
    DeductionStatus::Active
}

/// Deductions configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct DeductionsConfig {
    /// Seed deductions, newest first.
    pub deductions: Vec<DeductionSeed>,
}

impl DeductionSeed {
    /// Builds a deduction stamped with `created_at`.
    pub(crate) fn into_deduction(self, category: Category, created_at: DateTime<Utc>) -> Deduction {
        Deduction {
            id: self.id,
            plan_name: self.plan_name,
            provider_name: self.provider_name,
            category,
            subtype: self.subtype,
            payroll_code: self.payroll_code,
            status: self.status,
            is_pre_tax: self.is_pre_tax,
            created_at,
            employee_count: 0,
        }
    }
}

/// The complete registry configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    settings: ServiceSettings,
    roster: Vec<Employee>,
    initial_selection: BTreeSet<String>,
    deductions: Vec<Deduction>,
}

impl RegistryConfig {
    /// Creates a new RegistryConfig from its component parts.
    pub fn new(
        settings: ServiceSettings,
        roster: Vec<Employee>,
        initial_selection: BTreeSet<String>,
        deductions: Vec<Deduction>,
    ) -> Self {
        Self {
            settings,
            roster,
            initial_selection,
            deductions,
        }
    }

    /// Returns the service settings.
    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Returns the employee universe.
    pub fn roster(&self) -> &[Employee] {
        &self.roster
    }

    /// Returns the initially selected employee ids.
    pub fn initial_selection(&self) -> &BTreeSet<String> {
        &self.initial_selection
    }

    /// Returns the seed deductions.
    pub fn deductions(&self) -> &[Deduction] {
        &self.deductions
    }
}
