//! Deduction model and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Category;

/// Whether a deduction is currently withheld.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeductionStatus {
    /// The deduction is withheld from pay.
    Active,
    /// The deduction is retained but not withheld.
    Inactive,
}

impl DeductionStatus {
    /// Returns the opposite status.
    pub fn toggled(self) -> Self {
        match self {
            DeductionStatus::Active => DeductionStatus::Inactive,
            DeductionStatus::Inactive => DeductionStatus::Active,
        }
    }
}

/// A payroll deduction registered for the organisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deduction {
    /// Unique identifier for the deduction.
    pub id: String,
    /// The plan name (e.g., "Basic PPO").
    pub plan_name: String,
    /// The provider name (e.g., "BlueCross BlueShield").
    pub provider_name: String,
    /// The deduction category.
    pub category: Category,
    /// The subtype within the category (e.g., "PPO Plan").
    pub subtype: String,
    /// Short upper-case code identifying the deduction in payroll.
    pub payroll_code: String,
    /// Whether the deduction is active.
    pub status: DeductionStatus,
    /// Whether the deduction is taken before tax.
    pub is_pre_tax: bool,
    /// When the deduction was created.
    pub created_at: DateTime<Utc>,
    /// Number of enrolled employees.
    ///
    /// Stored as a placeholder; live counts come from
    /// [`employee_counts`](crate::selection::employee_counts).
    #[serde(default)]
    pub employee_count: usize,
}

impl Deduction {
    /// Returns true if the deduction is active.
    pub fn is_active(&self) -> bool {
        self.status == DeductionStatus::Active
    }

    /// Flips the deduction between active and inactive.
    pub fn toggle_status(&mut self) {
        self.status = self.status.toggled();
    }

    /// Returns true if the plan name, provider name or payroll code contains
    /// `query`, ignoring case.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        [&self.plan_name, &self.provider_name, &self.payroll_code]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}
