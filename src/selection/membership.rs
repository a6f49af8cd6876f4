//! Deduction membership.
//!
//! An employee counts towards a deduction when they are in the current
//! selection and hold an enrollment whose plan name equals the deduction's
//! plan name, ignoring case. Nothing is cached; callers recompute whenever
//! the deductions, the roster or the selection change.

use std::collections::{BTreeSet, HashMap};

use crate::models::{Deduction, Employee};

/// Returns the selected employees enrolled in `deduction`, in roster order.
///
/// Only the plan name is compared. Category, provider and subtype are not,
/// so two deductions sharing a plan name share their members.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use deduction_registry::models::{Category, Deduction, DeductionStatus, Employee};
/// use deduction_registry::selection::enrolled_employees;
///
/// let deduction = Deduction {
///     id: "1".to_string(),
///     plan_name: "Basic PPO".to_string(),
///     provider_name: "BlueCross BlueShield".to_string(),
///     category: Category::Medical,
///     subtype: "PPO Plan".to_string(),
///     payroll_code: "MED-BCBS-01".to_string(),
///     status: DeductionStatus::Active,
///     is_pre_tax: true,
///     created_at: chrono::Utc::now(),
///     employee_count: 0,
/// };
/// let roster: Vec<Employee> = vec![];
///
/// assert!(enrolled_employees(&deduction, &roster, &BTreeSet::new()).is_empty());
/// ```
pub fn enrolled_employees<'a>(
    deduction: &Deduction,
    roster: &'a [Employee],
    selected: &BTreeSet<String>,
) -> Vec<&'a Employee> {
    roster
        .iter()
        .filter(|employee| {
            selected.contains(&employee.id) && employee.is_enrolled_in(&deduction.plan_name)
        })
        .collect()
}

/// Returns the number of enrolled selected employees per deduction id.
pub fn employee_counts(
    deductions: &[Deduction],
    roster: &[Employee],
    selected: &BTreeSet<String>,
) -> HashMap<String, usize> {
    deductions
        .iter()
        .map(|deduction| {
            (
                deduction.id.clone(),
                enrolled_employees(deduction, roster, selected).len(),
            )
        })
        .collect()
}
