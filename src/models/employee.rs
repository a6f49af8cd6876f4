//! Employee model and related types.
//!
//! This module defines the Employee struct, the enrollment records shown on
//! the employee roster, and the Contribution type used for enrollment
//! amounts.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A per-period contribution towards a plan.
///
/// Serialized as its display string: `"$155.00"` for a flat amount or
/// `"5%"` for a percentage of pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Contribution {
    /// A flat currency amount per pay period.
    Amount(Decimal),
    /// A percentage of gross pay.
    Percent(Decimal),
}

impl fmt::Display for Contribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contribution::Amount(amount) => write!(f, "${:.2}", amount),
            Contribution::Percent(percent) => write!(f, "{}%", percent.normalize()),
        }
    }
}

impl FromStr for Contribution {
    type Err = String;

    /// Parses `"$155.00"` or `"5%"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use deduction_registry::models::Contribution;
    /// use rust_decimal::Decimal;
    ///
    /// let flat: Contribution = "$48.50".parse().unwrap();
    /// assert_eq!(flat, Contribution::Amount(Decimal::new(4850, 2)));
    ///
    /// let percent: Contribution = "3%".parse().unwrap();
    /// assert_eq!(percent, Contribution::Percent(Decimal::new(3, 0)));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse = |value: &str| {
            Decimal::from_str(value.trim())
                .map_err(|e| format!("invalid contribution '{}': {}", s, e))
        };

        if let Some(percent) = s.strip_suffix('%') {
            Ok(Contribution::Percent(parse(percent)?))
        } else if let Some(amount) = s.strip_prefix('$') {
            Ok(Contribution::Amount(parse(amount)?))
        } else {
            Err(format!(
                "invalid contribution '{}': expected '$<amount>' or '<percent>%'",
                s
            ))
        }
    }
}

impl TryFrom<String> for Contribution {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Contribution> for String {
    fn from(value: Contribution) -> Self {
        value.to_string()
    }
}

/// An employee's enrollment in a named plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentDetail {
    /// The plan name; matched against deduction plan names.
    pub name: String,
    /// The plan type label (e.g., "Medical").
    #[serde(rename = "type")]
    pub plan_type: String,
    /// How often the contribution is taken (e.g., "Bi-weekly").
    pub frequency: String,
    /// First day of the enrollment.
    pub start_date: NaiveDate,
    /// Last day of the enrollment, if it has one.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// The employee contribution.
    pub amount: Contribution,
    /// The employer contribution.
    pub employer_amount: Contribution,
    /// Whether the enrollment matches the benefits administrator.
    #[serde(default)]
    pub is_synced: bool,
    /// When the enrollment was last synchronised.
    pub last_synced: DateTime<Utc>,
}

/// An employee on the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee (e.g., "EMP001").
    pub id: String,
    /// Full name.
    pub name: String,
    /// Plan enrollments, in display order.
    #[serde(default)]
    pub enrollments: Vec<EnrollmentDetail>,
}

impl Employee {
    /// Returns true if the employee has an enrollment whose name equals
    /// `plan_name`, ignoring case.
    ///
    /// # Examples
    ///
    /// ```
    /// use deduction_registry::models::Employee;
    ///
    /// let employee = Employee {
    ///     id: "EMP001".to_string(),
    ///     name: "Sarah Jenkins".to_string(),
    ///     enrollments: vec![],
    /// };
    /// assert!(!employee.is_enrolled_in("Basic PPO"));
    /// ```
    pub fn is_enrolled_in(&self, plan_name: &str) -> bool {
        let plan_name = plan_name.to_lowercase();
        self.enrollments
            .iter()
            .any(|e| e.name.to_lowercase() == plan_name)
    }

    /// Returns true if the name contains `query`, ignoring case.
    pub fn name_matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }

    /// Returns the first letter of each part of the name (e.g., "SJ").
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_enrollment(name: &str) -> EnrollmentDetail {
        EnrollmentDetail {
            name: name.to_string(),
            plan_type: "Medical".to_string(),
            frequency: "Bi-weekly".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: None,
            amount: Contribution::Amount(Decimal::new(15500, 2)),
            employer_amount: Contribution::Amount(Decimal::new(42000, 2)),
            is_synced: true,
            last_synced: Utc::now(),
        }
    }

    fn create_test_employee() -> Employee {
        Employee {
            id: "EMP001".to_string(),
            name: "Sarah Jenkins".to_string(),
            enrollments: vec![create_enrollment("basic ppo")],
        }
    }

    #[test]
    fn test_is_enrolled_in_ignores_case() {
        let employee = create_test_employee();
        assert!(employee.is_enrolled_in("Basic PPO"));
        assert!(employee.is_enrolled_in("BASIC PPO"));
        assert!(!employee.is_enrolled_in("Basic"));
    }

    #[test]
    fn test_name_matches_substring() {
        let employee = create_test_employee();
        assert!(employee.name_matches("jenk"));
        assert!(employee.name_matches(""));
        assert!(!employee.name_matches("chen"));
    }

    #[test]
    fn test_initials() {
        assert_eq!(create_test_employee().initials(), "SJ");
    }

    #[test]
    fn test_contribution_display() {
        assert_eq!(
            Contribution::Amount(Decimal::new(1420, 2)).to_string(),
            "$14.20"
        );
        assert_eq!(Contribution::Amount(Decimal::ZERO).to_string(), "$0.00");
        assert_eq!(Contribution::Percent(Decimal::new(5, 0)).to_string(), "5%");
    }

    #[test]
    fn test_contribution_rejects_bare_number() {
        assert!("155.00".parse::<Contribution>().is_err());
        assert!("$abc".parse::<Contribution>().is_err());
    }

    #[test]
    fn test_deserialize_enrollment() {
        let json = r#"{
            "name": "401k Contribution",
            "type": "Retirement",
            "frequency": "Monthly",
            "start_date": "2024-01-01",
            "end_date": null,
            "amount": "5%",
            "employer_amount": "3%",
            "is_synced": false,
            "last_synced": "2026-10-17T08:00:00Z"
        }"#;

        let enrollment: EnrollmentDetail = serde_json::from_str(json).unwrap();
        assert_eq!(enrollment.plan_type, "Retirement");
        assert_eq!(enrollment.amount, Contribution::Percent(Decimal::new(5, 0)));
        assert_eq!(enrollment.end_date, None);
        assert!(!enrollment.is_synced);
    }

    #[test]
    fn test_serialize_contribution_as_display_string() {
        let enrollment = create_enrollment("Basic PPO");
        let value = serde_json::to_value(&enrollment).unwrap();
        assert_eq!(value["amount"], "$155.00");
        assert_eq!(value["employer_amount"], "$420.00");
        assert_eq!(value["type"], "Medical");
    }
}
