//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the registry's
//! seed data and settings from YAML files.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::Path;

use chrono::Utc;
use tracing::debug;

use crate::error::{RegistryError, RegistryResult};
use crate::models::{Category, Deduction, Employee, EnrollmentDetail};

use super::types::{
    DeductionsConfig, PlanTemplate, RegistryConfig, RosterConfig, ServiceSettings,
};

/// Loads and provides access to the registry configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/default/
/// ├── service.yaml      # Service settings
/// ├── roster.yaml       # Plans, employees and the initial selection
/// └── deductions.yaml   # Seed deductions
/// ```
///
/// # Example
///
/// ```no_run
/// use deduction_registry::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Loaded {} employees", loader.roster().len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: RegistryConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The roster or seed deductions are inconsistent
    pub fn load<P: AsRef<Path>>(path: P) -> RegistryResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<ServiceSettings>(&path.join("service.yaml"))?;
        let roster_config = Self::load_yaml::<RosterConfig>(&path.join("roster.yaml"))?;
        let deductions_config =
            Self::load_yaml::<DeductionsConfig>(&path.join("deductions.yaml"))?;

        let (roster, initial_selection) = Self::build_roster(roster_config)?;
        let deductions = Self::build_deductions(deductions_config)?;

        debug!(
            path = %path.display(),
            employees = roster.len(),
            selected = initial_selection.len(),
            deductions = deductions.len(),
            "Loaded registry configuration"
        );

        Ok(Self {
            config: RegistryConfig::new(settings, roster, initial_selection, deductions),
        })
    }

    /// Wraps an already assembled configuration.
    pub fn from_config(config: RegistryConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> RegistryResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| RegistryError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| RegistryError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Expands employee enrollments against the plan templates.
    fn build_roster(config: RosterConfig) -> RegistryResult<(Vec<Employee>, BTreeSet<String>)> {
        let plans: HashMap<&str, &PlanTemplate> = config
            .plans
            .iter()
            .map(|plan| (plan.name.as_str(), plan))
            .collect();

        let mut seen = HashSet::new();
        let mut roster = Vec::with_capacity(config.employees.len());

        for seed in config.employees {
            if !seen.insert(seed.id.clone()) {
                return Err(RegistryError::InvalidConfig {
                    message: format!("duplicate employee id '{}'", seed.id),
                });
            }

            let enrollments = seed
                .enrollments
                .into_iter()
                .map(|enrollment| {
                    let plan = plans.get(enrollment.plan.as_str()).ok_or_else(|| {
                        RegistryError::InvalidConfig {
                            message: format!(
                                "employee '{}' is enrolled in unknown plan '{}'",
                                seed.id, enrollment.plan
                            ),
                        }
                    })?;
                    Ok(EnrollmentDetail {
                        name: plan.name.clone(),
                        plan_type: plan.plan_type.clone(),
                        frequency: plan.frequency.clone(),
                        start_date: plan.start_date,
                        end_date: plan.end_date,
                        amount: plan.amount,
                        employer_amount: plan.employer_amount,
                        is_synced: enrollment.is_synced,
                        last_synced: enrollment.last_synced,
                    })
                })
                .collect::<RegistryResult<Vec<_>>>()?;

            roster.push(Employee {
                id: seed.id,
                name: seed.name,
                enrollments,
            });
        }

        let mut selection = BTreeSet::new();
        for id in config.selected {
            if !seen.contains(&id) {
                return Err(RegistryError::InvalidConfig {
                    message: format!("selected employee '{}' is not on the roster", id),
                });
            }
            selection.insert(id);
        }

        Ok((roster, selection))
    }

    /// Resolves seed deduction categories and checks their subtypes.
    fn build_deductions(config: DeductionsConfig) -> RegistryResult<Vec<Deduction>> {
        let created_at = Utc::now();

        config
            .deductions
            .into_iter()
            .map(|seed| {
                let category =
                    Category::from_key(&seed.category).map_err(|e| RegistryError::InvalidConfig {
                        message: format!("deduction '{}': {}", seed.id, e),
                    })?;
                category
                    .validate_subtype(&seed.subtype)
                    .map_err(|e| RegistryError::InvalidConfig {
                        message: format!("deduction '{}': {}", seed.id, e),
                    })?;
                Ok(seed.into_deduction(category, created_at))
            })
            .collect()
    }

    /// Returns the underlying registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Returns the service settings.
    pub fn settings(&self) -> &ServiceSettings {
        self.config.settings()
    }

    /// Returns the employee universe.
    pub fn roster(&self) -> &[Employee] {
        self.config.roster()
    }

    /// Returns the initially selected employee ids.
    pub fn initial_selection(&self) -> &BTreeSet<String> {
        self.config.initial_selection()
    }

    /// Returns the seed deductions.
    pub fn deductions(&self) -> &[Deduction] {
        self.config.deductions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Contribution, DeductionStatus};
    use rust_decimal::Decimal;

    fn config_path() -> &'static str {
        "./config/default"
    }

    fn roster_from_yaml(yaml: &str) -> RegistryResult<(Vec<Employee>, BTreeSet<String>)> {
        ConfigLoader::build_roster(serde_yaml::from_str(yaml).unwrap())
    }

    const PLANS: &str = r#"
plans:
  - name: Basic PPO
    type: Medical
    frequency: Bi-weekly
    start_date: 2024-01-01
    amount: "$155.00"
    employer_amount: "$420.00"
"#;

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.roster().len(), 25);
        assert_eq!(loader.initial_selection().len(), 15);
        assert_eq!(loader.deductions().len(), 3);
        assert_eq!(loader.settings().generation_timeout_ms, 10_000);
    }

    #[test]
    fn test_seed_deductions_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let first = &loader.deductions()[0];
        assert_eq!(first.id, "1");
        assert_eq!(first.plan_name, "Basic PPO");
        assert_eq!(first.category, Category::Medical);
        assert_eq!(first.payroll_code, "MED-BCBS-01");
        assert_eq!(first.status, DeductionStatus::Active);
        assert!(first.is_pre_tax);
    }

    #[test]
    fn test_enrollments_expanded_from_plans() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let employee = loader
            .roster()
            .iter()
            .find(|e| e.id == "EMP001")
            .expect("EMP001 should be on the roster");
        assert_eq!(employee.name, "Sarah Jenkins");

        let ppo = employee
            .enrollments
            .iter()
            .find(|e| e.name == "Basic PPO")
            .expect("EMP001 should be enrolled in Basic PPO");
        assert_eq!(ppo.amount, Contribution::Amount(Decimal::new(15500, 2)));
        assert_eq!(ppo.frequency, "Bi-weekly");
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        match ConfigLoader::load("/nonexistent/path") {
            Err(RegistryError::ConfigNotFound { path }) => {
                assert!(path.contains("service.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_plan_reference_is_rejected() {
        let yaml = format!(
            "{}employees:\n  - id: EMP001\n    name: Sarah Jenkins\n    enrollments:\n      - {{ plan: Vision Gold, last_synced: \"2026-10-19T09:00:00Z\" }}\n",
            PLANS
        );

        match roster_from_yaml(&yaml) {
            Err(RegistryError::InvalidConfig { message }) => {
                assert!(message.contains("Vision Gold"));
            }
            other => panic!("Expected InvalidConfig error, got {:?}", other),
        }
    }

    #[test]
    fn test_selection_outside_roster_is_rejected() {
        let yaml = format!(
            "{}employees:\n  - id: EMP001\n    name: Sarah Jenkins\nselected: [EMP002]\n",
            PLANS
        );

        match roster_from_yaml(&yaml) {
            Err(RegistryError::InvalidConfig { message }) => {
                assert!(message.contains("EMP002"));
            }
            other => panic!("Expected InvalidConfig error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_employee_is_rejected() {
        let yaml = format!(
            "{}employees:\n  - id: EMP001\n    name: Sarah Jenkins\n  - id: EMP001\n    name: Michael Chen\n",
            PLANS
        );

        assert!(matches!(
            roster_from_yaml(&yaml),
            Err(RegistryError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_seed_with_disallowed_subtype_is_rejected() {
        let config: DeductionsConfig = serde_yaml::from_str(
            r#"
deductions:
  - id: "9"
    plan_name: Vision Gold
    provider_name: VSP
    category: VISION
    subtype: PPO Plan
    payroll_code: VIS-VSP-01
"#,
        )
        .unwrap();

        match ConfigLoader::build_deductions(config) {
            Err(RegistryError::InvalidConfig { message }) => {
                assert!(message.contains("PPO Plan"));
            }
            other => panic!("Expected InvalidConfig error, got {:?}", other),
        }
    }
}
