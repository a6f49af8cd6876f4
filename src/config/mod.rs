//! Configuration loading and management for the deduction registry.
//!
//! This module loads the service settings, the employee roster and the seed
//! deductions from YAML files. Everything loaded here is read-only for the
//! life of the process.
//!
//! # Example
//!
//! ```no_run
//! use deduction_registry::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Seed deductions: {}", config.deductions().len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DeductionSeed, DeductionsConfig, EmployeeSeed, EnrollmentSeed, PlanTemplate, RegistryConfig,
    RosterConfig, ServiceSettings,
};
