//! Core data models for the deduction registry.
//!
//! This module contains the domain records shared by the registry, the
//! deduction wizard and the employee transfer list.

mod category;
mod deduction;
mod employee;

pub use category::{Category, CategoryProfile, catalog};
pub use deduction::{Deduction, DeductionStatus};
pub use employee::{Contribution, Employee, EnrollmentDetail};
