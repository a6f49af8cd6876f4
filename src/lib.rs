//! Payroll deduction registry
//!
//! This crate keeps the list of payroll deductions for a company, walks an
//! operator through setting up or editing a deduction, and tracks which
//! employees are selected and therefore counted as enrolled.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod selection;
pub mod wizard;
