//! The add/edit deduction wizard.
//!
//! This module contains the wizard state machine, payroll code derivation
//! and the interface to the payroll code generator.

mod code;
mod generation;
mod machine;

pub use code::{MAX_CODE_LENGTH, derive_code, normalize_code};
pub use generation::{CodeGenerator, GenerationRequest, LocalCodeGenerator};
pub use machine::{
    DeductionDraft, DeductionEdit, DeductionWizard, DetailsUpdate, FinishedDeduction, WizardMode, WizardStep,
};
