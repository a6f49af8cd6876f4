//! Error types for the deduction registry.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every error condition the registry, the wizard and the transfer list
//! can report.

use thiserror::Error;
use uuid::Uuid;

/// The main error type for the deduction registry.
///
/// All fallible operations in the crate return this error type, making it
/// easy to handle errors consistently from the library up to the HTTP layer.
///
/// # Example
///
/// ```
/// use deduction_registry::error::RegistryError;
///
/// let error = RegistryError::ConfigNotFound {
///     path: "/missing/roster.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/roster.yaml");
/// ```
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but is internally inconsistent.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// A description of the inconsistency.
        message: String,
    },

    /// A category key did not match any known deduction category.
    #[error("Unknown deduction category: {key}")]
    UnknownCategory {
        /// The key that was supplied.
        key: String,
    },

    /// A subtype is not allowed for the chosen category.
    #[error("Subtype '{subtype}' is not allowed for category '{category}'")]
    InvalidSubtype {
        /// The category display name.
        category: String,
        /// The rejected subtype.
        subtype: String,
    },

    /// No deduction with the given id exists in the registry.
    #[error("Deduction not found: {id}")]
    DeductionNotFound {
        /// The deduction id that was not found.
        id: String,
    },

    /// No open wizard or transfer session with the given id.
    #[error("Session not found: {id}")]
    SessionNotFound {
        /// The session id that was not found.
        id: Uuid,
    },

    /// The wizard does not accept this action in its current step.
    #[error("Cannot {action} while at step '{step}'")]
    InvalidTransition {
        /// The step the wizard is in.
        step: String,
        /// The rejected action.
        action: String,
    },

    /// A field that is fixed in edit mode was modified.
    #[error("Field '{field}' cannot be changed when editing an existing deduction")]
    ImmutableField {
        /// The field that was modified.
        field: String,
    },

    /// The wizard cannot finish yet.
    #[error("Deduction cannot be finished: {reason}")]
    FinishBlocked {
        /// Why the finish action is disabled.
        reason: String,
    },

    /// An employee was highlighted in a pane it does not belong to.
    #[error("Employee '{employee_id}' is not in the {pane} pane")]
    NotInPane {
        /// The employee id.
        employee_id: String,
        /// The pane name.
        pane: String,
    },

    /// The payroll code generator returned an error.
    #[error("Payroll code generation failed: {message}")]
    CodeGenerationFailed {
        /// A description of the failure.
        message: String,
    },

    /// The payroll code generator did not answer in time.
    #[error("Payroll code generation timed out after {timeout_ms}ms")]
    CodeGenerationTimedOut {
        /// The timeout that elapsed.
        timeout_ms: u64,
    },
}

/// A type alias for Results that return RegistryError.
pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = RegistryError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
        );
    }

    #[test]
    fn test_invalid_subtype_displays_category_and_subtype() {
        let error = RegistryError::InvalidSubtype {
            category: "Vision".to_string(),
            subtype: "PPO Plan".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Subtype 'PPO Plan' is not allowed for category 'Vision'"
        );
    }

    #[test]
    fn test_invalid_transition_displays_step_and_action() {
        let error = RegistryError::InvalidTransition {
            step: "category_select".to_string(),
            action: "finish".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Cannot finish while at step 'category_select'"
        );
    }

    #[test]
    fn test_not_in_pane_displays_employee_and_pane() {
        let error = RegistryError::NotInPane {
            employee_id: "EMP001".to_string(),
            pane: "available".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Employee 'EMP001' is not in the available pane"
        );
    }

    #[test]
    fn test_generation_timeout_displays_duration() {
        let error = RegistryError::CodeGenerationTimedOut { timeout_ms: 250 };
        assert_eq!(
            error.to_string(),
            "Payroll code generation timed out after 250ms"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<RegistryError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> RegistryResult<()> {
            Err(RegistryError::DeductionNotFound {
                id: "missing".to_string(),
            })
        }

        fn propagates_error() -> RegistryResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
