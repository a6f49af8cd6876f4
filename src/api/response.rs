//! Response types for the deduction registry API.
//!
//! This module defines the error response structures, the mapping from
//! [`RegistryError`] to HTTP statuses, and the JSON views returned by the
//! wizard and transfer list endpoints.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RegistryError;
use crate::models::{Category, Deduction, Employee};
use crate::selection::{Pane, TransferEntry, TransferList};
use crate::wizard::{DeductionDraft, DeductionWizard, WizardMode, WizardStep};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates a 400 response carrying `error`.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<RegistryError> for ApiErrorResponse {
    fn from(error: RegistryError) -> Self {
        let message = error.to_string();
        let (status, code) = match &error {
            RegistryError::ConfigNotFound { .. }
            | RegistryError::ConfigParseError { .. }
            | RegistryError::InvalidConfig { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
            }
            RegistryError::UnknownCategory { .. } => (StatusCode::BAD_REQUEST, "UNKNOWN_CATEGORY"),
            RegistryError::InvalidSubtype { .. } => (StatusCode::BAD_REQUEST, "INVALID_SUBTYPE"),
            RegistryError::NotInPane { .. } => (StatusCode::BAD_REQUEST, "NOT_IN_PANE"),
            RegistryError::DeductionNotFound { .. } => {
                (StatusCode::NOT_FOUND, "DEDUCTION_NOT_FOUND")
            }
            RegistryError::SessionNotFound { .. } => (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
            RegistryError::InvalidTransition { .. } => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
            RegistryError::ImmutableField { .. } => (StatusCode::CONFLICT, "IMMUTABLE_FIELD"),
            RegistryError::FinishBlocked { .. } => (StatusCode::CONFLICT, "FINISH_BLOCKED"),
            RegistryError::CodeGenerationFailed { .. } => {
                (StatusCode::BAD_GATEWAY, "CODE_GENERATION_FAILED")
            }
            RegistryError::CodeGenerationTimedOut { .. } => {
                (StatusCode::GATEWAY_TIMEOUT, "CODE_GENERATION_TIMEOUT")
            }
        };

        ApiErrorResponse {
            status,
            error: ApiError::new(code, message),
        }
    }
}

/// Placeholder text for the provider and plan name fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Placeholders {
    /// Placeholder for the provider name.
    pub provider_name: String,
    /// Placeholder for the plan name.
    pub plan_name: String,
}

/// JSON view of an open wizard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardView {
    /// The wizard session id.
    pub session_id: Uuid,
    /// Create or edit.
    pub mode: WizardMode,
    /// The current step.
    pub step: WizardStep,
    /// Completion percentage.
    pub progress: u8,
    /// The chosen category.
    pub category: Option<Category>,
    /// The chosen subtype.
    pub subtype: Option<String>,
    /// Subtypes offered for the chosen category.
    pub subtypes: Vec<String>,
    /// Field placeholders for the chosen category.
    pub placeholders: Placeholders,
    /// The detail fields.
    pub draft: DeductionDraft,
    /// Whether the payroll code may be typed or generated.
    pub code_editable: bool,
    /// Whether the payroll code still follows the names.
    pub code_derived: bool,
    /// Whether a code suggestion is outstanding.
    pub is_generating: bool,
    /// Whether the wizard can finish now.
    pub can_finish: bool,
    /// Why the wizard cannot finish, if it cannot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_blocker: Option<String>,
    /// Message from the last failed code suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl WizardView {
    /// Builds the view of `wizard`.
    pub fn new(session_id: Uuid, wizard: &DeductionWizard) -> Self {
        let profile = wizard.category().map(Category::profile);
        Self {
            session_id,
            mode: wizard.mode(),
            step: wizard.step(),
            progress: wizard.progress(),
            category: wizard.category(),
            subtype: wizard.subtype().map(str::to_string),
            subtypes: profile
                .map(|p| p.subtypes.iter().map(|s| s.to_string()).collect())
                .unwrap_or_default(),
            placeholders: Placeholders {
                provider_name: profile
                    .map(|p| p.example_provider)
                    .unwrap_or("e.g. Provider Name")
                    .to_string(),
                plan_name: profile
                    .map(|p| p.example_plan)
                    .unwrap_or("e.g. Standard Plan")
                    .to_string(),
            },
            draft: wizard.draft().clone(),
            code_editable: wizard.mode() == WizardMode::Create,
            code_derived: wizard.is_code_derived(),
            is_generating: wizard.is_generating(),
            can_finish: wizard.can_finish(),
            finish_blocker: wizard.finish_blocker().map(str::to_string),
            notice: wizard.notice().map(str::to_string),
        }
    }
}

/// Response body for a finished wizard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinishResponse {
    /// True for a new deduction, false for an edit.
    pub created: bool,
    /// The saved deduction.
    pub deduction: Deduction,
    /// Confirmation for the operator.
    pub message: String,
    /// Where to map a new deduction in the benefits system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigator_url: Option<String>,
}

/// An employee enrolled in a deduction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberView {
    /// Employee id.
    pub id: String,
    /// Employee name.
    pub name: String,
    /// Employee initials.
    pub initials: String,
}

impl From<&Employee> for MemberView {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id.clone(),
            name: employee.name.clone(),
            initials: employee.initials(),
        }
    }
}

/// Response body for `GET /deductions/:id/employees`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembersResponse {
    /// The deduction id.
    pub deduction_id: String,
    /// The deduction plan name.
    pub plan_name: String,
    /// Enrolled selected employees.
    pub employees: Vec<MemberView>,
}

/// JSON view of an open transfer list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferView {
    /// The transfer session id.
    pub session_id: Uuid,
    /// Available employees matching the search.
    pub available: Vec<TransferEntry>,
    /// Selected employees.
    pub selected: Vec<TransferEntry>,
    /// Highlighted ids in the available pane.
    pub highlighted_available: Vec<String>,
    /// Highlighted ids in the selected pane.
    pub highlighted_selected: Vec<String>,
    /// Number of available employees before searching.
    pub available_count: usize,
    /// Number of selected employees.
    pub selected_count: usize,
}

impl TransferView {
    /// Builds the view of `list`, filtering the available pane by `search`.
    pub fn new(session_id: Uuid, list: &TransferList, search: &str) -> Self {
        Self {
            session_id,
            available: list.available_matching(search).into_iter().cloned().collect(),
            selected: list.selected().cloned().collect(),
            highlighted_available: list.highlighted(Pane::Available).iter().cloned().collect(),
            highlighted_selected: list.highlighted(Pane::Selected).iter().cloned().collect(),
            available_count: list.available().count(),
            selected_count: list.selected_ids().len(),
        }
    }
}

/// Response body for a saved transfer list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionResponse {
    /// The committed selection.
    pub selected: Vec<String>,
    /// Number of selected employees.
    pub selected_count: usize,
}
