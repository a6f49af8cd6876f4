//! Request types for the deduction registry API.

use serde::{Deserialize, Serialize};

use crate::selection::{MoveDirection, Pane};
use crate::wizard::DetailsUpdate;

/// Query string accepted by the list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    /// Case-insensitive substring filter.
    #[serde(default)]
    pub search: Option<String>,
}

impl SearchQuery {
    /// Returns the filter, empty when absent.
    pub fn text(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }
}

/// Request body for `POST /wizards/:id/category`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChooseCategoryRequest {
    /// Category key (e.g., "MEDICAL") or display name.
    pub category: String,
}

/// Request body for `POST /wizards/:id/subtype`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChooseSubtypeRequest {
    /// One of the chosen category's subtypes.
    pub subtype: String,
}

/// Request body for `PATCH /wizards/:id/details`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDetailsRequest {
    /// New plan name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
    /// New provider name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    /// Payroll code typed by the operator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payroll_code: Option<String>,
    /// New tax treatment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_pre_tax: Option<bool>,
}

impl From<UpdateDetailsRequest> for DetailsUpdate {
    fn from(req: UpdateDetailsRequest) -> Self {
        DetailsUpdate {
            plan_name: req.plan_name,
            provider_name: req.provider_name,
            payroll_code: req.payroll_code,
            is_pre_tax: req.is_pre_tax,
        }
    }
}

/// Request body for `POST /transfers/:id/highlight`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightRequest {
    /// The pane the employee is in.
    pub pane: Pane,
    /// The employee to highlight or unhighlight.
    pub employee_id: String,
}

/// Request body for `POST /transfers/:id/move`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Which move to perform.
    pub direction: MoveDirection,
}
