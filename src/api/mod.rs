//! HTTP API module for the deduction registry.
//!
//! This module provides the REST endpoints for browsing deductions, running
//! the deduction setup wizard, and managing the employee selection.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    ChooseCategoryRequest, ChooseSubtypeRequest, HighlightRequest, MoveRequest, SearchQuery,
    UpdateDetailsRequest,
};
pub use response::{
    ApiError, ApiErrorResponse, FinishResponse, MemberView, MembersResponse, Placeholders,
    SelectionResponse, TransferView, WizardView,
};
pub use state::AppState;
