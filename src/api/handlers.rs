//! HTTP request handlers for the deduction registry API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::RegistryError;
use crate::models::{Category, catalog};

use super::request::{
    ChooseCategoryRequest, ChooseSubtypeRequest, HighlightRequest, MoveRequest, SearchQuery,
    UpdateDetailsRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, FinishResponse, MemberView, MembersResponse, SelectionResponse,
    TransferView, WizardView,
};
use super::state::AppState;

type HandlerResult = Result<Response, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/employees", get(list_employees))
        .route("/deductions", get(list_deductions))
        .route("/deductions/:id/toggle-status", post(toggle_status))
        .route("/deductions/:id/employees", get(deduction_members))
        .route("/deductions/:id/edit", post(open_edit_wizard))
        .route("/wizards", post(open_create_wizard))
        .route("/wizards/:id", get(get_wizard).delete(close_wizard))
        .route("/wizards/:id/category", post(choose_category))
        .route("/wizards/:id/subtype", post(choose_subtype))
        .route("/wizards/:id/back", post(wizard_back))
        .route("/wizards/:id/details", patch(update_details))
        .route("/wizards/:id/generate-code", post(generate_code))
        .route("/wizards/:id/finish", post(finish_wizard))
        .route("/transfers", post(open_transfer))
        .route("/transfers/:id", get(get_transfer).delete(cancel_transfer))
        .route("/transfers/:id/highlight", post(toggle_highlight))
        .route("/transfers/:id/move", post(move_employees))
        .route("/transfers/:id/save", post(save_transfer))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn ok<T: Serialize>(body: T) -> HandlerResult {
    Ok(json_response(StatusCode::OK, body))
}

/// Logs a failed operation and converts it for the response.
fn reject(correlation_id: Uuid, err: RegistryError) -> ApiErrorResponse {
    warn!(correlation_id = %correlation_id, error = %err, "Request failed");
    err.into()
}

/// Unwraps a JSON body, turning extractor rejections into API errors.
fn parse_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiErrorResponse> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") || body_text.contains("unknown variant") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::bad_request(error))
}

/// Handler for GET /categories.
async fn list_categories() -> HandlerResult {
    ok(catalog())
}

/// Handler for GET /employees.
///
/// Lists the selected employees whose names match the search.
async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> HandlerResult {
    let workspace = state.workspace().read().await;
    let employees = workspace.selected_employees(query.text());
    ok(employees)
}

/// Handler for GET /deductions.
///
/// Lists deductions matching the search, each with its live employee count.
async fn list_deductions(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> HandlerResult {
    let workspace = state.workspace().read().await;
    ok(workspace.deductions_with_counts(query.text()))
}

/// Handler for POST /deductions/:id/toggle-status.
async fn toggle_status(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let mut workspace = state.workspace().write().await;
    let status = workspace
        .toggle_status(&id)
        .map_err(|err| reject(correlation_id, err))?
        .status;
    debug!(correlation_id = %correlation_id, status = ?status, "Toggle applied");
    ok(workspace.deduction(&id)?)
}

/// Handler for GET /deductions/:id/employees.
async fn deduction_members(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult {
    let workspace = state.workspace().read().await;
    let deduction = workspace
        .registry()
        .get(&id)
        .map_err(ApiErrorResponse::from)?;
    let members = workspace
        .deduction_members(&id)
        .map_err(ApiErrorResponse::from)?;
    ok(MembersResponse {
        deduction_id: deduction.id.clone(),
        plan_name: deduction.plan_name.clone(),
        employees: members.into_iter().map(MemberView::from).collect(),
    })
}

/// Handler for POST /wizards.
async fn open_create_wizard(State(state): State<AppState>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let mut workspace = state.workspace().write().await;
    let session_id = workspace.open_create_wizard();
    info!(correlation_id = %correlation_id, session_id = %session_id, "Opened create wizard");

    let wizard = workspace.wizard(session_id)?;
    Ok(json_response(
        StatusCode::CREATED,
        WizardView::new(session_id, wizard),
    ))
}

/// Handler for POST /deductions/:id/edit.
async fn open_edit_wizard(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let mut workspace = state.workspace().write().await;
    let session_id = workspace
        .open_edit_wizard(&id)
        .map_err(|err| reject(correlation_id, err))?;
    info!(
        correlation_id = %correlation_id,
        session_id = %session_id,
        deduction_id = %id,
        "Opened edit wizard"
    );

    let wizard = workspace.wizard(session_id)?;
    Ok(json_response(
        StatusCode::CREATED,
        WizardView::new(session_id, wizard),
    ))
}

/// Handler for GET /wizards/:id.
async fn get_wizard(State(state): State<AppState>, Path(id): Path<Uuid>) -> HandlerResult {
    let workspace = state.workspace().read().await;
    let wizard = workspace.wizard(id)?;
    ok(WizardView::new(id, wizard))
}

/// Handler for DELETE /wizards/:id.
async fn close_wizard(State(state): State<AppState>, Path(id): Path<Uuid>) -> HandlerResult {
    let mut workspace = state.workspace().write().await;
    workspace.close_wizard(id)?;
    debug!(session_id = %id, "Closed wizard");
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Handler for POST /wizards/:id/category.
async fn choose_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<ChooseCategoryRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(correlation_id, payload)?;
    let category =
        Category::from_key(&request.category).map_err(|err| reject(correlation_id, err))?;

    let mut workspace = state.workspace().write().await;
    let wizard = workspace.wizard_mut(id)?;
    wizard
        .choose_category(category)
        .map_err(|err| reject(correlation_id, err))?;
    ok(WizardView::new(id, wizard))
}

/// Handler for POST /wizards/:id/subtype.
async fn choose_subtype(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<ChooseSubtypeRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(correlation_id, payload)?;

    let mut workspace = state.workspace().write().await;
    let wizard = workspace.wizard_mut(id)?;
    wizard
        .choose_subtype(&request.subtype)
        .map_err(|err| reject(correlation_id, err))?;
    ok(WizardView::new(id, wizard))
}

/// Handler for POST /wizards/:id/back.
async fn wizard_back(State(state): State<AppState>, Path(id): Path<Uuid>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let mut workspace = state.workspace().write().await;
    let wizard = workspace.wizard_mut(id)?;
    wizard.back().map_err(|err| reject(correlation_id, err))?;
    ok(WizardView::new(id, wizard))
}

/// Handler for PATCH /wizards/:id/details.
async fn update_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateDetailsRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(correlation_id, payload)?;

    let mut workspace = state.workspace().write().await;
    let wizard = workspace.wizard_mut(id)?;
    wizard
        .update_details(request.into())
        .map_err(|err| reject(correlation_id, err))?;
    ok(WizardView::new(id, wizard))
}

/// Handler for POST /wizards/:id/generate-code.
///
/// The workspace lock is released while the generator runs, so the wizard
/// can be read, edited or closed in the meantime. A result that arrives for
/// a closed wizard or a superseded request is discarded.
async fn generate_code(State(state): State<AppState>, Path(id): Path<Uuid>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let request = {
        let mut workspace = state.workspace().write().await;
        workspace
            .begin_generation(id)
            .map_err(|err| reject(correlation_id, err))?
    };
    info!(
        correlation_id = %correlation_id,
        session_id = %id,
        ticket = request.ticket,
        plan_name = %request.plan_name,
        "Requesting payroll code suggestion"
    );

    let timeout = state.generation_timeout();
    let outcome = match tokio::time::timeout(timeout, request.run(state.generator())).await {
        Ok(outcome) => outcome,
        Err(_) => Err(RegistryError::CodeGenerationTimedOut {
            timeout_ms: timeout.as_millis() as u64,
        }),
    };

    let mut workspace = state.workspace().write().await;
    let applied = match workspace.complete_generation(id, request.ticket, outcome.as_deref()) {
        Ok(applied) => applied,
        Err(err) => {
            debug!(
                correlation_id = %correlation_id,
                session_id = %id,
                "Wizard closed before the suggestion arrived, discarded"
            );
            return Err(err.into());
        }
    };
    if !applied {
        debug!(
            correlation_id = %correlation_id,
            ticket = request.ticket,
            "Superseded suggestion discarded"
        );
    }

    if let Err(err) = outcome {
        return Err(reject(correlation_id, err));
    }
    let wizard = workspace.wizard(id)?;
    info!(
        correlation_id = %correlation_id,
        session_id = %id,
        payroll_code = %wizard.draft().payroll_code,
        "Payroll code suggestion received"
    );
    ok(WizardView::new(id, wizard))
}

/// Handler for POST /wizards/:id/finish.
async fn finish_wizard(State(state): State<AppState>, Path(id): Path<Uuid>) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let mut workspace = state.workspace().write().await;
    let (created, saved) = workspace
        .finish_wizard(id)
        .map_err(|err| reject(correlation_id, err))?;
    let deduction = workspace.deduction(&saved.id)?;
    info!(
        correlation_id = %correlation_id,
        deduction_id = %deduction.id,
        created,
        "Wizard finished"
    );

    let response = if created {
        FinishResponse {
            created,
            message: format!(
                "Deduction '{}' created. Map it in the benefits portal to start syncing.",
                deduction.plan_name
            ),
            navigator_url: Some(state.config().settings().navigator_url.clone()),
            deduction,
        }
    } else {
        FinishResponse {
            created,
            message: format!("Deduction '{}' updated.", deduction.plan_name),
            navigator_url: None,
            deduction,
        }
    };
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok(json_response(status, response))
}

/// Handler for POST /transfers.
async fn open_transfer(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> HandlerResult {
    let mut workspace = state.workspace().write().await;
    let session_id = workspace.open_transfer();
    let list = workspace.transfer(session_id)?;
    Ok(json_response(
        StatusCode::CREATED,
        TransferView::new(session_id, list, query.text()),
    ))
}

/// Handler for GET /transfers/:id.
async fn get_transfer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<SearchQuery>,
) -> HandlerResult {
    let workspace = state.workspace().read().await;
    let list = workspace.transfer(id)?;
    ok(TransferView::new(id, list, query.text()))
}

/// Handler for POST /transfers/:id/highlight.
async fn toggle_highlight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<HighlightRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(correlation_id, payload)?;

    let mut workspace = state.workspace().write().await;
    let list = workspace.transfer_mut(id)?;
    list.toggle_highlight(request.pane, &request.employee_id)
        .map_err(|err| reject(correlation_id, err))?;
    ok(TransferView::new(id, list, ""))
}

/// Handler for POST /transfers/:id/move.
async fn move_employees(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<MoveRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(correlation_id, payload)?;

    let mut workspace = state.workspace().write().await;
    let list = workspace.transfer_mut(id)?;
    let moved = list.apply(request.direction);
    debug!(
        correlation_id = %correlation_id,
        session_id = %id,
        direction = ?request.direction,
        moved,
        "Moved employees"
    );
    ok(TransferView::new(id, list, ""))
}

/// Handler for POST /transfers/:id/save.
async fn save_transfer(State(state): State<AppState>, Path(id): Path<Uuid>) -> HandlerResult {
    let mut workspace = state.workspace().write().await;
    let selected = workspace.save_transfer(id)?;
    ok(SelectionResponse {
        selected: selected.iter().cloned().collect(),
        selected_count: selected.len(),
    })
}

/// Handler for DELETE /transfers/:id.
async fn cancel_transfer(State(state): State<AppState>, Path(id): Path<Uuid>) -> HandlerResult {
    let mut workspace = state.workspace().write().await;
    workspace.cancel_transfer(id)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
