//! The add/edit deduction wizard.
//!
//! Creating a deduction walks through three steps: choose a category, choose
//! a subtype, then enter the details. Editing an existing deduction starts
//! and stays on the details step, with category, subtype and payroll code
//! fixed.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{RegistryError, RegistryResult};
use crate::models::{Category, Deduction, DeductionStatus};

use super::code::{derive_code, normalize_code};
use super::generation::GenerationRequest;

/// A step of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// Choosing the deduction category.
    CategorySelect,
    /// Choosing the subtype within the category.
    SubtypeSelect,
    /// Entering plan, provider, payroll code and tax treatment.
    DetailEntry,
    /// The deduction has been handed to the caller.
    Finished,
}

impl WizardStep {
    /// Returns the snake_case name of the step.
    pub fn as_str(self) -> &'static str {
        match self {
            WizardStep::CategorySelect => "category_select",
            WizardStep::SubtypeSelect => "subtype_select",
            WizardStep::DetailEntry => "detail_entry",
            WizardStep::Finished => "finished",
        }
    }
}

/// Whether the wizard creates a new deduction or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardMode {
    /// Creating a new deduction.
    Create,
    /// Editing an existing deduction.
    Edit,
}

/// The editable detail fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionDraft {
    /// Plan name.
    pub plan_name: String,
    /// Provider name.
    pub provider_name: String,
    /// Payroll code.
    pub payroll_code: String,
    /// Whether the deduction is pre-tax.
    pub is_pre_tax: bool,
}

impl Default for DeductionDraft {
    fn default() -> Self {
        Self {
            plan_name: String::new(),
            provider_name: String::new(),
            payroll_code: String::new(),
            is_pre_tax: true,
        }
    }
}

/// A partial update of the detail fields; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailsUpdate {
    /// New plan name.
    pub plan_name: Option<String>,
    /// New provider name.
    pub provider_name: Option<String>,
    /// Payroll code typed by the operator.
    pub payroll_code: Option<String>,
    /// New tax treatment.
    pub is_pre_tax: Option<bool>,
}

/// Detail changes to an existing deduction.
///
/// Only these fields are editable; everything else on the stored record is
/// left as it is when the edit is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeductionEdit {
    /// Id of the deduction being edited.
    pub id: String,
    /// New plan name.
    pub plan_name: String,
    /// New provider name.
    pub provider_name: String,
    /// New tax treatment.
    pub is_pre_tax: bool,
}

impl DeductionEdit {
    /// Writes the edited fields onto `deduction`.
    pub fn apply_to(&self, deduction: &mut Deduction) {
        deduction.plan_name = self.plan_name.clone();
        deduction.provider_name = self.provider_name.clone();
        deduction.is_pre_tax = self.is_pre_tax;
    }
}

/// What a finished wizard hands back to its caller.
#[derive(Debug, Clone, PartialEq)]
pub enum FinishedDeduction {
    /// A new deduction to add to the registry.
    Created(Deduction),
    /// Detail changes to an existing deduction.
    Updated(DeductionEdit),
}

impl FinishedDeduction {
    /// Returns the id of the deduction this result applies to.
    pub fn id(&self) -> &str {
        match self {
            FinishedDeduction::Created(d) => &d.id,
            FinishedDeduction::Updated(edit) => &edit.id,
        }
    }
}

/// State of one add or edit session.
///
/// # Example
///
/// ```
/// use deduction_registry::models::Category;
/// use deduction_registry::wizard::{DeductionWizard, DetailsUpdate, FinishedDeduction};
///
/// let mut wizard = DeductionWizard::new();
/// wizard.choose_category(Category::Vision).unwrap();
/// wizard.choose_subtype("Vision PPO").unwrap();
/// wizard
///     .update_details(DetailsUpdate {
///         plan_name: Some("Vision Gold".to_string()),
///         provider_name: Some("VSP".to_string()),
///         ..Default::default()
///     })
///     .unwrap();
/// assert_eq!(wizard.draft().payroll_code, "VSP-VISI");
///
/// let FinishedDeduction::Created(deduction) = wizard.finish().unwrap() else {
///     panic!("expected a new deduction");
/// };
/// assert_eq!(deduction.subtype, "Vision PPO");
/// ```
#[derive(Debug, Clone)]
pub struct DeductionWizard {
    mode: WizardMode,
    step: WizardStep,
    category: Option<Category>,
    subtype: Option<String>,
    draft: DeductionDraft,
    original: Option<Deduction>,
    code_overridden: bool,
    pending_ticket: Option<u64>,
    last_ticket: u64,
    notice: Option<String>,
}

impl Default for DeductionWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl DeductionWizard {
    /// Starts a wizard for a new deduction.
    pub fn new() -> Self {
        Self {
            mode: WizardMode::Create,
            step: WizardStep::CategorySelect,
            category: None,
            subtype: None,
            draft: DeductionDraft::default(),
            original: None,
            code_overridden: false,
            pending_ticket: None,
            last_ticket: 0,
            notice: None,
        }
    }

    /// Starts a wizard editing `existing`, directly on the details step.
    pub fn edit(existing: Deduction) -> Self {
        Self {
            mode: WizardMode::Edit,
            step: WizardStep::DetailEntry,
            category: Some(existing.category),
            subtype: Some(existing.subtype.clone()),
            draft: DeductionDraft {
                plan_name: existing.plan_name.clone(),
                provider_name: existing.provider_name.clone(),
                payroll_code: existing.payroll_code.clone(),
                is_pre_tax: existing.is_pre_tax,
            },
            original: Some(existing),
            code_overridden: true,
            pending_ticket: None,
            last_ticket: 0,
            notice: None,
        }
    }

    /// Returns the wizard mode.
    pub fn mode(&self) -> WizardMode {
        self.mode
    }

    /// Returns the current step.
    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Returns the chosen category, if any.
    pub fn category(&self) -> Option<Category> {
        self.category
    }

    /// Returns the chosen subtype, if any.
    pub fn subtype(&self) -> Option<&str> {
        self.subtype.as_deref()
    }

    /// Returns the detail fields.
    pub fn draft(&self) -> &DeductionDraft {
        &self.draft
    }

    /// Returns the id of the deduction being edited.
    pub fn editing_id(&self) -> Option<&str> {
        self.original.as_ref().map(|d| d.id.as_str())
    }

    /// Returns the message left by the last failed code generation.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Returns true while a payroll code suggestion is outstanding.
    pub fn is_generating(&self) -> bool {
        self.pending_ticket.is_some()
    }

    /// Returns true if the payroll code is still derived from the names.
    pub fn is_code_derived(&self) -> bool {
        self.mode == WizardMode::Create && !self.code_overridden
    }

    /// Returns completion as a percentage of the three steps.
    pub fn progress(&self) -> u8 {
        match (self.mode, self.step) {
            (WizardMode::Edit, _) | (_, WizardStep::Finished) => 100,
            (_, WizardStep::CategorySelect) => 33,
            (_, WizardStep::SubtypeSelect) => 67,
            (_, WizardStep::DetailEntry) => 100,
        }
    }

    /// Returns why the wizard cannot finish, or `None` if it can.
    pub fn finish_blocker(&self) -> Option<&'static str> {
        if self.step != WizardStep::DetailEntry {
            Some("details have not been reached")
        } else if self.draft.plan_name.is_empty() {
            Some("plan name is required")
        } else if self.draft.payroll_code.is_empty() {
            Some("payroll code is required")
        } else if self.is_generating() {
            Some("payroll code generation is in progress")
        } else {
            None
        }
    }

    /// Returns true if [`finish`](Self::finish) would succeed.
    pub fn can_finish(&self) -> bool {
        self.finish_blocker().is_none()
    }

    fn invalid(&self, action: &str) -> RegistryError {
        RegistryError::InvalidTransition {
            step: self.step.as_str().to_string(),
            action: action.to_string(),
        }
    }

    fn require_step(&self, step: WizardStep, action: &str) -> RegistryResult<()> {
        if self.step == step {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn rederive_code(&mut self) {
        if self.is_code_derived() {
            self.draft.payroll_code = derive_code(&self.draft.provider_name, &self.draft.plan_name);
        }
    }

    /// Records the category and moves to subtype selection.
    ///
    /// Any previously chosen subtype is cleared.
    pub fn choose_category(&mut self, category: Category) -> RegistryResult<()> {
        self.require_step(WizardStep::CategorySelect, "choose a category")?;
        self.category = Some(category);
        self.subtype = None;
        self.step = WizardStep::SubtypeSelect;
        Ok(())
    }

    /// Records the subtype and moves to detail entry.
    pub fn choose_subtype(&mut self, subtype: &str) -> RegistryResult<()> {
        self.require_step(WizardStep::SubtypeSelect, "choose a subtype")?;
        let category = self.category.ok_or_else(|| self.invalid("choose a subtype"))?;
        category.validate_subtype(subtype)?;

        self.subtype = Some(subtype.to_string());
        self.step = WizardStep::DetailEntry;
        self.rederive_code();
        Ok(())
    }

    /// Returns to the previous step. Not available when editing.
    pub fn back(&mut self) -> RegistryResult<WizardStep> {
        self.step = match (self.mode, self.step) {
            (WizardMode::Create, WizardStep::SubtypeSelect) => WizardStep::CategorySelect,
            (WizardMode::Create, WizardStep::DetailEntry) => WizardStep::SubtypeSelect,
            _ => return Err(self.invalid("go back")),
        };
        Ok(self.step)
    }

    /// Applies edits to the detail fields.
    ///
    /// Typing a payroll code stops it being derived from the names for the
    /// rest of the session. The payroll code cannot change in edit mode.
    pub fn update_details(&mut self, update: DetailsUpdate) -> RegistryResult<()> {
        self.require_step(WizardStep::DetailEntry, "edit details")?;

        if let Some(code) = &update.payroll_code {
            let stored = self.draft.payroll_code.as_str();
            let unchanged = code.trim() == stored || normalize_code(code) == stored;
            if self.mode == WizardMode::Edit && !unchanged {
                return Err(RegistryError::ImmutableField {
                    field: "payroll_code".to_string(),
                });
            }
        }

        let names_changed = update.plan_name.is_some() || update.provider_name.is_some();

        if let Some(plan_name) = update.plan_name {
            self.draft.plan_name = plan_name;
        }
        if let Some(provider_name) = update.provider_name {
            self.draft.provider_name = provider_name;
        }
        if let Some(is_pre_tax) = update.is_pre_tax {
            self.draft.is_pre_tax = is_pre_tax;
        }
        if let Some(code) = update.payroll_code {
            if self.mode == WizardMode::Create {
                self.draft.payroll_code = normalize_code(&code);
                self.code_overridden = true;
            }
        }

        if names_changed {
            self.rederive_code();
        }
        self.notice = None;
        Ok(())
    }

    /// Starts a payroll code suggestion.
    ///
    /// A new request supersedes any outstanding one; the superseded outcome
    /// is ignored when it arrives.
    pub fn begin_generation(&mut self) -> RegistryResult<GenerationRequest> {
        if self.mode == WizardMode::Edit {
            return Err(RegistryError::ImmutableField {
                field: "payroll_code".to_string(),
            });
        }
        self.require_step(WizardStep::DetailEntry, "generate a payroll code")?;
        let category = self
            .category
            .ok_or_else(|| self.invalid("generate a payroll code"))?;

        self.last_ticket += 1;
        self.pending_ticket = Some(self.last_ticket);

        Ok(GenerationRequest {
            ticket: self.last_ticket,
            plan_name: self.draft.plan_name.clone(),
            provider_name: self.draft.provider_name.clone(),
            category,
        })
    }

    /// Applies the outcome of the request identified by `ticket`.
    ///
    /// Returns false, changing nothing, if that request is no longer the
    /// outstanding one. A suggested code replaces the current code and stops
    /// derivation; a failure keeps the current code and leaves a notice.
    pub fn complete_generation(
        &mut self,
        ticket: u64,
        outcome: Result<&str, &RegistryError>,
    ) -> bool {
        if self.pending_ticket != Some(ticket) {
            return false;
        }
        self.pending_ticket = None;

        match outcome {
            Ok(code) => {
                self.draft.payroll_code = normalize_code(code);
                self.code_overridden = true;
                self.notice = None;
            }
            Err(err) => {
                self.notice = Some(format!("Could not generate a payroll code: {}", err));
            }
        }
        true
    }

    /// Builds the finished deduction.
    ///
    /// A new deduction gets a fresh id, active status and the current time.
    /// An edited deduction keeps everything but plan name, provider name and
    /// tax treatment.
    pub fn finish(&mut self) -> RegistryResult<FinishedDeduction> {
        if let Some(reason) = self.finish_blocker() {
            return Err(match self.step {
                WizardStep::DetailEntry => RegistryError::FinishBlocked {
                    reason: reason.to_string(),
                },
                _ => self.invalid("finish"),
            });
        }

        let draft = self.draft.clone();
        let finished = match &self.original {
            Some(original) => FinishedDeduction::Updated(DeductionEdit {
                id: original.id.clone(),
                plan_name: draft.plan_name,
                provider_name: draft.provider_name,
                is_pre_tax: draft.is_pre_tax,
            }),
            None => {
                let (Some(category), Some(subtype)) = (self.category, self.subtype.clone()) else {
                    return Err(self.invalid("finish"));
                };
                FinishedDeduction::Created(Deduction {
                    id: Uuid::new_v4().to_string(),
                    plan_name: draft.plan_name,
                    provider_name: draft.provider_name,
                    category,
                    subtype,
                    payroll_code: draft.payroll_code,
                    status: DeductionStatus::Active,
                    is_pre_tax: draft.is_pre_tax,
                    created_at: Utc::now(),
                    employee_count: 0,
                })
            }
        };

        self.step = WizardStep::Finished;
        Ok(finished)
    }
}
