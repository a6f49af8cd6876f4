//! Payroll code suggestions.
//!
//! The wizard can ask an external collaborator to suggest a payroll code.
//! The call is asynchronous; the wizard hands out a [`GenerationRequest`]
//! carrying a ticket and later accepts the outcome only for the ticket that
//! is still current.

use async_trait::async_trait;
use tracing::debug;

use crate::error::RegistryResult;
use crate::models::Category;

use super::code::{MAX_CODE_LENGTH, code_token};

/// Suggests payroll codes for new deductions.
#[async_trait]
pub trait CodeGenerator: Send + Sync {
    /// Returns a suggested payroll code for the given plan.
    async fn generate(
        &self,
        plan_name: &str,
        provider_name: &str,
        category: Category,
    ) -> RegistryResult<String>;
}

/// A pending request for a payroll code suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Identifies this request to the wizard that issued it.
    pub ticket: u64,
    /// The plan name at the time of the request.
    pub plan_name: String,
    /// The provider name at the time of the request.
    pub provider_name: String,
    /// The chosen category.
    pub category: Category,
}

impl GenerationRequest {
    /// Runs this request against `generator`.
    pub async fn run(&self, generator: &dyn CodeGenerator) -> RegistryResult<String> {
        generator
            .generate(&self.plan_name, &self.provider_name, self.category)
            .await
    }
}

/// Generator that builds suggestions locally, in the house style of the
/// seed codes: `<category>-<provider>-01` (e.g. `MED-BLUE-01`).
///
/// Falls back to the plan name when the provider name yields no token.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalCodeGenerator;

#[async_trait]
impl CodeGenerator for LocalCodeGenerator {
    async fn generate(
        &self,
        plan_name: &str,
        provider_name: &str,
        category: Category,
    ) -> RegistryResult<String> {
        let mut name = code_token(provider_name);
        if name.is_empty() {
            name = code_token(plan_name);
        }

        let prefix: String = category.key().chars().take(3).collect();
        let mut code = [prefix, name, "01".to_string()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        code.truncate(MAX_CODE_LENGTH);

        debug!(category = category.key(), code = %code, "Generated payroll code");
        Ok(code)
    }
}
