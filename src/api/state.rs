//! Application state for the deduction registry API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::config::ConfigLoader;
use crate::registry::Workspace;
use crate::wizard::{CodeGenerator, LocalCodeGenerator};

/// Shared application state.
///
/// Contains the loaded configuration, the workspace behind a lock, and the
/// payroll code generator.
#[derive(Clone)]
pub struct AppState {
    /// The loaded configuration.
    config: Arc<ConfigLoader>,
    /// The mutable registry state.
    workspace: Arc<RwLock<Workspace>>,
    /// Suggests payroll codes for new deductions.
    generator: Arc<dyn CodeGenerator>,
}

impl AppState {
    /// Creates a new application state using the local code generator.
    pub fn new(config: ConfigLoader) -> Self {
        Self::with_generator(config, Arc::new(LocalCodeGenerator))
    }

    /// Creates a new application state with a specific code generator.
    pub fn with_generator(config: ConfigLoader, generator: Arc<dyn CodeGenerator>) -> Self {
        let workspace = Workspace::from_config(&config);
        Self {
            config: Arc::new(config),
            workspace: Arc::new(RwLock::new(workspace)),
            generator,
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the workspace lock.
    pub fn workspace(&self) -> &RwLock<Workspace> {
        &self.workspace
    }

    /// Returns the payroll code generator.
    pub fn generator(&self) -> &dyn CodeGenerator {
        self.generator.as_ref()
    }

    /// Returns how long to wait for a payroll code suggestion.
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_millis(self.config.settings().generation_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_app_state_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AppState>();
    }
}
