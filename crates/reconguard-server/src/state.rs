//! Shared handler state.

use reconguard_tools::{ReconError, ReconResult, Toolbox};
use std::future::Future;
use std::time::Duration;

/// State handed to every recon handler
#[derive(Debug, Clone)]
pub struct AppState {
    toolbox: Toolbox,
    collaborator_timeout: Duration,
}

impl AppState {
    /// Create state over a toolbox, bounding each collaborator call
    #[must_use]
    pub const fn new(toolbox: Toolbox, collaborator_timeout: Duration) -> Self {
        Self {
            toolbox,
            collaborator_timeout,
        }
    }

    /// The collaborators
    #[must_use]
    pub const fn toolbox(&self) -> &Toolbox {
        &self.toolbox
    }

    /// Run one collaborator call under the configured timeout
    pub async fn bounded<T, F>(&self, call: F) -> ReconResult<T>
    where
        F: Future<Output = ReconResult<T>>,
    {
        tokio::time::timeout(self.collaborator_timeout, call)
            .await
            .unwrap_or(Err(ReconError::Timeout))
    }
}
