//! The scope decision point.

use reconguard_core::{normalize_target, ScopeDecision};
use std::sync::Arc;
use tracing::error;

use crate::registry::TargetRegistry;

/// Answers "may target T be probed?" against one registry.
///
/// Holds nothing but a shared handle to its registry, so clones are cheap
/// and safe to use from concurrent requests. The registry check is awaited,
/// never run on a blocking thread of the scheduler.
#[derive(Clone)]
pub struct ScopeEngine {
    registry: Arc<dyn TargetRegistry>,
}

impl std::fmt::Debug for ScopeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeEngine").finish_non_exhaustive()
    }
}

impl ScopeEngine {
    /// Create an engine over the given registry
    #[must_use]
    pub fn new(registry: Arc<dyn TargetRegistry>) -> Self {
        Self { registry }
    }

    /// Returns true iff the target is allow-listed.
    ///
    /// A failing store denies.
    pub async fn is_authorized(&self, target: &str) -> bool {
        self.decide(target).await.allowed
    }

    /// Check a target and report the normalized identifier with the outcome
    pub async fn decide(&self, target: &str) -> ScopeDecision {
        let Some(normalized) = normalize_target(target) else {
            return ScopeDecision::deny(String::new());
        };

        match self.registry.contains(&normalized).await {
            Ok(true) => ScopeDecision::allow(normalized),
            Ok(false) => ScopeDecision::deny(normalized),
            Err(e) => {
                error!(target = %normalized, error = %e, "scope registry lookup failed, denying");
                ScopeDecision::deny(normalized)
            }
        }
    }

    /// The registry this engine consults
    #[must_use]
    pub const fn registry(&self) -> &Arc<dyn TargetRegistry> {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MemoryRegistry;
    use async_trait::async_trait;
    use reconguard_core::{AuthorizedTarget, GuardError, Result};

    struct BrokenRegistry;

    #[async_trait]
    impl TargetRegistry for BrokenRegistry {
        async fn contains(&self, _identifier: &str) -> Result<bool> {
            Err(GuardError::Registry("database is locked".into()))
        }

        async fn add(&self, _identifier: &str) -> Result<AuthorizedTarget> {
            Err(GuardError::Registry("database is locked".into()))
        }

        async fn remove(&self, _identifier: &str) -> Result<bool> {
            Err(GuardError::Registry("database is locked".into()))
        }

        async fn list(&self) -> Result<Vec<AuthorizedTarget>> {
            Err(GuardError::Registry("database is locked".into()))
        }
    }

    #[tokio::test]
    async fn test_decide_normalizes() {
        let engine = ScopeEngine::new(Arc::new(MemoryRegistry::from_targets(["example.com"])));

        let decision = engine.decide(" Example.COM ").await;
        assert!(decision.allowed);
        assert_eq!(decision.target, "example.com");

        let decision = engine.decide("evil.example").await;
        assert!(!decision.allowed);
        assert_eq!(decision.target, "evil.example");
    }

    #[tokio::test]
    async fn test_blank_target_is_denied() {
        let engine = ScopeEngine::new(Arc::new(MemoryRegistry::from_targets(["example.com"])));
        assert!(!engine.is_authorized("").await);
        assert!(!engine.is_authorized("   ").await);
    }

    #[tokio::test]
    async fn test_store_failure_denies() {
        let engine = ScopeEngine::new(Arc::new(BrokenRegistry));
        assert!(!engine.is_authorized("example.com").await);
    }

    #[tokio::test]
    async fn test_sees_registry_updates() {
        let registry = Arc::new(MemoryRegistry::new());
        let engine = ScopeEngine::new(registry.clone());
        assert!(!engine.is_authorized("10.1.1.1").await);

        registry.add("10.1.1.1").await.unwrap();
        assert!(engine.is_authorized("10.1.1.1").await);
    }
}
