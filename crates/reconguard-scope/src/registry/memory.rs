use async_trait::async_trait;
use reconguard_core::{normalize_target, AuthorizedTarget, GuardError, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::TargetRegistry;

/// In-memory registry.
///
/// Reads share the lock; `add` checks and inserts under one write guard.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    targets: RwLock<HashMap<String, AuthorizedTarget>>,
}

impl MemoryRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the given targets.
    ///
    /// Blank entries are skipped; repeats collapse to one entry.
    #[must_use]
    pub fn from_targets<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let targets = targets
            .into_iter()
            .filter_map(|t| AuthorizedTarget::new(t.as_ref()))
            .map(|t| (t.identifier.clone(), t))
            .collect();
        Self {
            targets: RwLock::new(targets),
        }
    }
}

#[async_trait]
impl TargetRegistry for MemoryRegistry {
    async fn contains(&self, identifier: &str) -> Result<bool> {
        let Some(key) = normalize_target(identifier) else {
            return Ok(false);
        };
        Ok(self.targets.read().await.contains_key(&key))
    }

    async fn add(&self, identifier: &str) -> Result<AuthorizedTarget> {
        let target = AuthorizedTarget::new(identifier).ok_or(GuardError::MissingTarget)?;

        let mut targets = self.targets.write().await;
        if targets.contains_key(&target.identifier) {
            return Err(GuardError::DuplicateTarget(target.identifier));
        }
        targets.insert(target.identifier.clone(), target.clone());
        Ok(target)
    }

    async fn remove(&self, identifier: &str) -> Result<bool> {
        let Some(key) = normalize_target(identifier) else {
            return Ok(false);
        };
        Ok(self.targets.write().await.remove(&key).is_some())
    }

    async fn list(&self) -> Result<Vec<AuthorizedTarget>> {
        let mut targets: Vec<_> = self.targets.read().await.values().cloned().collect();
        targets.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        Ok(targets)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.targets.read().await.len())
    }
}
