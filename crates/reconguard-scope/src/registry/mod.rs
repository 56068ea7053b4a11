//! Storage of authorized targets.
//!
//! All identifiers are normalized with [`reconguard_core::normalize_target`]
//! before they are compared or stored, so membership is case-insensitive and
//! whitespace-insensitive. Uniqueness holds under concurrent writers: the
//! in-memory store inserts under a write lock, the SQL store relies on a
//! unique constraint.

mod memory;
mod sql;

pub use memory::MemoryRegistry;
pub use sql::SqlRegistry;

use async_trait::async_trait;
use reconguard_core::{AuthorizedTarget, GuardError, Result};
use tracing::debug;

/// Durable set of allow-listed targets
#[async_trait]
pub trait TargetRegistry: Send + Sync {
    /// Returns true iff a case-insensitively equal identifier is registered.
    ///
    /// Blank input is never a member. Errors only when the store fails.
    async fn contains(&self, identifier: &str) -> Result<bool>;

    /// Register a new target.
    ///
    /// Fails with [`GuardError::DuplicateTarget`] if the normalized
    /// identifier is already present, and [`GuardError::MissingTarget`] for
    /// blank input.
    async fn add(&self, identifier: &str) -> Result<AuthorizedTarget>;

    /// Remove a target. Returns whether anything was removed.
    async fn remove(&self, identifier: &str) -> Result<bool>;

    /// All registered targets, ordered by identifier
    async fn list(&self) -> Result<Vec<AuthorizedTarget>>;

    /// Number of registered targets
    async fn len(&self) -> Result<usize> {
        Ok(self.list().await?.len())
    }

    /// Returns true if nothing is registered
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}

/// Insert every seed target, skipping those already registered.
///
/// Returns how many were newly added.
pub async fn seed<I, S>(registry: &dyn TargetRegistry, targets: I) -> Result<usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut added = 0;
    for target in targets {
        match registry.add(target.as_ref()).await {
            Ok(_) => added += 1,
            Err(GuardError::DuplicateTarget(existing)) => {
                debug!(target = %existing, "seed target already registered");
            }
            Err(GuardError::MissingTarget) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(added)
}
