//! The authorization gate.
//!
//! Every recon route is registered through [`ReconRoutes`], which wraps the
//! route in the gate middleware exactly once. The middleware reads `target`
//! from the query string, asks the [`ScopeGate`] for a verdict and only then
//! lets the request reach its handler, carrying a [`ClearedTarget`].
//!
//! Handlers take the target through the [`ClearedTarget`] extractor rather
//! than the query string. A cleared target can only be minted by the gate, so
//! a handler mounted without it answers 500 instead of probing anything.

use axum::extract::{FromRequestParts, Query, Request, State};
use axum::http::request::Parts;
use axum::http::Uri;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::MethodRouter;
use axum::Router;
use reconguard_core::{GuardError, ScopeTier};
use reconguard_scope::ScopeEngine;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ApiError;

/// A target that passed the gate for a given tier.
///
/// Holds the target as the caller supplied it, minus surrounding
/// whitespace; case is preserved for the downstream lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearedTarget {
    target: String,
    tier: ScopeTier,
}

impl ClearedTarget {
    /// The target to hand to the collaborator
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.target
    }

    /// The tier this target was cleared for
    #[must_use]
    pub const fn tier(&self) -> ScopeTier {
        self.tier
    }

    /// Take the target string
    #[must_use]
    pub fn into_inner(self) -> String {
        self.target
    }
}

impl<S> FromRequestParts<S> for ClearedTarget
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or(ApiError::Ungated)
    }
}

/// Two-tier scope check.
///
/// Passive routes consult the general registry. Active routes must pass the
/// general registry and then the lab-only list.
#[derive(Debug, Clone)]
pub struct ScopeGate {
    general: ScopeEngine,
    lab: ScopeEngine,
}

impl ScopeGate {
    /// Create a gate over the general registry and the lab list
    #[must_use]
    pub const fn new(general: ScopeEngine, lab: ScopeEngine) -> Self {
        Self { general, lab }
    }

    /// Engine over the general registry
    #[must_use]
    pub const fn general(&self) -> &ScopeEngine {
        &self.general
    }

    /// Engine over the lab list
    #[must_use]
    pub const fn lab(&self) -> &ScopeEngine {
        &self.lab
    }

    /// Decide whether `raw` may be probed at `tier`.
    ///
    /// Blank or absent targets fail with [`GuardError::MissingTarget`]. A
    /// rejection names the allow-list that refused the target.
    pub async fn check(&self, raw: Option<&str>, tier: ScopeTier) -> Result<ClearedTarget, GuardError> {
        let target = raw
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(GuardError::MissingTarget)?;

        if !self.general.is_authorized(target).await {
            return Err(reject(target, tier, ScopeTier::Passive));
        }

        if tier == ScopeTier::Active && !self.lab.is_authorized(target).await {
            return Err(reject(target, tier, ScopeTier::Active));
        }

        debug!(target, %tier, "target authorized");
        Ok(ClearedTarget {
            target: target.to_string(),
            tier,
        })
    }
}

fn reject(target: &str, tier: ScopeTier, rejected_by: ScopeTier) -> GuardError {
    warn!(target, %tier, list = %rejected_by, "scope violation, request blocked");
    GuardError::ScopeViolation {
        target: target.to_string(),
        tier: rejected_by,
    }
}

#[derive(Deserialize)]
struct TargetQuery {
    target: Option<String>,
}

/// Extract the `target` query parameter. Unparseable queries count as absent.
fn target_param(uri: &Uri) -> Option<String> {
    Query::<TargetQuery>::try_from_uri(uri)
        .ok()
        .and_then(|Query(q)| q.target)
}

#[derive(Clone)]
struct TierGate {
    gate: ScopeGate,
    tier: ScopeTier,
}

async fn enforce(
    State(tier_gate): State<TierGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let raw = target_param(request.uri());
    let cleared = tier_gate.gate.check(raw.as_deref(), tier_gate.tier).await?;
    request.extensions_mut().insert(cleared);
    Ok(next.run(request).await)
}

/// Registers recon routes, each behind the gate for its tier
pub struct ReconRoutes<S = ()> {
    router: Router<S>,
    gate: ScopeGate,
}

impl<S> ReconRoutes<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Start an empty set of recon routes behind `gate`
    #[must_use]
    pub fn new(gate: ScopeGate) -> Self {
        Self {
            router: Router::new(),
            gate,
        }
    }

    /// Add a route gated by the general registry
    #[must_use]
    pub fn passive(self, path: &str, route: MethodRouter<S>) -> Self {
        self.gated(path, route, ScopeTier::Passive)
    }

    /// Add a route gated by the general registry and the lab list
    #[must_use]
    pub fn active(self, path: &str, route: MethodRouter<S>) -> Self {
        self.gated(path, route, ScopeTier::Active)
    }

    fn gated(mut self, path: &str, route: MethodRouter<S>, tier: ScopeTier) -> Self {
        let layer = middleware::from_fn_with_state(
            TierGate {
                gate: self.gate.clone(),
                tier,
            },
            enforce,
        );
        self.router = self.router.route(path, route.route_layer(layer));
        self
    }

    /// Finish registration
    pub fn into_router(self) -> Router<S> {
        self.router
    }
}
