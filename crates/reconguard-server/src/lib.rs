//! reconguard-server: the scope-gated recon gateway.
//!
//! Every recon route sits behind the authorization gate. A request names its
//! target in the `target` query parameter; the gate checks it against the
//! allow-lists before any collaborator runs.
//!
//! # Tiers
//!
//! - **Passive** (`/test-scan`, `/scan/passive`, `/tools/geo`, `/tools/dns`,
//!   `/tools/dns-deep`, `/tools/whois`) - the general target registry
//! - **Active** (`/tools/scan`, `/scan/active`) - the general registry and
//!   the lab-only list
//!
//! Rejections answer 403 (or 400 without a target) with `{"detail": ...}`.
//! Collaborator failures are reported inside a 200 payload.

pub mod config;
pub mod error;
pub mod gate;
pub mod routes;
pub mod state;

pub use config::GatewayConfig;
pub use error::ApiError;
pub use gate::{ClearedTarget, ReconRoutes, ScopeGate};
pub use routes::router;
pub use state::AppState;

use reconguard_core::{GuardError, Result};
use reconguard_scope::{seed, MemoryRegistry, ScopeEngine, SqlRegistry, TargetRegistry};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Open the general registry named by the config.
///
/// Without a database URL the registry lives in memory.
pub async fn open_registry(config: &GatewayConfig) -> Result<Arc<dyn TargetRegistry>> {
    Ok(match &config.database_url {
        Some(url) => Arc::new(SqlRegistry::connect(url).await?),
        None => Arc::new(MemoryRegistry::new()),
    })
}

/// Build the two-tier gate, seeding the general registry from the config.
pub async fn build_gate(config: &GatewayConfig) -> Result<ScopeGate> {
    let general = open_registry(config).await?;
    let added = seed(general.as_ref(), &config.scope_targets).await?;
    let lab = MemoryRegistry::from_targets(&config.lab_targets);

    info!(
        seeded = added,
        registered = general.len().await?,
        lab = config.lab_targets.len(),
        "scope lists ready"
    );

    Ok(ScopeGate::new(
        ScopeEngine::new(general),
        ScopeEngine::new(Arc::new(lab)),
    ))
}

/// Run the gateway until the listener fails.
pub async fn serve(config: GatewayConfig) -> Result<()> {
    let gate = build_gate(&config).await?;
    let toolbox = config
        .toolbox_builder()?
        .build()
        .map_err(|e| GuardError::Config(format!("failed to set up collaborators: {e}")))?;
    let state = AppState::new(toolbox, config.collaborator_timeout());

    let listener = TcpListener::bind(config.listen).await?;
    info!(addr = %config.listen, "recon gateway listening");

    axum::serve(listener, router(state, gate)).await?;
    Ok(())
}
