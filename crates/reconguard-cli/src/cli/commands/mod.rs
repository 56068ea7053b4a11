//! Command implementations.

pub mod check;
pub mod serve;
pub mod targets;

use reconguard_server::GatewayConfig;

use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Gateway configuration after CLI overrides
    pub config: GatewayConfig,

    /// Output format
    pub output_format: OutputFormat,
}
