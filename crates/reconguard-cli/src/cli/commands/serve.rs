//! `reconguard serve` - Run the gateway.

use anyhow::Result;
use tracing::info;

use super::Context;
use crate::cli::args::ServeArgs;

pub async fn execute(ctx: Context, args: ServeArgs) -> Result<()> {
    let mut config = ctx.config;
    if let Some(listen) = args.listen {
        config.listen = listen;
    }

    info!(
        registry = if config.database_url.is_some() { "sqlite" } else { "memory" },
        timeout_secs = config.collaborator_timeout_secs,
        "starting recon gateway"
    );

    reconguard_server::serve(config).await?;
    Ok(())
}
