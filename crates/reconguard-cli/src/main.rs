//! reconguard - scope-gated recon gateway
//!
//! Runs the gateway and manages its allow-list.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    reconguard_cli::run().await
}
