//! `reconguard targets` - Manage the general target registry.

use anyhow::{bail, Result};
use colored::Colorize;
use reconguard_core::{AuthorizedTarget, GuardError};
use reconguard_scope::{seed, TargetRegistry};
use reconguard_server::open_registry;
use std::sync::Arc;
use tabled::{settings::Style, Table, Tabled};

use super::Context;
use crate::cli::args::{TargetsArgs, TargetsCommands};
use crate::output::OutputFormat;

#[derive(Tabled)]
struct TargetRow {
    #[tabled(rename = "Target")]
    identifier: String,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Added")]
    added_at: String,
}

impl From<&AuthorizedTarget> for TargetRow {
    fn from(target: &AuthorizedTarget) -> Self {
        Self {
            identifier: target.identifier.clone(),
            kind: if target.is_ip() { "ip" } else { "domain" },
            added_at: target.added_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        }
    }
}

pub async fn execute(ctx: Context, args: TargetsArgs) -> Result<()> {
    match args.command {
        TargetsCommands::Add { target } => add(&ctx, &target).await,
        TargetsCommands::Remove { target } => remove(&ctx, &target).await,
        TargetsCommands::List => list(&ctx).await,
    }
}

/// Registry that outlives this process. Changes to an in-memory one would be lost.
async fn durable_registry(ctx: &Context) -> Result<Arc<dyn TargetRegistry>> {
    if ctx.config.database_url.is_none() {
        bail!(
            "No registry database configured.\n\n\
             Set one with --database-url sqlite:reconguard.db,\n\
             RECONGUARD_DATABASE_URL, or database_url in the config file."
        );
    }
    Ok(open_registry(&ctx.config).await?)
}

async fn add(ctx: &Context, target: &str) -> Result<()> {
    let registry = durable_registry(ctx).await?;

    let entry = match registry.add(target).await {
        Ok(entry) => entry,
        Err(GuardError::DuplicateTarget(existing)) => bail!("{existing} is already registered"),
        Err(GuardError::MissingTarget) => bail!("Target must not be blank"),
        Err(e) => return Err(e.into()),
    };

    match ctx.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entry)?),
        OutputFormat::Pretty => println!("{} {}", "Added".green().bold(), entry.identifier),
    }
    Ok(())
}

async fn remove(ctx: &Context, target: &str) -> Result<()> {
    let registry = durable_registry(ctx).await?;
    let removed = registry.remove(target).await?;

    match ctx.output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({ "target": target.trim(), "removed": removed })
            );
        }
        OutputFormat::Pretty if removed => {
            println!("{} {}", "Removed".yellow().bold(), target.trim());
        }
        OutputFormat::Pretty => println!("{} is not registered", target.trim()),
    }
    Ok(())
}

async fn list(ctx: &Context) -> Result<()> {
    let registry = open_registry(&ctx.config).await?;
    if ctx.config.database_url.is_none() {
        // Show what `serve` would start with.
        seed(registry.as_ref(), &ctx.config.scope_targets).await?;
    }
    let entries = registry.list().await?;

    match ctx.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Pretty => print_table(&entries),
    }
    Ok(())
}

fn print_table(entries: &[AuthorizedTarget]) {
    if entries.is_empty() {
        println!("No targets registered");
        return;
    }

    let rows: Vec<TargetRow> = entries.iter().map(TargetRow::from).collect();
    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!("{} target(s)", entries.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use reconguard_server::GatewayConfig;

    fn context(database_url: Option<String>) -> Context {
        Context {
            config: GatewayConfig {
                database_url,
                ..GatewayConfig::default()
            },
            output_format: OutputFormat::Json,
        }
    }

    #[tokio::test]
    async fn test_add_requires_database() {
        let err = add(&context(None), "example.com").await.unwrap_err();
        assert!(err.to_string().contains("--database-url"));
    }

    #[tokio::test]
    async fn test_add_and_remove_persist() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("registry.db").display());
        let ctx = context(Some(url));

        add(&ctx, "Example.com").await.unwrap();
        let err = add(&ctx, "example.COM").await.unwrap_err();
        assert!(err.to_string().contains("already registered"));

        let registry = durable_registry(&ctx).await.unwrap();
        assert!(registry.contains("example.com").await.unwrap());

        remove(&ctx, "example.com").await.unwrap();
        assert!(!registry.contains("example.com").await.unwrap());
    }

    #[test]
    fn test_row_kind() {
        let ip = AuthorizedTarget::new("127.0.0.1").unwrap();
        let domain = AuthorizedTarget::new("scanme.nmap.org").unwrap();
        assert_eq!(TargetRow::from(&ip).kind, "ip");
        assert_eq!(TargetRow::from(&domain).kind, "domain");
    }
}
