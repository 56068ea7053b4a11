//! `reconguard check` - Show how the gate treats a target.

use anyhow::Result;
use colored::Colorize;
use reconguard_core::{GuardError, ScopeTier};
use reconguard_server::{build_gate, ScopeGate};
use serde::Serialize;

use super::Context;
use crate::cli::args::CheckArgs;
use crate::output::OutputFormat;

#[derive(Debug, Serialize)]
struct Verdict {
    tier: ScopeTier,
    allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    target: String,
    verdicts: Vec<Verdict>,
}

pub async fn execute(ctx: Context, args: CheckArgs) -> Result<()> {
    let gate = build_gate(&ctx.config).await?;
    let report = evaluate(&gate, &args.target).await?;

    match ctx.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Pretty => {
            println!("{}", report.target.bold());
            for verdict in &report.verdicts {
                let label = format!("{:<8}", verdict.tier.to_string());
                if verdict.allowed {
                    println!("  {label} {}", "ALLOWED".green().bold());
                } else {
                    println!(
                        "  {label} {}  {}",
                        "DENIED".red().bold(),
                        verdict.detail.as_deref().unwrap_or_default()
                    );
                }
            }
        }
    }
    Ok(())
}

async fn evaluate(gate: &ScopeGate, target: &str) -> Result<CheckReport> {
    let mut verdicts = Vec::with_capacity(2);
    for tier in [ScopeTier::Passive, ScopeTier::Active] {
        let verdict = match gate.check(Some(target), tier).await {
            Ok(_) => Verdict {
                tier,
                allowed: true,
                detail: None,
            },
            Err(e @ GuardError::ScopeViolation { .. }) => Verdict {
                tier,
                allowed: false,
                detail: Some(e.to_string()),
            },
            Err(e) => return Err(e.into()),
        };
        verdicts.push(verdict);
    }

    Ok(CheckReport {
        target: target.trim().to_string(),
        verdicts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reconguard_server::GatewayConfig;

    #[tokio::test]
    async fn test_evaluate_tiers() {
        let config = GatewayConfig {
            scope_targets: vec!["example.com".into(), "scanme.nmap.org".into()],
            lab_targets: vec!["scanme.nmap.org".into()],
            ..GatewayConfig::default()
        };
        let gate = build_gate(&config).await.unwrap();

        let report = evaluate(&gate, "example.com").await.unwrap();
        assert!(report.verdicts[0].allowed);
        assert!(!report.verdicts[1].allowed);
        assert!(report.verdicts[1]
            .detail
            .as_deref()
            .unwrap()
            .starts_with("ETHICAL_GUARDRAIL"));

        let report = evaluate(&gate, "scanme.nmap.org").await.unwrap();
        assert!(report.verdicts.iter().all(|v| v.allowed));
    }

    #[tokio::test]
    async fn test_evaluate_blank_target() {
        let gate = build_gate(&GatewayConfig::default()).await.unwrap();
        assert!(evaluate(&gate, "  ").await.is_err());
    }
}
