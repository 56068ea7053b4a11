//! The recon dispatcher.
//!
//! Each handler receives a target already cleared by the gate, calls its
//! collaborator, and shapes the result. Collaborator failures become
//! payload-level errors with status 200; only the gate answers 4xx.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use reconguard_core::{
    DeepDnsRecords, DeepDnsReport, DnsRecords, GeoData, GeoReport, PassiveReport, ScanOutcome,
    WhoisReport,
};
use reconguard_tools::ReconResult;
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::gate::{ClearedTarget, ReconRoutes, ScopeGate};
use crate::state::AppState;

/// `{status, message}` envelope of the health and test-scan routes
#[derive(Debug, Serialize)]
pub struct StatusMessage {
    status: &'static str,
    message: String,
}

/// Build the gateway router.
///
/// `/` is the only ungated route.
pub fn router(state: AppState, gate: ScopeGate) -> Router {
    let recon = ReconRoutes::<AppState>::new(gate)
        .passive("/test-scan", get(test_scan))
        .passive("/scan/passive", get(passive_scan))
        .passive("/tools/geo", get(geo_lookup))
        .passive("/tools/dns", get(dns_lookup))
        .passive("/tools/dns-deep", get(dns_deep_lookup))
        .passive("/tools/whois", get(whois_lookup))
        .active("/tools/scan", get(port_scan))
        .active("/scan/active", get(port_scan))
        .into_router();

    Router::new()
        .route("/", get(health))
        .merge(recon)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<StatusMessage> {
    Json(StatusMessage {
        status: "online",
        message: "System Ready".to_string(),
    })
}

async fn test_scan(target: ClearedTarget) -> Json<StatusMessage> {
    Json(StatusMessage {
        status: "AUTHORIZED",
        message: format!("Target {} is safe to scan.", target.as_str()),
    })
}

async fn geo_lookup(State(state): State<AppState>, target: ClearedTarget) -> Json<GeoReport> {
    let geo_data = match state.bounded(state.toolbox().geo().locate(target.as_str())).await {
        Ok(info) => GeoData::Located(info),
        Err(e) => {
            debug!(target = target.as_str(), error = %e, "geolocation failed");
            GeoData::failed(e.to_string())
        }
    };

    Json(GeoReport {
        target: target.into_inner(),
        geo_data,
    })
}

async fn dns_lookup(State(state): State<AppState>, target: ClearedTarget) -> Json<DnsRecords> {
    Json(resolve_records(&state, target.as_str()).await)
}

async fn dns_deep_lookup(
    State(state): State<AppState>,
    target: ClearedTarget,
) -> Json<DeepDnsReport> {
    let dns = state.toolbox().dns();
    let domain = target.as_str();

    let (mx, txt, ns) = tokio::join!(
        state.bounded(dns.mx_records(domain)),
        state.bounded(dns.txt_records(domain)),
        state.bounded(dns.ns_records(domain)),
    );

    let dns_records = DeepDnsRecords {
        mx: or_empty(domain, "MX", mx)
            .into_iter()
            .map(|r| format!("{} {}", r.preference, r.exchange))
            .collect(),
        txt: or_empty(domain, "TXT", txt),
        ns: or_empty(domain, "NS", ns)
            .into_iter()
            .map(|r| r.host)
            .collect(),
    };

    Json(DeepDnsReport {
        target: target.into_inner(),
        dns_records,
    })
}

async fn whois_lookup(State(state): State<AppState>, target: ClearedTarget) -> Json<WhoisReport> {
    Json(whois_report(&state, target.as_str()).await)
}

async fn passive_scan(State(state): State<AppState>, target: ClearedTarget) -> Json<PassiveReport> {
    let domain = target.as_str();
    let (dns, whois) = tokio::join!(resolve_records(&state, domain), whois_report(&state, domain));

    Json(PassiveReport {
        target: target.into_inner(),
        dns,
        whois,
    })
}

async fn port_scan(State(state): State<AppState>, target: ClearedTarget) -> Json<ScanOutcome> {
    let outcome = match state.bounded(state.toolbox().scanner().scan(target.as_str())).await {
        Ok(ports) => ScanOutcome::Ports(ports),
        Err(e) => {
            debug!(target = target.as_str(), error = %e, "port scan failed");
            ScanOutcome::Failed {
                error: format!("Port Scan Failed: {e}"),
            }
        }
    };
    Json(outcome)
}

async fn resolve_records(state: &AppState, domain: &str) -> DnsRecords {
    let dns = state.toolbox().dns();
    let (a, mx, ns) = tokio::join!(
        state.bounded(dns.a_records(domain)),
        state.bounded(dns.mx_records(domain)),
        state.bounded(dns.ns_records(domain)),
    );

    DnsRecords {
        a: or_empty(domain, "A", a),
        mx: or_empty(domain, "MX", mx),
        ns: or_empty(domain, "NS", ns),
    }
}

async fn whois_report(state: &AppState, domain: &str) -> WhoisReport {
    match state.bounded(state.toolbox().whois().lookup(domain)).await {
        Ok(data) => WhoisReport::found(domain, data),
        Err(e) => {
            debug!(domain, error = %e, "WHOIS lookup failed");
            WhoisReport::failed(domain, e.to_string())
        }
    }
}

fn or_empty<T>(domain: &str, record_type: &str, result: ReconResult<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        debug!(domain, record_type, error = %e, "DNS lookup failed");
        Vec::new()
    })
}
