pub mod headers;

use std::time::Duration;

use reqwest::{Method, StatusCode, Url};
use tokio_util::sync::CancellationToken;

use crate::config::EngineConfig;
use crate::models::Issue;
use crate::taxonomy::IssueKind;
use crate::utils::truncate_snippet;

pub use headers::evaluate_security_headers;

/// Conventional location for an agent card relative to an endpoint base URL.
pub const WELL_KNOWN_CARD_PATH: &str = "/.well-known/agent.json";

/// Outcome of probing one endpoint.
#[derive(Debug, Default)]
pub struct ProbeReport {
    pub issues: Vec<Issue>,
    /// URL scheme observed ("https" or "http").
    pub transport: String,
    /// Names of the probes that ran to completion.
    pub probes_run: Vec<String>,
    /// Partial-failure notes (canceled or failed probes).
    pub notes: Vec<String>,
}

enum ProbeOutcome {
    Completed(Vec<Issue>),
    Unreachable(String),
    TimedOut,
    Canceled,
}

/// Probe a live endpoint. The network probes run concurrently against the
/// same target, each bounded by the per-probe timeout and the request's
/// cancellation token; a probe that times out or fails becomes data rather
/// than aborting the scan, so partial results are always returned.
pub async fn probe_endpoint(
    http: &reqwest::Client,
    url: &Url,
    config: &EngineConfig,
    cancel: &CancellationToken,
) -> ProbeReport {
    let mut report = ProbeReport {
        transport: url.scheme().to_string(),
        ..Default::default()
    };

    // Transport check is pure over the URL and always runs.
    report.probes_run.push("transport".to_string());
    if url.scheme() != "https" {
        report.issues.push(Issue::new(
            IssueKind::MissingHttps,
            "Endpoint is not using HTTPS",
        ));
    }

    // Child token: the total probe budget cancels our own probes without
    // touching the caller's request-level token.
    let local_cancel = cancel.child_token();
    let probe_timeout = Duration::from_secs(config.probe_timeout_secs);
    let join = futures::future::join(
        bounded(&local_cancel, probe_timeout, header_probe(http, url)),
        bounded(&local_cancel, probe_timeout, card_probe(http, url)),
    );
    tokio::pin!(join);

    let budget = Duration::from_secs(config.probe_budget_secs);
    let (headers_outcome, card_outcome) = tokio::select! {
        outcomes = &mut join => outcomes,
        _ = tokio::time::sleep(budget) => {
            local_cancel.cancel();
            join.await
        }
    };

    let outcomes = [
        ("security-headers", headers_outcome),
        ("card-discovery", card_outcome),
    ];

    // Liveness: when every network probe failed to connect, collapse the
    // per-probe failures into a single unreachable finding.
    if outcomes
        .iter()
        .all(|(_, o)| matches!(o, ProbeOutcome::Unreachable(_)))
    {
        for (name, outcome) in &outcomes {
            if let ProbeOutcome::Unreachable(err) = outcome {
                report.notes.push(format!("{} probe: {}", name, err));
            }
        }
        report.issues.push(Issue::new(
            IssueKind::EndpointUnreachable,
            "Endpoint is unreachable: all probes failed to connect",
        ));
        return report;
    }

    for (name, outcome) in outcomes {
        match outcome {
            ProbeOutcome::Completed(issues) => {
                report.issues.extend(issues);
                report.probes_run.push(name.to_string());
            }
            ProbeOutcome::TimedOut => {
                report.issues.push(Issue::new(
                    IssueKind::ProbeTimedOut,
                    format!(
                        "Probe '{}' timed out after {}s",
                        name, config.probe_timeout_secs
                    ),
                ));
            }
            ProbeOutcome::Canceled => {
                report
                    .notes
                    .push(format!("{} probe canceled before completion", name));
            }
            ProbeOutcome::Unreachable(err) => {
                // One probe failed while another reached the host. Its
                // findings are omitted; make that omission visible.
                report.notes.push(format!("{} probe failed: {}", name, err));
                report.issues.push(Issue::new(
                    IssueKind::CheckSkipped,
                    format!("Probe '{}' could not connect and was skipped", name),
                ));
            }
        }
    }

    report
}

async fn bounded<F>(cancel: &CancellationToken, limit: Duration, probe: F) -> ProbeOutcome
where
    F: std::future::Future<Output = ProbeOutcome>,
{
    tokio::select! {
        _ = cancel.cancelled() => ProbeOutcome::Canceled,
        result = tokio::time::timeout(limit, probe) => match result {
            Ok(outcome) => outcome,
            Err(_) => ProbeOutcome::TimedOut,
        }
    }
}

/// Issue a lightweight request and inspect the response headers. Servers
/// that reject HEAD get one minimal GET instead.
async fn header_probe(http: &reqwest::Client, url: &Url) -> ProbeOutcome {
    let response = match http.request(Method::HEAD, url.clone()).send().await {
        Ok(resp)
            if resp.status() == StatusCode::METHOD_NOT_ALLOWED
                || resp.status() == StatusCode::NOT_IMPLEMENTED =>
        {
            match http.get(url.clone()).send().await {
                Ok(resp) => resp,
                Err(e) => return ProbeOutcome::Unreachable(e.to_string()),
            }
        }
        Ok(resp) => resp,
        Err(e) => return ProbeOutcome::Unreachable(e.to_string()),
    };

    ProbeOutcome::Completed(headers::evaluate_security_headers(response.headers()))
}

/// Look for an agent card at the conventional well-known path. Absence is a
/// low-severity finding, not a failure.
async fn card_probe(http: &reqwest::Client, url: &Url) -> ProbeOutcome {
    let card_url = match url.join(WELL_KNOWN_CARD_PATH) {
        Ok(u) => u,
        Err(e) => {
            return ProbeOutcome::Completed(vec![Issue::new(
                IssueKind::CardNotDiscoverable,
                format!("Could not derive well-known card URL: {}", e),
            )])
        }
    };

    match http.get(card_url.clone()).send().await {
        Ok(resp) if resp.status().is_success() => ProbeOutcome::Completed(Vec::new()),
        Ok(resp) => ProbeOutcome::Completed(vec![Issue::new(
            IssueKind::CardNotDiscoverable,
            format!("No agent card at {} (status {})", card_url, resp.status()),
        )]),
        Err(e) if e.is_connect() || e.is_timeout() => ProbeOutcome::Unreachable(e.to_string()),
        Err(e) => ProbeOutcome::Completed(vec![Issue::new(
            IssueKind::CardNotDiscoverable,
            format!(
                "No agent card at {}: {}",
                card_url,
                truncate_snippet(&e.to_string())
            ),
        )]),
    }
}
