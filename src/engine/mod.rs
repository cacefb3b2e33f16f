pub mod phase;

use std::time::Duration;

use chrono::Utc;
use reqwest::Url;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::analyzer;
use crate::config::EngineConfig;
use crate::db::Database;
use crate::errors::VigilError;
use crate::models::{CardSource, Issue, ScanDetails, ScanResult, ScanTarget};
use crate::prober;
use crate::scoring;
use crate::taxonomy::IssueKind;
use phase::ScanPhase;

/// What one dispatch (analysis or probe run) produced, before scoring.
struct DispatchOutcome {
    issues: Vec<Issue>,
    transport: Option<String>,
    checks_run: Vec<String>,
    notes: Vec<String>,
    target_label: String,
}

/// The scan orchestrator. Routes a validated target to the manifest
/// analyzer or the endpoint prober, scores the collected issues, persists a
/// history entry, and assembles the response. One engine serves many
/// concurrent requests; all per-scan state is request-scoped.
pub struct ScanEngine {
    config: EngineConfig,
    http: reqwest::Client,
    db: Database,
}

impl ScanEngine {
    pub fn new(config: EngineConfig, db: Database) -> Result<Self, VigilError> {
        config.validate().map_err(VigilError::Config)?;

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(Duration::from_secs(config.probe_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| VigilError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, http, db })
    }

    /// Scan an agent card given by URL or inline JSON text. Exactly one of
    /// the two must be present; anything else is rejected before dispatch.
    pub async fn scan_card(
        &self,
        url: Option<&str>,
        json_content: Option<&str>,
    ) -> Result<ScanResult, VigilError> {
        let target = match validate_card_request(url, json_content) {
            Ok(target) => target,
            Err(e) => {
                debug!(phase = ScanPhase::Failed.as_str(), error = %e, "Card scan rejected");
                return Err(e);
            }
        };
        Ok(self.run(target).await)
    }

    /// Probe a live agent endpoint.
    pub async fn scan_endpoint(&self, url: Option<&str>) -> Result<ScanResult, VigilError> {
        let target = match validate_endpoint_request(url) {
            Ok(target) => target,
            Err(e) => {
                debug!(phase = ScanPhase::Failed.as_str(), error = %e, "Endpoint scan rejected");
                return Err(e);
            }
        };
        Ok(self.run(target).await)
    }

    /// Drive one validated target through the scan lifecycle. Never fails:
    /// everything discovered after validation becomes an issue.
    async fn run(&self, target: ScanTarget) -> ScanResult {
        let scan_id = uuid::Uuid::new_v4().to_string();
        let mode = target.mode();
        debug!(
            scan_id = %scan_id,
            phase = ScanPhase::Received.as_str(),
            mode = mode.as_str(),
            target = %target.identifier(),
            "Scan received"
        );

        let cancel = CancellationToken::new();
        let deadline = Duration::from_secs(self.config.request_deadline_secs);

        debug!(scan_id = %scan_id, phase = ScanPhase::Dispatched.as_str(), "Scan dispatched");
        let work = self.dispatch(&target, &cancel);
        tokio::pin!(work);

        let (mut outcome, deadline_hit) = tokio::select! {
            outcome = &mut work => (outcome, false),
            _ = tokio::time::sleep(deadline) => {
                // Cancel in-flight probes and collect what they produced
                cancel.cancel();
                (work.await, true)
            }
        };

        if deadline_hit {
            warn!(scan_id = %scan_id, "Request deadline elapsed, returning partial results");
            outcome.notes.push(format!(
                "scan canceled after {}s deadline",
                self.config.request_deadline_secs
            ));
            outcome.issues.push(Issue::new(
                IssueKind::ScanIncomplete,
                "Scan hit its deadline before all checks completed; results are partial",
            ));
        }
        debug!(
            scan_id = %scan_id,
            phase = ScanPhase::Analyzed.as_str(),
            issues = outcome.issues.len(),
            "Analysis complete"
        );

        scoring::order_issues(&mut outcome.issues);
        let (score, status) = scoring::score(&outcome.issues);
        debug!(
            scan_id = %scan_id,
            phase = ScanPhase::Scored.as_str(),
            score,
            status = status.as_str(),
            "Scored"
        );

        let timestamp = Utc::now().to_rfc3339();
        match self.db.append_history(
            &outcome.target_label,
            mode,
            score,
            status,
            &timestamp,
            self.config.history_retention,
        ) {
            Ok(id) => {
                debug!(scan_id = %scan_id, phase = ScanPhase::Persisted.as_str(), history_id = id, "Persisted");
            }
            Err(e) => {
                // The scan result is still valid; surface the persist
                // failure in the details instead of failing the request.
                warn!(scan_id = %scan_id, error = %e, "Failed to persist history entry");
                outcome.notes.push("history persist failed".to_string());
            }
        }

        debug!(scan_id = %scan_id, phase = ScanPhase::Responded.as_str(), "Responding");
        ScanResult {
            score,
            status,
            issues: outcome.issues,
            details: ScanDetails {
                target: outcome.target_label,
                scan_id,
                mode,
                timestamp,
                transport: outcome.transport,
                checks_run: outcome.checks_run,
                notes: outcome.notes,
            },
        }
    }

    async fn dispatch(&self, target: &ScanTarget, cancel: &CancellationToken) -> DispatchOutcome {
        match target {
            ScanTarget::Card { source } => {
                let report = analyzer::analyze_card(&self.http, source, &self.config).await;
                let target_label = match (source, &report.card_name) {
                    (CardSource::Url(url), _) => url.to_string(),
                    (CardSource::Inline(_), Some(name)) => format!("inline:{}", name),
                    (CardSource::Inline(_), None) => target.identifier(),
                };
                DispatchOutcome {
                    issues: report.issues,
                    transport: None,
                    checks_run: report.checks_run,
                    notes: report.notes,
                    target_label,
                }
            }
            ScanTarget::Endpoint { url } => {
                let report = prober::probe_endpoint(&self.http, url, &self.config, cancel).await;
                DispatchOutcome {
                    issues: report.issues,
                    transport: Some(report.transport),
                    checks_run: report.probes_run,
                    notes: report.notes,
                    target_label: url.to_string(),
                }
            }
        }
    }
}

fn parse_http_url(raw: &str, what: &str) -> Result<Url, VigilError> {
    let url = Url::parse(raw)
        .map_err(|e| VigilError::Validation(format!("Invalid {} URL: {}", what, e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(VigilError::Validation(format!(
            "Invalid {} URL: scheme must be http or https",
            what
        )));
    }
    if url.host_str().is_none() {
        return Err(VigilError::Validation(format!(
            "Invalid {} URL: missing host",
            what
        )));
    }
    Ok(url)
}

fn validate_card_request(
    url: Option<&str>,
    json_content: Option<&str>,
) -> Result<ScanTarget, VigilError> {
    let url = url.map(str::trim).filter(|s| !s.is_empty());
    let json_content = json_content.map(str::trim).filter(|s| !s.is_empty());

    match (url, json_content) {
        (Some(url), None) => Ok(ScanTarget::Card {
            source: CardSource::Url(parse_http_url(url, "card")?),
        }),
        (None, Some(content)) => Ok(ScanTarget::Card {
            source: CardSource::Inline(content.to_string()),
        }),
        (Some(_), Some(_)) => Err(VigilError::Validation(
            "Provide either 'url' or 'json_content', not both".into(),
        )),
        (None, None) => Err(VigilError::Validation(
            "Either 'url' or 'json_content' is required".into(),
        )),
    }
}

fn validate_endpoint_request(url: Option<&str>) -> Result<ScanTarget, VigilError> {
    let url = url
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| VigilError::Validation("Endpoint 'url' is required".into()))?;
    Ok(ScanTarget::Endpoint {
        url: parse_http_url(url, "endpoint")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ScanMode, ScanStatus};
    use crate::taxonomy::Severity;

    fn test_engine() -> ScanEngine {
        ScanEngine::new(EngineConfig::default(), Database::in_memory().unwrap()).unwrap()
    }

    const CLEAN_CARD: &str = r#"{
        "name": "weather-agent",
        "version": "1.2.0",
        "description": "Returns weather forecasts for a given city and date range.",
        "contact": "ops@example.com",
        "rate_limit": "60/min",
        "authentication": { "schemes": ["bearer"] },
        "capabilities": ["streaming"],
        "endpoints": [ { "url": "https://api.example.com/tasks" } ]
    }"#;

    #[tokio::test]
    async fn test_clean_card_scores_perfect() {
        let engine = test_engine();
        let result = engine.scan_card(None, Some(CLEAN_CARD)).await.unwrap();

        assert!(result.issues.is_empty(), "issues: {:?}", result.issues);
        assert_eq!(result.score, 100);
        assert_eq!(result.status, ScanStatus::Safe);
        assert_eq!(result.details.mode, ScanMode::Card);
        assert_eq!(result.details.target, "inline:weather-agent");
    }

    #[tokio::test]
    async fn test_exec_shell_card_is_critical() {
        let engine = test_engine();
        let card = r#"{ "capabilities": ["exec_shell"], "description": "" }"#;
        let result = engine.scan_card(None, Some(card)).await.unwrap();

        let kinds: Vec<_> = result.issues.iter().map(|i| i.kind).collect();
        assert!(kinds.contains(&IssueKind::ExcessivePrivilege));
        assert!(kinds.contains(&IssueKind::ShortDescription));
        assert!(result.score <= 50);
        assert_eq!(result.status, ScanStatus::Critical);
    }

    #[tokio::test]
    async fn test_issues_ordered_by_descending_severity() {
        let engine = test_engine();
        let card = r#"{ "capabilities": ["exec_shell"], "description": "" }"#;
        let result = engine.scan_card(None, Some(card)).await.unwrap();

        let ranks: Vec<u8> = result.issues.iter().map(|i| i.severity.rank()).collect();
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        assert_eq!(ranks, sorted);
        assert_eq!(result.issues[0].severity, Severity::Critical);
    }

    #[tokio::test]
    async fn test_scan_is_idempotent() {
        let engine = test_engine();
        let card = r#"{ "capabilities": ["exec_shell"], "description": "" }"#;

        let first = engine.scan_card(None, Some(card)).await.unwrap();
        let second = engine.scan_card(None, Some(card)).await.unwrap();

        let kinds = |r: &ScanResult| r.issues.iter().map(|i| (i.kind, i.severity)).collect::<Vec<_>>();
        assert_eq!(kinds(&first), kinds(&second));
        assert_eq!(first.score, second.score);
        assert_eq!(first.status, second.status);
    }

    #[tokio::test]
    async fn test_scan_persists_history() {
        let db = Database::in_memory().unwrap();
        let engine = ScanEngine::new(EngineConfig::default(), db.clone()).unwrap();

        engine.scan_card(None, Some(CLEAN_CARD)).await.unwrap();
        let entries = db.list_history(10, 0).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].score, 100);
        assert_eq!(entries[0].status, ScanStatus::Safe);
        assert_eq!(entries[0].target, "inline:weather-agent");
    }

    #[tokio::test]
    async fn test_card_request_requires_exactly_one_source() {
        let engine = test_engine();

        let result = engine.scan_card(None, None).await;
        assert!(matches!(result, Err(VigilError::Validation(_))));

        let result = engine
            .scan_card(Some("https://a.example.com/card.json"), Some("{}"))
            .await;
        assert!(matches!(result, Err(VigilError::Validation(_))));

        // Whitespace-only content counts as absent
        let result = engine.scan_card(Some("  "), Some("  ")).await;
        assert!(matches!(result, Err(VigilError::Validation(_))));
    }

    #[tokio::test]
    async fn test_rejected_request_leaves_no_history() {
        let db = Database::in_memory().unwrap();
        let engine = ScanEngine::new(EngineConfig::default(), db.clone()).unwrap();

        let _ = engine.scan_card(None, None).await;
        assert_eq!(db.history_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_endpoint_request_validation() {
        let engine = test_engine();

        assert!(matches!(
            engine.scan_endpoint(None).await,
            Err(VigilError::Validation(_))
        ));
        assert!(matches!(
            engine.scan_endpoint(Some("")).await,
            Err(VigilError::Validation(_))
        ));
        assert!(matches!(
            engine.scan_endpoint(Some("ftp://example.com")).await,
            Err(VigilError::Validation(_))
        ));
        assert!(matches!(
            engine.scan_endpoint(Some("not a url")).await,
            Err(VigilError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_inline_json_degrades_gracefully() {
        let engine = test_engine();
        let result = engine.scan_card(None, Some("{broken")).await.unwrap();

        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].kind, IssueKind::InvalidManifest);
        assert_eq!(result.score, 70);
        assert_eq!(result.status, ScanStatus::Warning);
    }
}
