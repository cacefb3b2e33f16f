pub mod checks;
pub mod fetch;

use serde_json::Value;
use tracing::warn;

use crate::config::EngineConfig;
use crate::errors::VigilError;
use crate::models::{CardSource, Issue};
use crate::taxonomy::IssueKind;
use crate::utils::truncate_snippet;

/// Outcome of analyzing one agent card.
#[derive(Debug, Default)]
pub struct AnalysisReport {
    pub issues: Vec<Issue>,
    /// Names of the checks that ran to completion.
    pub checks_run: Vec<String>,
    /// Partial-failure notes (fetch errors, skipped checks).
    pub notes: Vec<String>,
    /// Agent name from the card, when present. Used to label inline scans.
    pub card_name: Option<String>,
}

/// Analyze an agent card given by URL or inline JSON text.
///
/// Fetch or parse failure yields a single explanatory issue and ends the
/// analysis; no further checks run against content we could not parse. For
/// parseable content every check runs regardless of what the others found.
pub async fn analyze_card(
    http: &reqwest::Client,
    source: &CardSource,
    config: &EngineConfig,
) -> AnalysisReport {
    let mut report = AnalysisReport::default();

    let content = match source {
        CardSource::Inline(text) => text.clone(),
        CardSource::Url(url) => match fetch::fetch_manifest(http, url, config).await {
            Ok(content) => content,
            Err(e @ (VigilError::Parse(_) | VigilError::Json(_))) => {
                report.notes.push(format!("manifest fetch: {}", e));
                report.issues.push(Issue::new(
                    IssueKind::InvalidManifest,
                    format!("Fetched manifest could not be decoded: {}", e),
                ));
                return report;
            }
            Err(e) => {
                report.notes.push(format!("manifest fetch: {}", e));
                report.issues.push(Issue::new(
                    IssueKind::CardUnreachable,
                    format!("Agent card could not be fetched: {}", e),
                ));
                return report;
            }
        },
    };

    let doc: Value = match serde_json::from_str(&content) {
        Ok(doc) => doc,
        Err(e) => {
            report.issues.push(Issue::new(
                IssueKind::InvalidManifest,
                format!("Manifest is not valid JSON: {}", truncate_snippet(&e.to_string())),
            ));
            return report;
        }
    };

    if !doc.is_object() {
        report.issues.push(Issue::new(
            IssueKind::InvalidManifest,
            "Manifest is not a JSON object",
        ));
        return report;
    }

    report.card_name = doc
        .get("name")
        .and_then(|v| v.as_str())
        .map(|s| truncate_snippet(s));

    for check in checks::CHECKS {
        match (check.run)(&doc) {
            Ok(Some(issue)) => {
                report.issues.push(issue);
                report.checks_run.push(check.name.to_string());
            }
            Ok(None) => {
                report.checks_run.push(check.name.to_string());
            }
            Err(e) => {
                // The check's finding is omitted; make the omission visible
                // to the caller instead of failing the scan.
                warn!(check = check.name, error = %e, "Check failed, skipping");
                report.notes.push(format!("check {} skipped: {}", check.name, e));
                report.issues.push(Issue::new(
                    IssueKind::CheckSkipped,
                    format!("Check '{}' was skipped due to an internal error", check.name),
                ));
            }
        }
    }

    report
}
