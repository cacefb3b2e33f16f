use serde::{Deserialize, Serialize};

use super::issue::Issue;

/// Which analyzer a scan request is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    Card,
    Endpoint,
}

impl ScanMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanMode::Card => "card",
            ScanMode::Endpoint => "endpoint",
        }
    }
}

/// Where the manifest content for a card scan comes from. Exactly one source
/// per target; request validation enforces this before a target is built.
#[derive(Debug, Clone)]
pub enum CardSource {
    Url(reqwest::Url),
    Inline(String),
}

/// The normalized input to a scan, produced by request validation.
#[derive(Debug, Clone)]
pub enum ScanTarget {
    Card { source: CardSource },
    Endpoint { url: reqwest::Url },
}

impl ScanTarget {
    pub fn mode(&self) -> ScanMode {
        match self {
            ScanTarget::Card { .. } => ScanMode::Card,
            ScanTarget::Endpoint { .. } => ScanMode::Endpoint,
        }
    }

    /// Stable identifier used for history entries and log fields.
    pub fn identifier(&self) -> String {
        match self {
            ScanTarget::Card {
                source: CardSource::Url(url),
            } => url.to_string(),
            ScanTarget::Card {
                source: CardSource::Inline(_),
            } => "inline-manifest".to_string(),
            ScanTarget::Endpoint { url } => url.to_string(),
        }
    }
}

/// Coarse classification derived from the trust score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScanStatus {
    Safe,
    Warning,
    Critical,
}

impl ScanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Safe => "SAFE",
            ScanStatus::Warning => "WARNING",
            ScanStatus::Critical => "CRITICAL",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "SAFE" => Some(ScanStatus::Safe),
            "WARNING" => Some(ScanStatus::Warning),
            "CRITICAL" => Some(ScanStatus::Critical),
            _ => None,
        }
    }
}

/// Scan metadata returned alongside the score and issue list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanDetails {
    /// Identifier of the scanned target (URL or "inline:<name>").
    pub target: String,
    /// Unique id assigned to this scan.
    pub scan_id: String,
    pub mode: ScanMode,
    /// RFC 3339 timestamp taken when the scan completed.
    pub timestamp: String,
    /// Transport observed by the prober ("https" or "http"); absent for
    /// card scans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<String>,
    /// Names of the checks or probes that ran to completion.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub checks_run: Vec<String>,
    /// Partial-failure notes (timed-out probes, skipped checks, persist
    /// failures). Empty on a fully clean scan.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
}

/// The outcome of one scan. Immutable once assembled; the orchestrator
/// persists a summary and returns the full result to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub score: u8,
    pub status: ScanStatus,
    pub issues: Vec<Issue>,
    pub details: ScanDetails,
}
