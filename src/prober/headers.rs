use reqwest::header::HeaderMap;

use crate::models::Issue;
use crate::taxonomy::IssueKind;

/// The fixed security header checklist. Severity lives in the taxonomy,
/// keyed by issue kind, so the checklist only names what to look for.
struct HeaderCheck {
    header: &'static str,
    kind: IssueKind,
    message: &'static str,
}

static HEADER_CHECKLIST: &[HeaderCheck] = &[
    HeaderCheck {
        header: "strict-transport-security",
        kind: IssueKind::MissingHstsHeader,
        message: "Response is missing the Strict-Transport-Security header",
    },
    HeaderCheck {
        header: "x-content-type-options",
        kind: IssueKind::MissingContentTypeOptions,
        message: "Response is missing the X-Content-Type-Options header",
    },
    HeaderCheck {
        header: "content-security-policy",
        kind: IssueKind::MissingCspHeader,
        message: "Response is missing the Content-Security-Policy header",
    },
];

/// Any of these marks the endpoint as advertising a rate limit.
static RATE_LIMIT_HEADERS: &[&str] = &[
    "x-ratelimit-limit",
    "x-rate-limit-limit",
    "ratelimit-limit",
    "ratelimit-policy",
    "retry-after",
];

/// Inspect response headers against the checklist; one issue per missing
/// header. Pure over the header map, so identical responses always produce
/// identical issues in checklist order.
pub fn evaluate_security_headers(headers: &HeaderMap) -> Vec<Issue> {
    let mut issues = Vec::new();

    for check in HEADER_CHECKLIST {
        if !headers.contains_key(check.header) {
            issues.push(Issue::new(check.kind, check.message));
        }
    }

    if !RATE_LIMIT_HEADERS.iter().any(|h| headers.contains_key(*h)) {
        issues.push(Issue::new(
            IssueKind::MissingRateLimitHeader,
            "Response advertises no rate-limit headers",
        ));
    }

    issues
}
