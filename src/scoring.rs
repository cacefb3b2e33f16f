//! Trust score computation.
//!
//! Scoring is a pure function of the issue multiset: start at 100, subtract
//! each issue's taxonomy penalty, clamp to [0, 100]. A caller can reconstruct
//! any score from the issue list alone, and identical issue sets always
//! produce identical output.

use crate::models::{Issue, ScanStatus};

/// Compute the trust score and status for a set of issues.
pub fn score(issues: &[Issue]) -> (u8, ScanStatus) {
    let deducted: u32 = issues.iter().map(|i| i.kind.penalty() as u32).sum();
    let score = 100u32.saturating_sub(deducted) as u8;
    (score, status_for(score))
}

/// Map a score onto the SAFE/WARNING/CRITICAL thresholds:
/// score > 80 is SAFE, 50 < score <= 80 is WARNING, score <= 50 is CRITICAL.
pub fn status_for(score: u8) -> ScanStatus {
    if score > 80 {
        ScanStatus::Safe
    } else if score > 50 {
        ScanStatus::Warning
    } else {
        ScanStatus::Critical
    }
}

/// Order issues by descending severity, preserving detection order within a
/// severity level. Stable, so identical inputs always order identically.
pub fn order_issues(issues: &mut [Issue]) {
    issues.sort_by_key(|i| i.severity.rank());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::IssueKind;

    #[test]
    fn test_empty_issue_set_is_safe() {
        let (s, status) = score(&[]);
        assert_eq!(s, 100);
        assert_eq!(status, ScanStatus::Safe);
    }

    #[test]
    fn test_scoring_is_pure() {
        let issues = vec![
            Issue::new(IssueKind::MissingHstsHeader, "Missing HSTS header"),
            Issue::new(IssueKind::ShortDescription, "Description is too short"),
        ];
        assert_eq!(score(&issues), score(&issues));
    }

    #[test]
    fn test_scoring_monotone_in_findings() {
        // A superset of issues can never score higher than its subset.
        let base = vec![Issue::new(IssueKind::MissingCspHeader, "Missing CSP header")];
        let mut superset = base.clone();
        superset.push(Issue::new(
            IssueKind::ExcessivePrivilege,
            "Manifest requests shell execution",
        ));
        assert!(score(&superset).0 <= score(&base).0);
    }

    #[test]
    fn test_score_clamped_at_zero() {
        let issues: Vec<Issue> = (0..5)
            .map(|_| Issue::new(IssueKind::MissingHttps, "Endpoint is not using HTTPS"))
            .collect();
        let (s, status) = score(&issues);
        assert_eq!(s, 0);
        assert_eq!(status, ScanStatus::Critical);
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(status_for(100), ScanStatus::Safe);
        assert_eq!(status_for(81), ScanStatus::Safe);
        assert_eq!(status_for(80), ScanStatus::Warning);
        assert_eq!(status_for(51), ScanStatus::Warning);
        assert_eq!(status_for(50), ScanStatus::Critical);
        assert_eq!(status_for(0), ScanStatus::Critical);
    }

    #[test]
    fn test_info_issues_do_not_move_score() {
        let issues = vec![Issue::new(IssueKind::CheckSkipped, "Check skipped")];
        let (s, status) = score(&issues);
        assert_eq!(s, 100);
        assert_eq!(status, ScanStatus::Safe);
    }

    #[test]
    fn test_order_issues_by_severity_then_detection_order() {
        let mut issues = vec![
            Issue::new(IssueKind::CardNotDiscoverable, "first low"),
            Issue::new(IssueKind::MissingHttps, "critical"),
            Issue::new(IssueKind::MissingCspHeader, "second low"),
            Issue::new(IssueKind::MissingHstsHeader, "medium"),
        ];
        order_issues(&mut issues);

        let kinds: Vec<_> = issues.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::MissingHttps,
                IssueKind::MissingHstsHeader,
                IssueKind::CardNotDiscoverable,
                IssueKind::MissingCspHeader,
            ]
        );
        // Detection order preserved within the same severity
        assert_eq!(issues[2].message, "first low");
        assert_eq!(issues[3].message, "second low");
    }
}
