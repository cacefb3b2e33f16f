use serde::{Deserialize, Serialize};

use crate::taxonomy::{IssueKind, Severity};

/// A single finding produced by the manifest analyzer or the endpoint prober.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
}

impl Issue {
    /// Build an issue for a taxonomy kind. The severity always comes from
    /// the taxonomy default for that kind; there is no way to attach a
    /// different severity, which keeps scoring reproducible.
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message: message.into(),
        }
    }
}
