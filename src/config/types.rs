use serde::{Deserialize, Serialize};

/// Engine tuning knobs. Every field has a default so a config file only
/// needs to name the values it overrides.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Timeout for fetching a manifest by URL, in seconds.
    pub fetch_timeout_secs: u64,
    /// Size cap for fetched manifest bodies, in bytes.
    pub max_manifest_bytes: u64,
    /// Per-probe timeout, in seconds.
    pub probe_timeout_secs: u64,
    /// Total budget for all probes of one endpoint scan, in seconds.
    pub probe_budget_secs: u64,
    /// Overall deadline for one scan request, in seconds. When it elapses,
    /// in-flight probes are canceled and partial results are returned.
    pub request_deadline_secs: u64,
    /// Maximum number of history entries kept; oldest evicted first.
    pub history_retention: usize,
    /// User-Agent sent on outbound requests.
    pub user_agent: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 5,
            max_manifest_bytes: 1_048_576,
            probe_timeout_secs: 3,
            probe_budget_secs: 10,
            request_deadline_secs: 15,
            history_retention: 500,
            user_agent: concat!("vigil/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl EngineConfig {
    /// Reject configurations that would disable the engine's resource
    /// bounds or break the probe timing hierarchy.
    pub fn validate(&self) -> Result<(), String> {
        if self.fetch_timeout_secs == 0 || self.probe_timeout_secs == 0 {
            return Err("timeouts must be non-zero".into());
        }
        if self.max_manifest_bytes == 0 || self.max_manifest_bytes > 16 * 1_048_576 {
            return Err("max_manifest_bytes must be between 1 and 16 MiB".into());
        }
        if self.probe_timeout_secs > self.probe_budget_secs {
            return Err("probe_timeout_secs exceeds probe_budget_secs".into());
        }
        if self.probe_budget_secs > self.request_deadline_secs {
            return Err("probe_budget_secs exceeds request_deadline_secs".into());
        }
        if self.history_retention == 0 {
            return Err("history_retention must be at least 1".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = EngineConfig {
            fetch_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_probe_budget_rejected() {
        let config = EngineConfig {
            probe_timeout_secs: 20,
            probe_budget_secs: 10,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_manifest_cap_rejected() {
        let config = EngineConfig {
            max_manifest_bytes: 64 * 1_048_576,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_retention_rejected() {
        let config = EngineConfig {
            history_retention: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
