use std::path::Path;

use super::types::EngineConfig;
use crate::errors::VigilError;

pub async fn parse_config(path: &Path) -> Result<EngineConfig, VigilError> {
    if !path.exists() {
        return Err(VigilError::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(VigilError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let config: EngineConfig = serde_yaml::from_str(&content)?;

    config.validate().map_err(VigilError::Config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_parse_missing_file() {
        let result = parse_config(Path::new("/nonexistent/vigil.yaml")).await;
        assert!(matches!(result, Err(VigilError::Config(_))));
    }

    #[tokio::test]
    async fn test_parse_partial_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fetch_timeout_secs: 2\nhistory_retention: 50").unwrap();

        let config = parse_config(file.path()).await.unwrap();
        assert_eq!(config.fetch_timeout_secs, 2);
        assert_eq!(config.history_retention, 50);
        // Unnamed fields keep their defaults
        assert_eq!(config.probe_timeout_secs, 3);
    }

    #[tokio::test]
    async fn test_parse_rejects_invalid_bounds() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "probe_timeout_secs: 30\nprobe_budget_secs: 10").unwrap();

        let result = parse_config(file.path()).await;
        assert!(matches!(result, Err(VigilError::Config(_))));
    }

    #[tokio::test]
    async fn test_parse_rejects_malformed_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fetch_timeout_secs: [not a number").unwrap();

        let result = parse_config(file.path()).await;
        assert!(result.is_err());
    }
}
