use std::time::Duration;

use reqwest::Url;

use crate::config::EngineConfig;
use crate::errors::{with_retry, RetryConfig, VigilError};

/// Fetch manifest content from a URL with a bounded timeout and size cap.
///
/// The body is streamed and aborted as soon as it exceeds the cap, so a
/// hostile endpoint cannot exhaust memory by advertising a small
/// Content-Length and sending an unbounded body. Transient network errors
/// are retried once.
pub async fn fetch_manifest(
    http: &reqwest::Client,
    url: &Url,
    config: &EngineConfig,
) -> Result<String, VigilError> {
    let retry = RetryConfig { max_retries: 1 };
    with_retry("fetch_manifest", &retry, || fetch_once(http, url, config)).await
}

async fn fetch_once(
    http: &reqwest::Client,
    url: &Url,
    config: &EngineConfig,
) -> Result<String, VigilError> {
    let mut response = http
        .get(url.clone())
        .header(reqwest::header::ACCEPT, "application/json")
        .timeout(Duration::from_secs(config.fetch_timeout_secs))
        .send()
        .await
        .map_err(|e| VigilError::from_reqwest("manifest fetch", e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(VigilError::Fetch(format!(
            "manifest fetch returned status {}",
            status
        )));
    }

    let cap = config.max_manifest_bytes as usize;
    if let Some(len) = response.content_length() {
        if len > config.max_manifest_bytes {
            return Err(VigilError::Fetch(format!(
                "manifest exceeds size cap ({} > {} bytes)",
                len, config.max_manifest_bytes
            )));
        }
    }

    let mut body: Vec<u8> = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| VigilError::from_reqwest("manifest body", e))?
    {
        if body.len() + chunk.len() > cap {
            return Err(VigilError::Fetch(format!(
                "manifest exceeds size cap ({} bytes)",
                config.max_manifest_bytes
            )));
        }
        body.extend_from_slice(&chunk);
    }

    String::from_utf8(body).map_err(|_| VigilError::Parse("manifest is not valid UTF-8".into()))
}
