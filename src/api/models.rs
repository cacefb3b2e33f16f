use serde::Deserialize;

/// Body of `POST /api/scan/card`. Exactly one of the two fields must be
/// present; the engine rejects anything else before scanning.
#[derive(Debug, Deserialize)]
pub struct CardScanRequest {
    pub url: Option<String>,
    pub json_content: Option<String>,
}

/// Body of `POST /api/scan/endpoint`.
#[derive(Debug, Deserialize)]
pub struct EndpointScanRequest {
    pub url: Option<String>,
}
