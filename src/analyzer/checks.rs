//! Static checks over a parsed agent card.
//!
//! Each check is independent, sees the whole document, and produces zero or
//! one issue. Checks never short-circuit each other; the runner in
//! [`super::analyze_card`] reports a check that fails internally as a
//! `check-skipped` issue and keeps going, so the issue set for a well-formed
//! card is always complete.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::errors::VigilError;
use crate::models::Issue;
use crate::taxonomy::IssueKind;
use crate::utils::truncate_snippet;

pub type CheckFn = fn(&Value) -> Result<Option<Issue>, VigilError>;

pub struct CheckDefinition {
    pub name: &'static str,
    pub run: CheckFn,
}

pub static CHECKS: &[CheckDefinition] = &[
    CheckDefinition {
        name: "capability-overreach",
        run: check_capability_overreach,
    },
    CheckDefinition {
        name: "prompt-injection",
        run: check_prompt_injection,
    },
    CheckDefinition {
        name: "description-length",
        run: check_description_length,
    },
    CheckDefinition {
        name: "rate-limit-declared",
        run: check_rate_limit_declared,
    },
    CheckDefinition {
        name: "version-declared",
        run: check_version_declared,
    },
    CheckDefinition {
        name: "contact-declared",
        run: check_contact_declared,
    },
    CheckDefinition {
        name: "card-authentication",
        run: check_card_authentication,
    },
    CheckDefinition {
        name: "endpoint-authentication",
        run: check_endpoint_authentication,
    },
    CheckDefinition {
        name: "endpoint-transport",
        run: check_endpoint_transport,
    },
];

const MIN_DESCRIPTION_LENGTH: usize = 20;

/// Grants that amount to arbitrary execution or unscoped system access.
const DANGEROUS_GRANT_TOKENS: &[&str] = &["exec", "shell", "eval", "sudo"];
const DANGEROUS_GRANT_EXACT: &[&str] = &[
    "filesystem",
    "fs_write",
    "file_write",
    "network_all",
    "admin",
    "root",
    "unrestricted",
];

static INJECTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)ignore\s+(all\s+|any\s+)?(previous|prior|earlier|above)\s+(instructions|prompts|rules|messages)",
        r"(?i)disregard\s+(all\s+|any\s+)?(previous|prior|earlier|system)",
        r"(?i)you\s+must\s+always\b",
        r"(?i)you\s+are\s+now\b",
        r"(?i)forget\s+(everything|all\s+previous|your\s+instructions)",
        r"(?i)(reveal|print|show)\s+(the\s+|your\s+)?system\s+prompt",
        r"(?i)override\s+(safety|security|system)",
        r"(?i)do\s+not\s+(tell|reveal|mention|inform)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid injection pattern"))
    .collect()
});

fn grant_is_dangerous(grant: &str) -> bool {
    let g = grant.trim().to_ascii_lowercase();
    DANGEROUS_GRANT_TOKENS.iter().any(|t| g.contains(t))
        || DANGEROUS_GRANT_EXACT.contains(&g.as_str())
}

/// Collect granted capability/permission names from either list form
/// (`["exec_shell", ...]`) or object form (`{"exec_shell": true, ...}`).
fn collect_grants(doc: &Value) -> Vec<String> {
    let mut grants = Vec::new();
    for field in ["capabilities", "permissions"] {
        match doc.get(field) {
            Some(Value::Array(items)) => {
                grants.extend(items.iter().filter_map(|v| v.as_str()).map(String::from));
            }
            Some(Value::Object(map)) => {
                grants.extend(
                    map.iter()
                        .filter(|(_, v)| v.as_bool().unwrap_or(true))
                        .map(|(k, _)| k.clone()),
                );
            }
            _ => {}
        }
    }
    grants
}

fn check_capability_overreach(doc: &Value) -> Result<Option<Issue>, VigilError> {
    let dangerous: Vec<String> = collect_grants(doc)
        .into_iter()
        .filter(|g| grant_is_dangerous(g))
        .collect();

    if dangerous.is_empty() {
        return Ok(None);
    }
    Ok(Some(Issue::new(
        IssueKind::ExcessivePrivilege,
        format!(
            "Manifest requests broad execution capability: {}",
            truncate_snippet(&dangerous.join(", "))
        ),
    )))
}

/// Free-text fields scanned for injection phrasing, with their paths for
/// the issue message.
fn free_text_fields(doc: &Value) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    for key in ["name", "description", "instructions"] {
        if let Some(text) = doc.get(key).and_then(|v| v.as_str()) {
            fields.push((key.to_string(), text.to_string()));
        }
    }
    if let Some(skills) = doc.get("skills").and_then(|v| v.as_array()) {
        for (i, skill) in skills.iter().enumerate() {
            for key in ["name", "description"] {
                if let Some(text) = skill.get(key).and_then(|v| v.as_str()) {
                    fields.push((format!("skills[{}].{}", i, key), text.to_string()));
                }
            }
        }
    }
    fields
}

fn check_prompt_injection(doc: &Value) -> Result<Option<Issue>, VigilError> {
    let mut matched_fields = Vec::new();
    for (path, text) in free_text_fields(doc) {
        if INJECTION_PATTERNS.iter().any(|re| re.is_match(&text)) {
            matched_fields.push(path);
        }
    }

    if matched_fields.is_empty() {
        return Ok(None);
    }
    Ok(Some(Issue::new(
        IssueKind::PromptInjectionPattern,
        format!(
            "Prompt-injection phrasing detected in manifest field(s): {}",
            matched_fields.join(", ")
        ),
    )))
}

fn check_description_length(doc: &Value) -> Result<Option<Issue>, VigilError> {
    match doc.get("description").and_then(|v| v.as_str()) {
        None => Ok(Some(Issue::new(
            IssueKind::ShortDescription,
            "Manifest has no description field",
        ))),
        Some(text) if text.trim().chars().count() < MIN_DESCRIPTION_LENGTH => {
            Ok(Some(Issue::new(
                IssueKind::ShortDescription,
                format!(
                    "Manifest description is under {} characters",
                    MIN_DESCRIPTION_LENGTH
                ),
            )))
        }
        Some(_) => Ok(None),
    }
}

fn check_rate_limit_declared(doc: &Value) -> Result<Option<Issue>, VigilError> {
    let declared = ["rate_limit", "rateLimit", "rate_limits", "rateLimits"]
        .iter()
        .any(|k| doc.get(*k).is_some());
    if declared {
        Ok(None)
    } else {
        Ok(Some(Issue::new(
            IssueKind::MissingRateLimit,
            "Manifest declares no rate limits",
        )))
    }
}

fn check_version_declared(doc: &Value) -> Result<Option<Issue>, VigilError> {
    let declared = doc
        .get("version")
        .and_then(|v| v.as_str())
        .map(|s| !s.trim().is_empty())
        .unwrap_or(false);
    if declared {
        Ok(None)
    } else {
        Ok(Some(Issue::new(
            IssueKind::MissingVersion,
            "Manifest declares no version",
        )))
    }
}

fn check_contact_declared(doc: &Value) -> Result<Option<Issue>, VigilError> {
    let top_level = ["contact", "contact_email", "contactEmail", "support_email"]
        .iter()
        .any(|k| doc.get(*k).is_some());
    let provider = doc
        .get("provider")
        .map(|p| p.get("email").is_some() || p.get("url").is_some())
        .unwrap_or(false);
    if top_level || provider {
        Ok(None)
    } else {
        Ok(Some(Issue::new(
            IssueKind::MissingContact,
            "Manifest declares no contact or provider information",
        )))
    }
}

fn card_declares_auth(doc: &Value) -> bool {
    [
        "authentication",
        "auth",
        "securitySchemes",
        "security_schemes",
    ]
    .iter()
    .any(|k| doc.get(*k).is_some())
}

fn check_card_authentication(doc: &Value) -> Result<Option<Issue>, VigilError> {
    if card_declares_auth(doc) {
        Ok(None)
    } else {
        Ok(Some(Issue::new(
            IssueKind::MissingAuthentication,
            "Manifest declares no authentication configuration",
        )))
    }
}

/// Endpoint entries may be plain URL strings or objects with url/auth keys.
fn endpoint_entries(doc: &Value) -> Vec<(Option<String>, bool)> {
    let Some(endpoints) = doc.get("endpoints").and_then(|v| v.as_array()) else {
        return Vec::new();
    };
    endpoints
        .iter()
        .map(|ep| match ep {
            Value::String(url) => (Some(url.clone()), false),
            Value::Object(map) => {
                let url = map.get("url").and_then(|v| v.as_str()).map(String::from);
                let has_auth = map.contains_key("auth") || map.contains_key("authentication");
                (url, has_auth)
            }
            _ => (None, false),
        })
        .collect()
}

fn check_endpoint_authentication(doc: &Value) -> Result<Option<Issue>, VigilError> {
    // Card-level auth is taken to cover all declared endpoints.
    if card_declares_auth(doc) {
        return Ok(None);
    }
    let unauthenticated: Vec<String> = endpoint_entries(doc)
        .into_iter()
        .filter(|(_, has_auth)| !has_auth)
        .map(|(url, _)| url.unwrap_or_else(|| "<no url>".into()))
        .collect();

    if unauthenticated.is_empty() {
        return Ok(None);
    }
    Ok(Some(Issue::new(
        IssueKind::UnauthenticatedEndpoint,
        format!(
            "Manifest declares endpoints without any authentication scheme: {}",
            truncate_snippet(&unauthenticated.join(", "))
        ),
    )))
}

fn check_endpoint_transport(doc: &Value) -> Result<Option<Issue>, VigilError> {
    let insecure: Vec<String> = endpoint_entries(doc)
        .into_iter()
        .filter_map(|(url, _)| url)
        .filter(|url| url.starts_with("http://"))
        .collect();

    if insecure.is_empty() {
        return Ok(None);
    }
    Ok(Some(Issue::new(
        IssueKind::InsecureEndpointUrl,
        format!(
            "Manifest declares plaintext HTTP endpoint(s): {}",
            truncate_snippet(&insecure.join(", "))
        ),
    )))
}
