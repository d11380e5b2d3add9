use std::time::Duration;

use reqwest::Url;
use serde_json::{Map, Value};
use swh_bridge_core::ObjectKind;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://archive.softwareheritage.org";

const BASE_URL: &str = "base-url";
const AUTH_TOKEN: &str = "auth-token";
const KIND_PRIORITY: &str = "kind-priority";
const STRICT_WRITES: &str = "strict-writes";
const TIMEOUT_SECS: &str = "timeout-secs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Root of the archive's web API.
    pub base_url: Url,
    /// Sent as a bearer token with every request.
    pub auth_token: Option<String>,
    /// Probe order for Git object kinds, first known wins.
    pub kind_priority: Vec<ObjectKind>,
    /// Reject writes and queries instead of silently ignoring them.
    pub strict_writes: bool,
    pub timeout: Option<Duration>,
}

impl BridgeConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            auth_token: None,
            kind_priority: ObjectKind::GIT.to_vec(),
            strict_writes: false,
            timeout: None,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_kind_priority(mut self, kinds: Vec<ObjectKind>) -> Self {
        self.kind_priority = kinds;
        self
    }

    pub fn with_strict_writes(mut self, strict: bool) -> Self {
        self.strict_writes = strict;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Parses the parameters of a datastore spec entry.
    pub fn from_params(params: &Map<String, Value>) -> Result<Self, ConfigError> {
        let base_url = string_param(params, BASE_URL)?.unwrap_or(DEFAULT_BASE_URL);
        let base_url = Url::parse(base_url)?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(base_url));
        }

        let mut config = Self::new(base_url);

        config.auth_token = string_param(params, AUTH_TOKEN)?.map(str::to_string);

        if let Some(value) = params.get(KIND_PRIORITY) {
            config.kind_priority = parse_kind_priority(value)?;
        }

        if let Some(value) = params.get(STRICT_WRITES) {
            config.strict_writes = value.as_bool().ok_or_else(|| ConfigError::NotABool {
                key: STRICT_WRITES,
                value: value.clone(),
            })?;
        }

        if let Some(value) = params.get(TIMEOUT_SECS) {
            let secs = value
                .as_u64()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::NotAPositiveInteger {
                    key: TIMEOUT_SECS,
                    value: value.clone(),
                })?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

fn string_param<'a>(
    params: &'a Map<String, Value>,
    key: &'static str,
) -> Result<Option<&'a str>, ConfigError> {
    match params.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(ConfigError::NotAString {
            key,
            value: other.clone(),
        }),
    }
}

fn parse_kind_priority(value: &Value) -> Result<Vec<ObjectKind>, ConfigError> {
    let items = value.as_array().ok_or_else(|| ConfigError::NotAnArray {
        key: KIND_PRIORITY,
        value: value.clone(),
    })?;

    let mut kinds = Vec::with_capacity(items.len());

    for item in items {
        let tag = item.as_str().ok_or_else(|| ConfigError::NotAString {
            key: KIND_PRIORITY,
            value: item.clone(),
        })?;

        let kind: ObjectKind = tag
            .parse()
            .map_err(|_| ConfigError::InvalidKind(tag.to_string()))?;

        // Snapshots carry their own codec and are never probed alongside Git objects.
        if kind == ObjectKind::Snapshot {
            return Err(ConfigError::InvalidKind(tag.to_string()));
        }

        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    if kinds.is_empty() {
        return Err(ConfigError::EmptyKindPriority);
    }

    Ok(kinds)
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{key} {value} is not a string")]
    NotAString { key: &'static str, value: Value },
    #[error("{key} {value} is not a boolean")]
    NotABool { key: &'static str, value: Value },
    #[error("{key} {value} is not a positive integer")]
    NotAPositiveInteger { key: &'static str, value: Value },
    #[error("{key} {value} is not an array")]
    NotAnArray { key: &'static str, value: Value },
    #[error("invalid base-url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("base-url {0} is not an http(s) URL")]
    UnsupportedScheme(Url),
    #[error("kind-priority: {0:?} is not one of cnt, dir, rev, rel")]
    InvalidKind(String),
    #[error("kind-priority is empty")]
    EmptyKindPriority,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("params must be an object"),
        }
    }

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::from_params(&Map::new()).unwrap();
        assert_eq!(config.base_url.as_str(), "https://archive.softwareheritage.org/");
        assert_eq!(config.auth_token, None);
        assert_eq!(config.kind_priority, ObjectKind::GIT);
        assert!(!config.strict_writes);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_full() {
        let config = BridgeConfig::from_params(&params(json!({
            "base-url": "http://localhost:5080",
            "auth-token": "secret",
            "kind-priority": ["rev", "cnt"],
            "strict-writes": true,
            "timeout-secs": 30,
        })))
        .unwrap();

        assert_eq!(config.base_url.as_str(), "http://localhost:5080/");
        assert_eq!(config.auth_token.as_deref(), Some("secret"));
        assert_eq!(
            config.kind_priority,
            [ObjectKind::Revision, ObjectKind::Content]
        );
        assert!(config.strict_writes);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_wrong_types() {
        assert!(matches!(
            BridgeConfig::from_params(&params(json!({ "base-url": 42 }))),
            Err(ConfigError::NotAString { key: "base-url", .. })
        ));
        assert!(matches!(
            BridgeConfig::from_params(&params(json!({ "auth-token": ["a"] }))),
            Err(ConfigError::NotAString {
                key: "auth-token",
                ..
            })
        ));
        assert!(matches!(
            BridgeConfig::from_params(&params(json!({ "strict-writes": "yes" }))),
            Err(ConfigError::NotABool { .. })
        ));
        assert!(matches!(
            BridgeConfig::from_params(&params(json!({ "timeout-secs": 0 }))),
            Err(ConfigError::NotAPositiveInteger { .. })
        ));
    }

    #[test]
    fn test_bad_url() {
        assert!(matches!(
            BridgeConfig::from_params(&params(json!({ "base-url": "not a url" }))),
            Err(ConfigError::InvalidUrl(_))
        ));
        assert!(matches!(
            BridgeConfig::from_params(&params(json!({ "base-url": "ftp://example.org" }))),
            Err(ConfigError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_bad_kind_priority() {
        assert!(matches!(
            BridgeConfig::from_params(&params(json!({ "kind-priority": "cnt" }))),
            Err(ConfigError::NotAnArray { .. })
        ));
        assert!(matches!(
            BridgeConfig::from_params(&params(json!({ "kind-priority": ["snp"] }))),
            Err(ConfigError::InvalidKind(_))
        ));
        assert!(matches!(
            BridgeConfig::from_params(&params(json!({ "kind-priority": ["ori"] }))),
            Err(ConfigError::InvalidKind(_))
        ));
        assert!(matches!(
            BridgeConfig::from_params(&params(json!({ "kind-priority": [] }))),
            Err(ConfigError::EmptyKindPriority)
        ));
    }
}
