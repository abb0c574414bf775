use std::env;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_bool(profile: &str, key: &str) -> bool {
    profiled_env_opt(profile, key)
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub notify: NotifyConfig,
    pub aws: AwsConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `HERALD_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Result<Self, CoreError> {
        let profile = env_or("HERALD_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Result<Self, CoreError> {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Ok(Self {
            profile: p.to_string(),
            notify: NotifyConfig::from_env_profiled(p)?,
            aws: AwsConfig::from_env_profiled(p),
        })
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  rules:       file={}", self.notify.rules_file.display());
        tracing::info!("  host_info:   {} entries", self.notify.host_info.len());
        tracing::info!(
            "  publish:     dry_run={}, timeout={}s",
            self.notify.dry_run,
            self.notify.publish_timeout_secs
        );
        tracing::info!(
            "  aws:         region={}, static_credentials={}",
            self.aws.region,
            self.aws.has_static_credentials()
        );
    }
}

// ── Notifications ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// YAML document holding the `states` / `warnings` rule sections.
    pub rules_file: PathBuf,
    /// Rendered as the "Host Info" message section, in insertion order.
    pub host_info: IndexMap<String, String>,
    /// Log messages instead of publishing them.
    pub dry_run: bool,
    pub publish_timeout_secs: u64,
}

impl NotifyConfig {
    fn from_env_profiled(p: &str) -> Result<Self, CoreError> {
        let host_info = match profiled_env_opt(p, "HERALD_HOST_INFO") {
            Some(raw) => parse_host_info(&raw)?,
            None => IndexMap::new(),
        };
        Ok(Self {
            rules_file: PathBuf::from(profiled_env_or(
                p,
                "HERALD_RULES_FILE",
                "config/notifications.yaml",
            )),
            host_info,
            dry_run: profiled_env_bool(p, "HERALD_DRY_RUN"),
            publish_timeout_secs: profiled_env_u64(p, "HERALD_PUBLISH_TIMEOUT_SECS", 10),
        })
    }
}

/// Parse `key=value` pairs separated by commas, e.g. `region=eu-west-1,az=b`.
pub fn parse_host_info(raw: &str) -> Result<IndexMap<String, String>, CoreError> {
    let mut info = IndexMap::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (key, value) = entry.split_once('=').ok_or_else(|| CoreError::InvalidConfig {
            key: "HERALD_HOST_INFO".to_string(),
            message: format!("expected key=value, got '{entry}'"),
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(CoreError::InvalidConfig {
                key: "HERALD_HOST_INFO".to_string(),
                message: format!("empty key in '{entry}'"),
            });
        }
        info.insert(key.to_string(), value.trim().to_string());
    }
    Ok(info)
}

// ── AWS / SNS ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub endpoint_url: Option<String>,
}

impl AwsConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            region: profiled_env_or(p, "AWS_REGION", "us-east-1"),
            access_key_id: profiled_env_opt(p, "AWS_ACCESS_KEY_ID"),
            secret_access_key: profiled_env_opt(p, "AWS_SECRET_ACCESS_KEY"),
            session_token: profiled_env_opt(p, "AWS_SESSION_TOKEN"),
            endpoint_url: profiled_env_opt(p, "AWS_ENDPOINT_URL"),
        }
    }

    pub fn has_static_credentials(&self) -> bool {
        self.access_key_id.is_some() && self.secret_access_key.is_some()
    }
}
