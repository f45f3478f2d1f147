//! Configuration file discovery and loading.
//!
//! The discovery order is:
//! 1. The `--config` flag.
//! 2. `FLOWAUDIT_CONFIG` environment variable.
//! 3. `~/.flowaudit/config.json`
//! 4. If none found, [`AuditConfig::default`].
//!
//! JSON keys are normalized from camelCase to snake_case before
//! deserialization.

use std::path::{Path, PathBuf};

use anyhow::Context;
use flowaudit_types::{AuditConfig, FlowauditError};
use serde_json::Value;

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "FLOWAUDIT_CONFIG";

/// Where a discovered config path came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Flag(PathBuf),
    Env(PathBuf),
    Home(PathBuf),
}

impl ConfigSource {
    fn path(&self) -> &Path {
        match self {
            Self::Flag(p) | Self::Env(p) | Self::Home(p) => p,
        }
    }
}

/// Discover the config file using the fallback chain.
///
/// The home path is only returned when it exists; flag and env paths are
/// returned as given and validated by the caller.
pub fn discover_config_path(
    explicit: Option<&Path>,
    env_value: Option<String>,
    home_dir: Option<PathBuf>,
) -> Option<ConfigSource> {
    if let Some(path) = explicit {
        return Some(ConfigSource::Flag(path.to_path_buf()));
    }

    if let Some(env_path) = env_value.filter(|v| !v.is_empty()) {
        return Some(ConfigSource::Env(PathBuf::from(env_path)));
    }

    let home_path = home_dir?.join(".flowaudit").join("config.json");
    home_path.exists().then_some(ConfigSource::Home(home_path))
}

/// Load the audit configuration for this process.
///
/// A missing `--config` file is an error. A missing env-named file falls
/// back to defaults with a warning.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<AuditConfig> {
    let source = discover_config_path(
        explicit,
        std::env::var(CONFIG_ENV_VAR).ok(),
        dirs::home_dir(),
    );

    let Some(source) = source else {
        tracing::info!("no config file found, using defaults");
        return Ok(AuditConfig::default());
    };

    let path = source.path();
    if !path.exists() {
        if let ConfigSource::Flag(_) = source {
            anyhow::bail!("config file does not exist: {}", path.display());
        }
        tracing::warn!(
            path = %path.display(),
            "config path does not exist, using defaults"
        );
        return Ok(AuditConfig::default());
    }

    tracing::debug!(path = %path.display(), "loading config file");
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("invalid config file {}", path.display()))
}

/// Parse config JSON, accepting camelCase or snake_case keys.
pub fn parse_config(contents: &str) -> anyhow::Result<AuditConfig> {
    let value: Value = serde_json::from_str(contents)?;
    if !value.is_object() {
        return Err(FlowauditError::ConfigInvalid {
            reason: "config root must be a JSON object".into(),
        }
        .into());
    }
    Ok(serde_json::from_value(normalize_keys(value))?)
}

/// Convert camelCase JSON keys to snake_case recursively.
///
/// Only object keys are rewritten; string values such as node types in the
/// denylist are left alone.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, val)| (camel_to_snake(&key), normalize_keys(val)))
                .collect(),
        ),
        Value::Array(arr) => Value::Array(arr.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

/// Convert a single camelCase string to snake_case.
///
/// A run of uppercase letters like `"API"` is kept together, with an
/// underscore inserted only before the last uppercase letter if it is
/// followed by a lowercase letter.
pub fn camel_to_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut result = String::with_capacity(name.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            if prev.is_lowercase()
                || (prev.is_uppercase() && next.is_some_and(|c| c.is_lowercase()))
            {
                result.push('_');
            }
        }
        result.push(ch.to_ascii_lowercase());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn camel_to_snake_cases() {
        assert_eq!(camel_to_snake("daysAbandonedWorkflow"), "days_abandoned_workflow");
        assert_eq!(camel_to_snake("publicApiEnabled"), "public_api_enabled");
        assert_eq!(camel_to_snake("already_snake"), "already_snake");
        assert_eq!(camel_to_snake("corsURLList"), "cors_url_list");
        assert_eq!(camel_to_snake("parallel"), "parallel");
    }

    #[test]
    fn normalize_keeps_values() {
        let value = normalize_keys(json!({
            "nodes": { "denylist": ["n8n-nodes-base.executeCommand"] },
            "instanceSettings": [{ "someKey": "someValue" }]
        }));
        assert_eq!(
            value,
            json!({
                "nodes": { "denylist": ["n8n-nodes-base.executeCommand"] },
                "instance_settings": [{ "some_key": "someValue" }]
            })
        );
    }

    #[test]
    fn parse_camel_case_config() {
        let config = parse_config(
            r#"{
                "instance": { "userManagementEnabled": false, "corsAllowedOrigins": ["*"] },
                "credentials": { "daysAbandonedWorkflow": 30 },
                "parallel": false
            }"#,
        )
        .unwrap();
        assert!(!config.instance.user_management_enabled);
        assert!(config.instance.cors_is_permissive());
        assert_eq!(config.credentials.days_abandoned_workflow, 30);
        assert!(!config.parallel);
    }

    #[test]
    fn parse_empty_object_gives_defaults() {
        let config = parse_config("{}").unwrap();
        assert!(config.instance.user_management_enabled);
        assert_eq!(config.credentials.days_abandoned_workflow, 90);
    }

    #[test]
    fn parse_rejects_non_object() {
        assert!(parse_config("[1, 2]").is_err());
        assert!(parse_config("not json").is_err());
    }

    #[test]
    fn flag_wins_over_env() {
        let source = discover_config_path(
            Some(Path::new("/tmp/flag.json")),
            Some("/tmp/env.json".into()),
            None,
        );
        assert_eq!(source, Some(ConfigSource::Flag("/tmp/flag.json".into())));
    }

    #[test]
    fn env_used_without_flag() {
        let source = discover_config_path(None, Some("/tmp/env.json".into()), None);
        assert_eq!(source, Some(ConfigSource::Env("/tmp/env.json".into())));
    }

    #[test]
    fn empty_env_ignored() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(discover_config_path(None, Some(String::new()), Some(dir.path().into())), None);
    }

    #[test]
    fn home_config_only_when_present() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(discover_config_path(None, None, Some(dir.path().into())), None);

        let cfg_dir = dir.path().join(".flowaudit");
        std::fs::create_dir_all(&cfg_dir).unwrap();
        std::fs::write(cfg_dir.join("config.json"), "{}").unwrap();
        assert_eq!(
            discover_config_path(None, None, Some(dir.path().into())),
            Some(ConfigSource::Home(cfg_dir.join("config.json")))
        );
    }

    #[test]
    fn missing_flag_path_is_error() {
        let err = load_config(Some(Path::new("/nonexistent/flowaudit.json"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
