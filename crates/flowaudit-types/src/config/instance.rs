//! Instance-wide settings inspected by the instance reporter.

use serde::{Deserialize, Serialize};

use super::default_true;

/// Process-wide settings of the automation server being audited.
///
/// Defaults describe a hardened instance, so an absent config produces no
/// security-settings findings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceSettings {
    /// Whether user accounts and login are enforced.
    #[serde(default = "default_true", alias = "userManagementEnabled")]
    pub user_management_enabled: bool,

    /// Origins allowed by the REST API CORS policy. `*` allows any origin.
    #[serde(default, alias = "corsAllowedOrigins")]
    pub cors_allowed_origins: Vec<String>,

    /// Whether the public REST API is exposed.
    #[serde(default, alias = "publicApiEnabled")]
    pub public_api_enabled: bool,

    /// Whether community node packages may be installed.
    #[serde(default, alias = "communityPackagesEnabled")]
    pub community_packages_enabled: bool,

    /// Whether diagnostics are sent to a third party.
    #[serde(default, alias = "diagnosticsEnabled")]
    pub diagnostics_enabled: bool,

    /// Whether expressions are blocked from reading process environment.
    #[serde(default = "default_true", alias = "blockEnvAccessInExpressions")]
    pub block_env_access_in_expressions: bool,
}

impl Default for InstanceSettings {
    fn default() -> Self {
        Self {
            user_management_enabled: true,
            cors_allowed_origins: Vec::new(),
            public_api_enabled: false,
            community_packages_enabled: false,
            diagnostics_enabled: false,
            block_env_access_in_expressions: true,
        }
    }
}

impl InstanceSettings {
    /// Whether the CORS policy admits any origin.
    pub fn cors_is_permissive(&self) -> bool {
        self.cors_allowed_origins
            .iter()
            .any(|origin| origin.trim() == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_origin_is_permissive() {
        let settings = InstanceSettings {
            cors_allowed_origins: vec!["https://app.example.com".into(), " * ".into()],
            ..InstanceSettings::default()
        };
        assert!(settings.cors_is_permissive());
    }

    #[test]
    fn explicit_origins_are_not_permissive() {
        let settings = InstanceSettings {
            cors_allowed_origins: vec!["https://app.example.com".into()],
            ..InstanceSettings::default()
        };
        assert!(!settings.cors_is_permissive());
    }
}
