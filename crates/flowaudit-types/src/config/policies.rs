//! Node and credential policy configuration types.
//!
//! Defines [`NodePolicyConfig`] (operator denylist, trusted community
//! packages) and [`CredentialPolicyConfig`] (secret heuristics and
//! abandonment threshold).

use serde::{Deserialize, Serialize};

/// Node type policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodePolicyConfig {
    /// Node types that must not appear anywhere in the corpus.
    #[serde(default)]
    pub denylist: Vec<String>,

    /// Community package prefixes the operator has vetted
    /// (e.g. `n8n-nodes-acme.`). Matching nodes are not reported.
    #[serde(default, alias = "allowedCommunityPackages")]
    pub allowed_community_packages: Vec<String>,
}

impl NodePolicyConfig {
    /// Whether `node_type` is on the operator denylist.
    pub fn is_denylisted(&self, node_type: &str) -> bool {
        self.denylist.iter().any(|denied| denied == node_type)
    }

    /// Whether `node_type` belongs to a vetted community package.
    pub fn is_allowed_community(&self, node_type: &str) -> bool {
        self.allowed_community_packages
            .iter()
            .any(|prefix| node_type.starts_with(prefix.as_str()))
    }
}

/// Credential heuristics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialPolicyConfig {
    /// Workflows not updated for this many days count as abandoned.
    #[serde(default = "default_days_abandoned", alias = "daysAbandonedWorkflow")]
    pub days_abandoned_workflow: u32,

    /// Additional regexes matched against parameter names to flag
    /// secrets stored as plain parameters.
    #[serde(default, alias = "extraSecretKeyPatterns")]
    pub extra_secret_key_patterns: Vec<String>,
}

fn default_days_abandoned() -> u32 {
    90
}

impl Default for CredentialPolicyConfig {
    fn default() -> Self {
        Self {
            days_abandoned_workflow: default_days_abandoned(),
            extra_secret_key_patterns: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denylist_is_exact_match() {
        let policy = NodePolicyConfig {
            denylist: vec!["n8n-nodes-base.ssh".into()],
            ..NodePolicyConfig::default()
        };
        assert!(policy.is_denylisted("n8n-nodes-base.ssh"));
        assert!(!policy.is_denylisted("n8n-nodes-base.sshTunnel"));
    }

    #[test]
    fn community_allowlist_is_prefix_match() {
        let policy = NodePolicyConfig {
            allowed_community_packages: vec!["n8n-nodes-acme.".into()],
            ..NodePolicyConfig::default()
        };
        assert!(policy.is_allowed_community("n8n-nodes-acme.widget"));
        assert!(!policy.is_allowed_community("n8n-nodes-evil.widget"));
    }
}
