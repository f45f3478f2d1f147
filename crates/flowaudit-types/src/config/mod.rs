//! Audit configuration schema.
//!
//! All structs accept both `snake_case` and `camelCase` field names in JSON
//! via `#[serde(alias)]`. Unknown fields are silently ignored for forward
//! compatibility, and every field has a default so an empty object is a
//! valid configuration.
//!
//! # Module Structure
//!
//! - [`instance`] -- Process-wide settings inspected by the instance reporter
//! - [`policies`] -- Node denylist and credential heuristics

pub mod instance;
pub mod policies;

pub use instance::*;
pub use policies::*;

use serde::{Deserialize, Serialize};

/// Shared default function: returns `true`.
pub(crate) fn default_true() -> bool {
    true
}

/// Root configuration for an audit run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Settings of the instance the corpus was taken from.
    #[serde(default)]
    pub instance: InstanceSettings,

    /// Node type policy (denylist, allowed community packages).
    #[serde(default)]
    pub nodes: NodePolicyConfig,

    /// Credential heuristics.
    #[serde(default)]
    pub credentials: CredentialPolicyConfig,

    /// Run reporters on the rayon thread pool.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            instance: InstanceSettings::default(),
            nodes: NodePolicyConfig::default(),
            credentials: CredentialPolicyConfig::default(),
            parallel: true,
        }
    }
}
