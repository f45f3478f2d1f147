//! Credential references and inventory records.

use serde::{Deserialize, Serialize};

/// A node's pointer to a stored credential.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialRef {
    /// Credential identifier in the credential store.
    #[serde(default)]
    pub id: String,

    /// Display name at the time the node was saved.
    #[serde(default)]
    pub name: Option<String>,
}

/// One entry of the credential store inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialRecord {
    /// Credential identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Credential type, e.g. `postgres` or `slackApi`.
    #[serde(rename = "type", default)]
    pub credential_type: String,
}

impl CredentialRecord {
    /// Human-readable label used in report locations.
    pub fn label(&self) -> String {
        if self.credential_type.is_empty() {
            format!("{} (ID {})", self.name, self.id)
        } else {
            format!("{} [{}] (ID {})", self.name, self.credential_type, self.id)
        }
    }
}
