//! Workflow definition types.
//!
//! These mirror the JSON shape of an exported workflow: a list of typed
//! nodes plus a connection map keyed by source node name. The audit engine
//! only reads them; nothing in flowaudit mutates a workflow.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::credential::CredentialRef;

/// A workflow as supplied by the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    /// Stable workflow identifier.
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: Option<String>,

    /// Whether the workflow is activated (its triggers are live).
    #[serde(default)]
    pub active: bool,

    /// Nodes in declaration order. Audit output follows this order.
    #[serde(default)]
    pub nodes: Vec<Node>,

    /// Source node name -> output kind (e.g. `main`) -> output slot -> targets.
    ///
    /// Kept for round-tripping exports; no audit section reads it.
    #[serde(default)]
    pub connections: BTreeMap<String, BTreeMap<String, Vec<Vec<ConnectionTarget>>>>,

    /// Ownership and bookkeeping metadata.
    #[serde(default)]
    pub meta: WorkflowMeta,
}

impl WorkflowDefinition {
    /// Display name, falling back to the identifier.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Whether more than one user has access to this workflow.
    pub fn is_shared(&self) -> bool {
        self.meta.owners.len() > 1
    }

    /// Identifiers of every credential referenced by any node, in node order.
    ///
    /// A credential referenced by several nodes is yielded once per reference.
    pub fn credential_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes
            .iter()
            .flat_map(|node| node.credentials.values())
            .map(|cred| cred.id.as_str())
    }
}

/// Ownership and bookkeeping metadata for a workflow.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowMeta {
    /// Users the workflow is shared with, owner first.
    #[serde(default)]
    pub owners: Vec<String>,

    /// Last modification time, when known.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One endpoint of a data edge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionTarget {
    /// Name of the destination node.
    pub node: String,

    /// Input kind on the destination node (usually `main`).
    #[serde(rename = "type", default = "default_connection_type")]
    pub connection_type: String,

    /// Input slot on the destination node.
    #[serde(default)]
    pub index: u32,
}

fn default_connection_type() -> String {
    "main".into()
}

/// A typed unit of work inside a workflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Identifier, unique within the owning workflow.
    pub id: String,

    /// Display name (also the key used by connections).
    pub name: String,

    /// Declared node type, e.g. `n8n-nodes-base.postgres`.
    #[serde(rename = "type")]
    pub node_type: String,

    /// Version of the node type, when recorded.
    #[serde(default)]
    pub type_version: Option<f64>,

    /// Parameter mapping. Values may be literals, objects, or expression strings.
    #[serde(default)]
    pub parameters: Map<String, Value>,

    /// Credential type -> credential reference.
    #[serde(default)]
    pub credentials: BTreeMap<String, CredentialRef>,
}

impl Node {
    /// Top-level parameter by name.
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.parameters.get(key)
    }

    /// Whether this node references any credential.
    pub fn has_credentials(&self) -> bool {
        !self.credentials.is_empty()
    }
}
