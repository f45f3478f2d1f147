//! The input bundle for one audit run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::credential::CredentialRecord;
use crate::workflow::WorkflowDefinition;

/// Everything a single audit inspects.
///
/// Without `as_of`, time-based sections are skipped so that the audit
/// output stays a pure function of the workflows and inventory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditCorpus {
    /// Workflows in traversal order.
    #[serde(default)]
    pub workflows: Vec<WorkflowDefinition>,

    /// Credential store inventory. May be empty.
    #[serde(default)]
    pub credentials: Vec<CredentialRecord>,

    /// Reference instant for age-based checks.
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
}

impl AuditCorpus {
    /// Corpus made of workflows only.
    pub fn from_workflows(workflows: Vec<WorkflowDefinition>) -> Self {
        Self {
            workflows,
            ..Self::default()
        }
    }

    /// Total node count across all workflows.
    pub fn node_count(&self) -> usize {
        self.workflows.iter().map(|wf| wf.nodes.len()).sum()
    }
}
