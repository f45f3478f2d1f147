//! Risk taxonomy, report types, and the report aggregator.
//!
//! A [`RiskReport`] exists only for a category that produced at least one
//! non-empty [`RiskSection`]; [`aggregate`] enforces that.

use std::fmt;
use std::str::FromStr;

use flowaudit_types::{FlowauditError, Node, WorkflowDefinition};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Top-level risk category.
///
/// Declaration order is the fixed execution and output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Credentials,
    Database,
    Filesystem,
    Instance,
    Nodes,
}

impl RiskCategory {
    /// Every category, in execution order.
    pub const ALL: [RiskCategory; 5] = [
        Self::Credentials,
        Self::Database,
        Self::Filesystem,
        Self::Instance,
        Self::Nodes,
    ];

    /// Stable identifier used in selectors and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credentials => "credentials",
            Self::Database => "database",
            Self::Filesystem => "filesystem",
            Self::Instance => "instance",
            Self::Nodes => "nodes",
        }
    }

    /// Sections this category can emit, in emission order.
    pub fn sections(&self) -> &'static [SectionKind] {
        use SectionKind::*;
        match self {
            Self::Credentials => &[
                PlaintextSecrets,
                SharedWorkflowCredentials,
                CredentialsNotUsed,
                CredentialsNotUsedInActiveWorkflows,
                CredentialsInAbandonedWorkflows,
            ],
            Self::Database => &[
                ExpressionsInQueries,
                ExpressionsInQueryParams,
                UnusedQueryParams,
            ],
            Self::Filesystem => &[ExpressionsInFilePaths, FilesystemInteraction],
            Self::Instance => &[UnprotectedWebhooks, SecuritySettings],
            Self::Nodes => &[
                DenylistedNodes,
                DeprecatedNodes,
                OfficialRiskyNodes,
                CommunityNodes,
            ],
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskCategory {
    type Err = FlowauditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| FlowauditError::UnknownCategory {
                name: s.to_string(),
                expected: Self::ALL.map(|c| c.as_str()).join(", "),
            })
    }
}

/// A specific finding type within a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    // Credentials
    PlaintextSecrets,
    SharedWorkflowCredentials,
    CredentialsNotUsed,
    CredentialsNotUsedInActiveWorkflows,
    CredentialsInAbandonedWorkflows,
    // Database
    ExpressionsInQueries,
    ExpressionsInQueryParams,
    UnusedQueryParams,
    // Filesystem
    ExpressionsInFilePaths,
    FilesystemInteraction,
    // Instance
    UnprotectedWebhooks,
    SecuritySettings,
    // Nodes
    DenylistedNodes,
    DeprecatedNodes,
    OfficialRiskyNodes,
    CommunityNodes,
}

impl SectionKind {
    /// The category this section belongs to.
    pub fn category(&self) -> RiskCategory {
        use SectionKind::*;
        match self {
            PlaintextSecrets
            | SharedWorkflowCredentials
            | CredentialsNotUsed
            | CredentialsNotUsedInActiveWorkflows
            | CredentialsInAbandonedWorkflows => RiskCategory::Credentials,
            ExpressionsInQueries | ExpressionsInQueryParams | UnusedQueryParams => {
                RiskCategory::Database
            }
            ExpressionsInFilePaths | FilesystemInteraction => RiskCategory::Filesystem,
            UnprotectedWebhooks | SecuritySettings => RiskCategory::Instance,
            DenylistedNodes | DeprecatedNodes | OfficialRiskyNodes | CommunityNodes => {
                RiskCategory::Nodes
            }
        }
    }

    /// Section heading.
    pub fn title(&self) -> &'static str {
        use SectionKind::*;
        match self {
            PlaintextSecrets => "Secrets stored in plain node parameters",
            SharedWorkflowCredentials => "Credentials exposed through shared workflows",
            CredentialsNotUsed => "Credentials not used in any workflow",
            CredentialsNotUsedInActiveWorkflows => "Credentials not used in any active workflow",
            CredentialsInAbandonedWorkflows => "Credentials only used in abandoned workflows",
            ExpressionsInQueries => "Expressions in queries",
            ExpressionsInQueryParams => "Expressions in query params",
            UnusedQueryParams => "Unused query params",
            ExpressionsInFilePaths => "Expressions in file paths",
            FilesystemInteraction => "Nodes that interact with the filesystem",
            UnprotectedWebhooks => "Unprotected webhooks",
            SecuritySettings => "Security settings",
            DenylistedNodes => "Denylisted nodes",
            DeprecatedNodes => "Deprecated nodes",
            OfficialRiskyNodes => "Official risky nodes",
            CommunityNodes => "Community nodes",
        }
    }

    /// What the finding means.
    pub fn description(&self) -> &'static str {
        use SectionKind::*;
        match self {
            PlaintextSecrets => {
                "These nodes hold secret values directly in their parameters, where anyone who can view the workflow can read them."
            }
            SharedWorkflowCredentials => {
                "These nodes use credentials inside workflows shared with several users, each of whom can run the workflow with those credentials."
            }
            CredentialsNotUsed => "These credentials are not referenced by any workflow.",
            CredentialsNotUsedInActiveWorkflows => {
                "These credentials are referenced only by workflows that are not active."
            }
            CredentialsInAbandonedWorkflows => {
                "These credentials are referenced only by workflows that have not been updated recently."
            }
            ExpressionsInQueries => {
                "These SQL nodes build their query from an expression, which allows SQL injection when the expression includes input data."
            }
            ExpressionsInQueryParams => {
                "These SQL nodes fill their query parameters from an expression."
            }
            UnusedQueryParams => {
                "These SQL nodes use positional markers in their query but supply no query parameters."
            }
            ExpressionsInFilePaths => {
                "These nodes build a filesystem path from an expression, which allows path traversal when the expression includes input data."
            }
            FilesystemInteraction => "These nodes read from or write to the host filesystem.",
            UnprotectedWebhooks => "These webhook nodes accept requests without authentication.",
            SecuritySettings => "These instance settings weaken the security of the whole instance.",
            DenylistedNodes => "These nodes are of a type the operator has denylisted.",
            DeprecatedNodes => "These nodes are of a type that has been superseded.",
            OfficialRiskyNodes => {
                "These first-party nodes can run code, execute commands, or send arbitrary network requests."
            }
            CommunityNodes => {
                "These nodes come from community packages, which are not vetted by the platform."
            }
        }
    }

    /// Suggested remediation.
    pub fn recommendation(&self) -> &'static str {
        use SectionKind::*;
        match self {
            PlaintextSecrets => "Move these values into credentials and reference them from the node.",
            SharedWorkflowCredentials => {
                "Confirm every user sharing these workflows may use the credentials, or restrict sharing."
            }
            CredentialsNotUsed => "Consider deleting credentials that are no longer needed.",
            CredentialsNotUsedInActiveWorkflows => {
                "Consider deleting credentials that are no longer in active use."
            }
            CredentialsInAbandonedWorkflows => {
                "Review whether these workflows and their credentials are still needed."
            }
            ExpressionsInQueries => {
                "Use query parameters with positional markers instead of composing queries from expressions."
            }
            ExpressionsInQueryParams => {
                "Validate the input data that feeds the query parameters before it reaches the query."
            }
            UnusedQueryParams => {
                "Supply query parameters for every positional marker, or remove the markers."
            }
            ExpressionsInFilePaths => {
                "Validate or restrict the input data that makes up these paths, or use a fixed path."
            }
            FilesystemInteraction => {
                "Review these nodes and restrict filesystem access to the directories they need."
            }
            UnprotectedWebhooks => "Enable authentication on these webhooks.",
            SecuritySettings => "Review these settings and restore the secure default where possible.",
            DenylistedNodes => "Remove these nodes or replace them with an allowed alternative.",
            DeprecatedNodes => "Replace these nodes with their current equivalent.",
            OfficialRiskyNodes => {
                "Check that these nodes only run trusted code and reach trusted hosts."
            }
            CommunityNodes => "Review the source of these packages before using them.",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Where a finding was observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Location {
    /// A node inside a workflow.
    Node {
        workflow_id: String,
        workflow_name: String,
        node_id: String,
        node_name: String,
        node_type: String,
    },
    /// A finding not attributable to a single node.
    Other { description: String },
}

impl Location {
    /// Location of `node` inside `workflow`.
    pub fn node(workflow: &WorkflowDefinition, node: &Node) -> Self {
        Self::Node {
            workflow_id: workflow.id.clone(),
            workflow_name: workflow.display_name().to_string(),
            node_id: node.id.clone(),
            node_name: node.name.clone(),
            node_type: node.node_type.clone(),
        }
    }

    /// Free-form location.
    pub fn other(description: impl Into<String>) -> Self {
        Self::Other {
            description: description.into(),
        }
    }

    /// Node identifier, for node locations.
    pub fn node_id(&self) -> Option<&str> {
        match self {
            Self::Node { node_id, .. } => Some(node_id.as_str()),
            Self::Other { .. } => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node {
                workflow_name,
                node_name,
                node_type,
                ..
            } => write!(f, "{workflow_name} / {node_name} ({node_type})"),
            Self::Other { description } => f.write_str(description),
        }
    }
}

/// A finding type with its attributed locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSection {
    /// Stable section identifier.
    pub id: SectionKind,
    /// Section heading.
    pub title: String,
    /// What the finding means.
    pub description: String,
    /// Suggested remediation.
    pub recommendation: String,
    /// Attributed locations, in corpus traversal order.
    pub location: Vec<Location>,
}

impl RiskSection {
    /// Section of `kind` over `location`.
    pub fn new(kind: SectionKind, location: Vec<Location>) -> Self {
        Self {
            id: kind,
            title: kind.title().to_string(),
            description: kind.description().to_string(),
            recommendation: kind.recommendation().to_string(),
            location,
        }
    }
}

/// All findings of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskReport {
    /// Category identifier.
    pub risk: RiskCategory,
    /// Non-empty sections, in reporter order.
    pub sections: Vec<RiskSection>,
}

impl RiskReport {
    /// Section of the given kind, if present.
    pub fn section(&self, kind: SectionKind) -> Option<&RiskSection> {
        self.sections.iter().find(|s| s.id == kind)
    }

    /// Total locations across all sections.
    pub fn location_count(&self) -> usize {
        self.sections.iter().map(|s| s.location.len()).sum()
    }
}

/// Merge a reporter's sections into a report.
///
/// Drops empty sections and sections of another category, keeps the
/// remaining order untouched, and returns `None` when nothing is left.
pub fn aggregate(category: RiskCategory, sections: Vec<RiskSection>) -> Option<RiskReport> {
    let sections: Vec<RiskSection> = sections
        .into_iter()
        .filter(|section| {
            if section.id.category() != category {
                warn!(
                    category = %category,
                    section = ?section.id,
                    "dropping section emitted under the wrong category"
                );
                return false;
            }
            !section.location.is_empty()
        })
        .collect();

    if sections.is_empty() {
        None
    } else {
        Some(RiskReport {
            risk: category,
            sections,
        })
    }
}
