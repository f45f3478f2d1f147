//! Category reporters.
//!
//! Each reporter is a pure function from an [`AuditContext`] to the sections
//! of its category. [`report`] is the category -> reporter table; adding a
//! category to [`RiskCategory`] fails to compile until it is wired here.

pub mod credentials;
pub mod database;
pub mod filesystem;
pub mod instance;
pub mod nodes;

use std::collections::HashSet;

use flowaudit_types::{AuditConfig, AuditCorpus, Node, WorkflowDefinition};

use crate::classifiers::SecretPatterns;
use crate::report::{Location, RiskCategory, RiskSection, SectionKind};

/// Read-only inputs shared by every reporter.
#[derive(Debug, Clone, Copy)]
pub struct AuditContext<'a> {
    /// Workflows, credential inventory, and reference time.
    pub corpus: &'a AuditCorpus,
    /// Audit configuration.
    pub config: &'a AuditConfig,
    /// Compiled secret heuristics.
    pub secrets: &'a SecretPatterns,
}

impl<'a> AuditContext<'a> {
    /// Every node paired with its workflow, in corpus traversal order.
    pub fn nodes(&self) -> impl Iterator<Item = (&'a WorkflowDefinition, &'a Node)> + 'a {
        let corpus = self.corpus;
        corpus
            .workflows
            .iter()
            .flat_map(|wf| wf.nodes.iter().map(move |node| (wf, node)))
    }
}

/// Run the reporter for `category`.
pub fn report(category: RiskCategory, ctx: &AuditContext<'_>) -> Vec<RiskSection> {
    match category {
        RiskCategory::Credentials => credentials::report(ctx),
        RiskCategory::Database => database::report(ctx),
        RiskCategory::Filesystem => filesystem::report(ctx),
        RiskCategory::Instance => instance::report(ctx),
        RiskCategory::Nodes => nodes::report(ctx),
    }
}

/// Accumulates locations per section in emission order.
///
/// A node is recorded at most once per section, however many times a
/// reporter flags it.
pub(crate) struct SectionCollector {
    sections: Vec<(SectionKind, Vec<Location>)>,
    seen: HashSet<(SectionKind, String, String)>,
}

impl SectionCollector {
    /// Collector for the sections of `category`, in their declared order.
    pub(crate) fn new(category: RiskCategory) -> Self {
        Self {
            sections: category
                .sections()
                .iter()
                .map(|kind| (*kind, Vec::new()))
                .collect(),
            seen: HashSet::new(),
        }
    }

    /// Attribute `node` to `kind`.
    pub(crate) fn flag_node(&mut self, kind: SectionKind, workflow: &WorkflowDefinition, node: &Node) {
        if self
            .seen
            .insert((kind, workflow.id.clone(), node.id.clone()))
        {
            self.push(kind, Location::node(workflow, node));
        }
    }

    /// Attribute a free-form finding to `kind`.
    pub(crate) fn flag_other(&mut self, kind: SectionKind, description: impl Into<String>) {
        self.push(kind, Location::other(description));
    }

    fn push(&mut self, kind: SectionKind, location: Location) {
        if let Some((_, locations)) = self.sections.iter_mut().find(|(k, _)| *k == kind) {
            locations.push(location);
        }
    }

    /// Non-empty sections in declared order.
    pub(crate) fn finish(self) -> Vec<RiskSection> {
        self.sections
            .into_iter()
            .filter(|(_, locations)| !locations.is_empty())
            .map(|(kind, locations)| RiskSection::new(kind, locations))
            .collect()
    }
}
