//! Nodes reporter: denylisted, deprecated, risky, and community node types.

use tracing::debug;

use super::{AuditContext, SectionCollector};
use crate::classifiers;
use crate::report::{RiskCategory, RiskSection, SectionKind};

/// Sections for node types the operator or the platform considers risky.
pub fn report(ctx: &AuditContext<'_>) -> Vec<RiskSection> {
    let mut sections = SectionCollector::new(RiskCategory::Nodes);
    let policy = &ctx.config.nodes;

    for (workflow, node) in ctx.nodes() {
        let node_type = node.node_type.as_str();

        if policy.is_denylisted(node_type) {
            sections.flag_node(SectionKind::DenylistedNodes, workflow, node);
        }
        if classifiers::deprecated_replacement(node_type).is_some() {
            sections.flag_node(SectionKind::DeprecatedNodes, workflow, node);
        }
        if classifiers::is_official_risky(node_type) {
            sections.flag_node(SectionKind::OfficialRiskyNodes, workflow, node);
        }
        if !classifiers::is_official(node_type) && !policy.is_allowed_community(node_type) {
            sections.flag_node(SectionKind::CommunityNodes, workflow, node);
        }
    }

    let sections = sections.finish();
    debug!(sections = sections.len(), "nodes reporter finished");
    sections
}
