//! Filesystem reporter: host file access and expression-built paths.

use tracing::debug;

use super::{AuditContext, SectionCollector};
use crate::classifiers;
use crate::expression::is_expression;
use crate::report::{RiskCategory, RiskSection, SectionKind};

/// Sections for every filesystem node, in corpus order.
pub fn report(ctx: &AuditContext<'_>) -> Vec<RiskSection> {
    let mut sections = SectionCollector::new(RiskCategory::Filesystem);

    for (workflow, node) in ctx.nodes() {
        let Some(path_params) = classifiers::filesystem_path_params(&node.node_type) else {
            continue;
        };

        let dynamic_path = path_params
            .iter()
            .filter_map(|key| node.param(key))
            .any(is_expression);
        if dynamic_path {
            sections.flag_node(SectionKind::ExpressionsInFilePaths, workflow, node);
        }
        sections.flag_node(SectionKind::FilesystemInteraction, workflow, node);
    }

    let sections = sections.finish();
    debug!(sections = sections.len(), "filesystem reporter finished");
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::fixtures::{node, with_context, workflow};
    use flowaudit_types::{AuditConfig, AuditCorpus};
    use serde_json::json;

    fn run(nodes: Vec<flowaudit_types::Node>) -> Vec<RiskSection> {
        let corpus = AuditCorpus::from_workflows(vec![workflow("wf", nodes)]);
        with_context(&corpus, &AuditConfig::default(), report)
    }

    #[test]
    fn expression_path_flagged_in_both_sections() {
        let sections = run(vec![node(
            "read",
            "n8n-nodes-base.readBinaryFile",
            json!({ "filePath": "=/data/{{ $json.name }}" }),
        )]);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].id, SectionKind::ExpressionsInFilePaths);
        assert_eq!(sections[1].id, SectionKind::FilesystemInteraction);
    }

    #[test]
    fn any_path_param_counts() {
        let sections = run(vec![node(
            "rw",
            "n8n-nodes-base.readWriteFile",
            json!({ "fileSelector": "/static/*.csv", "fileName": "=/out/{{ $json.id }}.csv" }),
        )]);
        assert_eq!(sections[0].id, SectionKind::ExpressionsInFilePaths);
    }

    #[test]
    fn static_path_only_interaction() {
        let sections = run(vec![
            node("write", "n8n-nodes-base.writeBinaryFile", json!({ "fileName": "/tmp/out.bin" })),
            node("pdf", "n8n-nodes-base.readPdf", json!({})),
        ]);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].id, SectionKind::FilesystemInteraction);
        assert_eq!(sections[0].location.len(), 2);
    }

    #[test]
    fn other_nodes_ignored() {
        let sections = run(vec![node(
            "http",
            "n8n-nodes-base.httpRequest",
            json!({ "filePath": "={{ $json.p }}" }),
        )]);
        assert!(sections.is_empty());
    }
}
