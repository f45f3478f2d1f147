//! Shared fixture builders for the audit integration tests.

#![allow(dead_code)]

use flowaudit_risk::{RiskCategory, RiskReport, RiskSection, SectionKind};
use flowaudit_types::{Node, WorkflowDefinition};
use serde_json::{Value, json};
use uuid::Uuid;

/// A node with the given type, name, id, and parameters.
pub fn create_node(node_type: &str, name: &str, id: &str, parameters: Value) -> Node {
    Node {
        id: id.into(),
        name: name.into(),
        node_type: node_type.into(),
        type_version: Some(1.0),
        parameters: parameters.as_object().cloned().unwrap_or_default(),
        credentials: Default::default(),
    }
}

/// A fresh workflow holding `nodes`.
pub fn create_workflow(nodes: Vec<Node>) -> WorkflowDefinition {
    let id = Uuid::new_v4().to_string();
    WorkflowDefinition {
        name: Some(format!("My Test Workflow {id}")),
        id,
        active: false,
        nodes,
        connections: Default::default(),
        meta: Default::default(),
    }
}

/// A workflow holding only a manual trigger.
pub fn manual_trigger_workflow() -> WorkflowDefinition {
    create_workflow(vec![create_node(
        "n8n-nodes-base.manualTrigger",
        "On clicking 'execute'",
        &Uuid::new_v4().to_string(),
        json!({}),
    )])
}

/// Find a section, panicking with context when absent.
pub fn get_risk_section<'a>(
    reports: &'a [RiskReport],
    risk: RiskCategory,
    kind: SectionKind,
) -> &'a RiskSection {
    let report = reports
        .iter()
        .find(|r| r.risk == risk)
        .unwrap_or_else(|| panic!("expected a {risk} report, got {reports:?}"));
    report
        .section(kind)
        .unwrap_or_else(|| panic!("expected section {kind:?} in {report:?}"))
}
