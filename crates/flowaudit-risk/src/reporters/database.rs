//! Database reporter: unsafe dynamic SQL composition.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use super::{AuditContext, SectionCollector};
use crate::classifiers;
use crate::expression::{ParamValue, classify, lookup};
use crate::report::{RiskCategory, RiskSection, SectionKind};

/// Positional parameter markers (`$1`, `$2`, ...).
static POSITIONAL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\d+").expect("static positional marker pattern"));

/// Sections for every query-executing node, in corpus order.
///
/// Only nodes in [`classifiers::SQL_NODE_TYPES`] are inspected.
pub fn report(ctx: &AuditContext<'_>) -> Vec<RiskSection> {
    let mut sections = SectionCollector::new(RiskCategory::Database);
    let mut inspected = 0usize;

    for (workflow, node) in ctx.nodes() {
        if !classifiers::is_sql_node(&node.node_type) {
            continue;
        }
        inspected += 1;

        let query = node.param("query");
        if query.map(classify).is_some_and(|q| q.is_expression()) {
            sections.flag_node(SectionKind::ExpressionsInQueries, workflow, node);
        }

        let Some(path) = classifiers::query_params_path(&node.node_type) else {
            continue;
        };
        let query_params = lookup(&node.parameters, path).map(classify);

        if query_params.is_some_and(|p| p.is_expression()) {
            sections.flag_node(SectionKind::ExpressionsInQueryParams, workflow, node);
        } else if has_positional_markers(query) && !is_supplied(query_params) {
            sections.flag_node(SectionKind::UnusedQueryParams, workflow, node);
        }
    }

    let sections = sections.finish();
    debug!(
        inspected,
        sections = sections.len(),
        "database reporter finished"
    );
    sections
}

fn has_positional_markers(query: Option<&Value>) -> bool {
    query
        .and_then(Value::as_str)
        .is_some_and(|q| POSITIONAL_MARKER.is_match(q))
}

fn is_supplied(value: Option<ParamValue<'_>>) -> bool {
    match value {
        None => false,
        Some(ParamValue::Expression(_)) => true,
        Some(ParamValue::Literal(Value::Null)) => false,
        Some(ParamValue::Literal(Value::String(s))) => !s.trim().is_empty(),
        Some(ParamValue::Literal(_)) => true,
        Some(ParamValue::Structured(Value::Array(items))) => !items.is_empty(),
        Some(ParamValue::Structured(Value::Object(map))) => !map.is_empty(),
        Some(ParamValue::Structured(_)) => true,
    }
}
