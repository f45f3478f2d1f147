//! Instance reporter: unauthenticated entry points and weakened settings.
//!
//! Settings findings are not tied to a node and use `other` locations.

use flowaudit_types::Node;
use flowaudit_types::config::InstanceSettings;
use serde_json::Value;
use tracing::debug;

use super::{AuditContext, SectionCollector};
use crate::classifiers;
use crate::report::{RiskCategory, RiskSection, SectionKind};

/// Sections for webhook exposure and instance settings.
pub fn report(ctx: &AuditContext<'_>) -> Vec<RiskSection> {
    let mut sections = SectionCollector::new(RiskCategory::Instance);

    for (workflow, node) in ctx.nodes() {
        if classifiers::is_webhook(&node.node_type) && !requires_auth(node) {
            sections.flag_node(SectionKind::UnprotectedWebhooks, workflow, node);
        }
    }

    for finding in weakened_settings(&ctx.config.instance) {
        sections.flag_other(SectionKind::SecuritySettings, finding);
    }

    let sections = sections.finish();
    debug!(sections = sections.len(), "instance reporter finished");
    sections
}

/// Absent or `none` authentication means the endpoint is open. Any other
/// value, including an expression, is taken as configured auth.
fn requires_auth(node: &Node) -> bool {
    match node.param("authentication") {
        None | Some(Value::Null) => false,
        Some(Value::String(mode)) => !mode.is_empty() && mode != "none",
        Some(_) => true,
    }
}

fn weakened_settings(settings: &InstanceSettings) -> Vec<String> {
    let mut findings = Vec::new();
    if !settings.user_management_enabled {
        findings.push("User management is disabled: anyone reaching the instance has owner access".to_string());
    }
    if settings.cors_is_permissive() {
        findings.push("CORS policy allows requests from any origin".to_string());
    }
    if settings.public_api_enabled {
        findings.push("Public REST API is enabled".to_string());
    }
    if settings.community_packages_enabled {
        findings.push("Community packages can be installed on this instance".to_string());
    }
    if settings.diagnostics_enabled {
        findings.push("Diagnostics are sent to a third party".to_string());
    }
    if !settings.block_env_access_in_expressions {
        findings.push("Expressions can read process environment variables".to_string());
    }
    findings
}
