//! Credentials reporter.
//!
//! Node-level sections look for secrets kept outside the credential
//! mechanism and for credentials reachable by several users. Inventory
//! sections compare the credential store against workflow usage and are
//! skipped when the corpus carries no inventory.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, TimeDelta, Utc};
use flowaudit_types::{Node, WorkflowDefinition};
use tracing::{debug, warn};

use super::{AuditContext, SectionCollector};
use crate::classifiers::SecretPatterns;
use crate::expression::classify;
use crate::report::{RiskCategory, RiskSection, SectionKind};

/// How the corpus uses one credential.
#[derive(Debug, Default)]
struct Usage {
    in_active: bool,
    /// Most recent `updated_at` among dated referencing workflows.
    latest_update: Option<DateTime<Utc>>,
    has_undated: bool,
}

/// Rule id reported when a parameter name alone marks a secret.
const SECRET_NAME_RULE: (&str, &str) = ("SK-001", "Secret parameter name");

/// Which parameter of a node holds a plaintext secret, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SecretHit<'a> {
    parameter: &'a str,
    rule_id: &'static str,
    rule: &'static str,
}

/// Sections for plaintext secrets, shared credentials, and credential
/// inventory hygiene.
pub fn report(ctx: &AuditContext<'_>) -> Vec<RiskSection> {
    let mut sections = SectionCollector::new(RiskCategory::Credentials);

    for (workflow, node) in ctx.nodes() {
        if let Some(hit) = plaintext_secret(node, ctx.secrets) {
            debug!(
                workflow = %workflow.id,
                node = %node.id,
                parameter = hit.parameter,
                rule_id = hit.rule_id,
                rule = hit.rule,
                "plaintext secret"
            );
            sections.flag_node(SectionKind::PlaintextSecrets, workflow, node);
        }
        if workflow.is_shared() && node.has_credentials() {
            sections.flag_node(SectionKind::SharedWorkflowCredentials, workflow, node);
        }
    }

    if !ctx.corpus.credentials.is_empty() {
        let usage = credential_usage(&ctx.corpus.workflows);
        let cutoff = ctx
            .corpus
            .as_of
            .and_then(|as_of| abandonment_cutoff(as_of, ctx.config.credentials.days_abandoned_workflow));
        let mut seen_records = HashSet::new();

        for record in &ctx.corpus.credentials {
            if !seen_records.insert(record.id.as_str()) {
                continue;
            }
            let Some(used) = usage.get(record.id.as_str()) else {
                sections.flag_other(SectionKind::CredentialsNotUsed, record.label());
                continue;
            };
            if !used.in_active {
                sections.flag_other(SectionKind::CredentialsNotUsedInActiveWorkflows, record.label());
            }
            if let Some(cutoff) = cutoff
                && is_abandoned(used, cutoff)
            {
                sections.flag_other(SectionKind::CredentialsInAbandonedWorkflows, record.label());
            }
        }
    }

    let sections = sections.finish();
    debug!(
        inventory = ctx.corpus.credentials.len(),
        sections = sections.len(),
        "credentials reporter finished"
    );
    sections
}

/// First top-level literal that either sits under a secret-looking name or
/// has a well-known token format.
fn plaintext_secret<'n>(node: &'n Node, secrets: &SecretPatterns) -> Option<SecretHit<'n>> {
    node.parameters.iter().find_map(|(key, value)| {
        let literal = classify(value).as_literal_str()?.trim();
        if literal.is_empty() {
            return None;
        }
        let (rule_id, rule) = if secrets.is_secret_key(key) {
            SECRET_NAME_RULE
        } else {
            let pattern = secrets.match_value(literal)?;
            (pattern.id, pattern.name)
        };
        Some(SecretHit {
            parameter: key.as_str(),
            rule_id,
            rule,
        })
    })
}

/// Oldest update that still counts as recent. `None` when the window
/// reaches past the representable time range, so nothing is abandoned.
fn abandonment_cutoff(as_of: DateTime<Utc>, days: u32) -> Option<DateTime<Utc>> {
    let cutoff = TimeDelta::try_days(i64::from(days)).and_then(|window| as_of.checked_sub_signed(window));
    if cutoff.is_none() {
        warn!(days, "abandonment window out of range, skipping abandoned credentials");
    }
    cutoff
}

fn credential_usage(workflows: &[WorkflowDefinition]) -> HashMap<&str, Usage> {
    let mut usage: HashMap<&str, Usage> = HashMap::new();
    for workflow in workflows {
        for id in workflow.credential_ids() {
            let entry = usage.entry(id).or_default();
            entry.in_active |= workflow.active;
            match workflow.meta.updated_at {
                Some(ts) => {
                    entry.latest_update = Some(entry.latest_update.map_or(ts, |prev| prev.max(ts)));
                }
                None => entry.has_undated = true,
            }
        }
    }
    usage
}

/// Every referencing workflow is dated and older than `cutoff`.
fn is_abandoned(usage: &Usage, cutoff: DateTime<Utc>) -> bool {
    !usage.has_undated && usage.latest_update.is_some_and(|ts| ts < cutoff)
}
