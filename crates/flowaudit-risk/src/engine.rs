//! Audit engine: the public entry point.
//!
//! The [`AuditEngine`] runs the reporters for a [`CategorySelection`] over an
//! [`AuditCorpus`] and returns one [`RiskReport`] per category with findings.

use std::collections::BTreeSet;

use flowaudit_types::{AuditConfig, AuditCorpus, Result};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::classifiers::{CLASSIFIER_VERSION, SecretPatterns};
use crate::report::{RiskCategory, RiskReport, aggregate};
use crate::reporters::{self, AuditContext};

/// Which categories an audit covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategorySelection {
    /// Every known category.
    #[default]
    All,
    /// A subset. Order and duplicates in the request do not matter.
    Only(BTreeSet<RiskCategory>),
}

impl CategorySelection {
    /// Parse category identifiers. An empty list selects all categories.
    ///
    /// Any unknown identifier rejects the whole selection.
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        if names.is_empty() {
            return Ok(Self::All);
        }
        let categories = names
            .iter()
            .map(|name| name.as_ref().parse::<RiskCategory>())
            .collect::<Result<BTreeSet<_>>>()?;
        Ok(Self::Only(categories))
    }

    /// Selected categories in execution order.
    pub fn categories(&self) -> Vec<RiskCategory> {
        match self {
            Self::All => RiskCategory::ALL.to_vec(),
            Self::Only(set) => set.iter().copied().collect(),
        }
    }
}

impl FromIterator<RiskCategory> for CategorySelection {
    fn from_iter<I: IntoIterator<Item = RiskCategory>>(iter: I) -> Self {
        Self::Only(iter.into_iter().collect())
    }
}

/// Runs category reporters over a corpus.
///
/// Holds no per-run state, so one engine may serve concurrent audits.
#[derive(Debug, Clone)]
pub struct AuditEngine {
    config: AuditConfig,
    secrets: SecretPatterns,
}

impl AuditEngine {
    /// Create an engine, compiling the configured secret heuristics once.
    pub fn new(config: AuditConfig) -> Self {
        let secrets = SecretPatterns::new(&config.credentials.extra_secret_key_patterns);
        Self { config, secrets }
    }

    /// Audit `corpus` for the selected categories.
    ///
    /// Reports come back in fixed category order; categories without
    /// findings are absent.
    pub fn run(&self, selection: &CategorySelection, corpus: &AuditCorpus) -> Vec<RiskReport> {
        let categories = selection.categories();
        let ctx = AuditContext {
            corpus,
            config: &self.config,
            secrets: &self.secrets,
        };

        info!(
            workflows = corpus.workflows.len(),
            nodes = corpus.node_count(),
            categories = ?categories,
            classifier_version = CLASSIFIER_VERSION,
            "starting audit"
        );

        let run_one = |category: &RiskCategory| {
            let sections = reporters::report(*category, &ctx);
            debug!(category = %category, sections = sections.len(), "reporter done");
            aggregate(*category, sections)
        };

        let reports: Vec<Option<RiskReport>> = if self.config.parallel && categories.len() > 1 {
            categories.par_iter().map(run_one).collect()
        } else {
            categories.iter().map(run_one).collect()
        };
        let reports: Vec<RiskReport> = reports.into_iter().flatten().collect();

        info!(
            reports = reports.len(),
            locations = reports.iter().map(RiskReport::location_count).sum::<usize>(),
            "audit complete"
        );
        reports
    }

    /// Parse `names` and audit. Unknown names fail before any reporter runs.
    pub fn run_named<S: AsRef<str>>(&self, names: &[S], corpus: &AuditCorpus) -> Result<Vec<RiskReport>> {
        let selection = CategorySelection::parse(names)?;
        Ok(self.run(&selection, corpus))
    }
}

impl Default for AuditEngine {
    fn default() -> Self {
        Self::new(AuditConfig::default())
    }
}
