//! Static risk analysis for declarative automation workflows.
//!
//! Provides the audit engine behind `flowaudit audit`: five reporters, one per
//! risk category, each inspecting the declared shape of every workflow in a
//! corpus without executing anything.
//!
//! | Category | Sections |
//! |----------|----------|
//! | Credentials | plaintext secrets, shared-workflow credentials, unused / inactive / abandoned credentials |
//! | Database | expressions in queries, expressions in query params, unused query params |
//! | Filesystem | expressions in file paths, filesystem interaction |
//! | Instance | unprotected webhooks, security settings |
//! | Nodes | denylisted, deprecated, official risky, community nodes |
//!
//! Output is deterministic: categories in fixed order, sections in reporter
//! order, locations in corpus traversal order.
//!
//! [`extract_references`] and [`ParamValue::references`] are exported for
//! callers that want the `{{ }}` spans of a flagged parameter. The
//! reporters themselves only need [`is_expression`] and
//! [`expression::classify`].

pub mod classifiers;
pub mod engine;
pub mod expression;
pub mod report;
pub mod reporters;

pub use engine::{AuditEngine, CategorySelection};
pub use expression::{ParamValue, extract_references, is_expression};
pub use report::{Location, RiskCategory, RiskReport, RiskSection, SectionKind, aggregate};
