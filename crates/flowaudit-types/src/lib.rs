//! # flowaudit-types
//!
//! Core type definitions for the flowaudit workflow risk auditor.
//!
//! This crate is the foundation of the dependency graph -- the audit engine
//! and the CLI both depend on it. It contains:
//!
//! - **[`error`]** -- [`FlowauditError`] and the crate [`Result`] alias
//! - **[`workflow`]** -- Workflow definitions, nodes, and connections
//! - **[`credential`]** -- Credential references and the inventory record
//! - **[`corpus`]** -- The input bundle handed to one audit run
//! - **[`config`]** -- Audit configuration schema

pub mod config;
pub mod corpus;
pub mod credential;
pub mod error;
pub mod workflow;

pub use config::AuditConfig;
pub use corpus::AuditCorpus;
pub use credential::{CredentialRecord, CredentialRef};
pub use error::{FlowauditError, Result};
pub use workflow::{ConnectionTarget, Node, WorkflowDefinition, WorkflowMeta};
