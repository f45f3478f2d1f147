//! Engine-level guarantees: ordering, determinism, and category independence.

mod common;

use std::sync::Arc;
use std::thread;

use common::{create_node, create_workflow};
use flowaudit_risk::{AuditEngine, CategorySelection, RiskCategory, SectionKind};
use flowaudit_types::{AuditConfig, AuditCorpus, CredentialRecord, FlowauditError};
use serde_json::json;

/// A corpus that produces findings in every category.
fn mixed_corpus() -> AuditCorpus {
    let mut shared = create_workflow(vec![
        create_node("n8n-nodes-base.webhook", "Hook", "hook", json!({ "path": "in" })),
        create_node(
            "n8n-nodes-base.postgres",
            "Lookup",
            "pg",
            json!({ "query": "=SELECT * FROM {{ $json.table }} WHERE id = $1" }),
        ),
        create_node(
            "n8n-nodes-base.writeBinaryFile",
            "Dump",
            "dump",
            json!({ "fileName": "=/var/data/{{ $json.name }}" }),
        ),
        create_node("n8n-nodes-base.function", "Legacy", "fn", json!({ "functionCode": "return items;" })),
        create_node(
            "n8n-nodes-base.httpRequest",
            "Call",
            "http",
            json!({ "url": "https://api.example.com", "apiKey": "live-key-123" }),
        ),
    ]);
    shared.meta.owners = vec!["alice".into(), "bob".into()];
    shared.nodes[1].credentials.insert(
        "postgres".into(),
        flowaudit_types::CredentialRef {
            id: "cred-1".into(),
            name: Some("Prod".into()),
        },
    );

    let other = create_workflow(vec![
        create_node("n8n-nodes-base.manualTrigger", "Start", "start", json!({})),
        create_node("n8n-nodes-community.scraper", "Scrape", "scrape", json!({})),
    ]);

    AuditCorpus {
        workflows: vec![shared, other],
        credentials: vec![CredentialRecord {
            id: "orphan".into(),
            name: "Old token".into(),
            credential_type: "httpHeaderAuth".into(),
        }],
        as_of: None,
    }
}

fn weak_instance() -> AuditConfig {
    let mut config = AuditConfig::default();
    config.instance.user_management_enabled = false;
    config.nodes.denylist = vec!["n8n-nodes-base.httpRequest".into()];
    config
}

#[test]
fn all_categories_in_fixed_order() {
    let reports = AuditEngine::new(weak_instance()).run(&CategorySelection::All, &mixed_corpus());
    let risks: Vec<_> = reports.iter().map(|r| r.risk).collect();
    assert_eq!(risks, RiskCategory::ALL.to_vec());

    for report in &reports {
        assert!(!report.sections.is_empty());
        for section in &report.sections {
            assert!(!section.location.is_empty());
            assert_eq!(section.id.category(), report.risk);
        }
    }
}

#[test]
fn request_order_does_not_matter() {
    let engine = AuditEngine::default();
    let corpus = mixed_corpus();
    let a = engine.run_named(&["nodes", "database"], &corpus).unwrap();
    let b = engine.run_named(&["database", "nodes"], &corpus).unwrap();
    assert_eq!(a, b);
    assert_eq!(a[0].risk, RiskCategory::Database);
}

#[test]
fn database_alone_matches_database_within_all() {
    let engine = AuditEngine::new(weak_instance());
    let corpus = mixed_corpus();
    let alone = engine.run_named(&["database"], &corpus).unwrap();
    let all = engine.run(&CategorySelection::All, &corpus);

    let from_all = all.iter().find(|r| r.risk == RiskCategory::Database).unwrap();
    assert_eq!(alone.len(), 1);
    assert_eq!(&alone[0], from_all);
}

#[test]
fn repeated_runs_are_byte_identical() {
    let engine = AuditEngine::new(weak_instance());
    let corpus = mixed_corpus();
    let first = serde_json::to_string(&engine.run(&CategorySelection::All, &corpus)).unwrap();
    let second = serde_json::to_string(&engine.run(&CategorySelection::All, &corpus)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn parallel_and_sequential_agree() {
    let corpus = mixed_corpus();
    let mut sequential = weak_instance();
    sequential.parallel = false;

    let par = AuditEngine::new(weak_instance()).run(&CategorySelection::All, &corpus);
    let seq = AuditEngine::new(sequential).run(&CategorySelection::All, &corpus);
    assert_eq!(par, seq);
}

#[test]
fn unknown_category_rejected_before_running() {
    let err = AuditEngine::default()
        .run_named(&["database", "dns"], &mixed_corpus())
        .unwrap_err();
    assert!(matches!(err, FlowauditError::UnknownCategory { .. }));
}

#[test]
fn instance_settings_use_other_locations() {
    let reports = AuditEngine::new(weak_instance())
        .run_named(&["instance"], &mixed_corpus())
        .unwrap();
    let section = reports[0].section(SectionKind::SecuritySettings).unwrap();
    let value = serde_json::to_value(&section.location[0]).unwrap();
    assert_eq!(value["kind"], "other");
    assert!(value["description"].as_str().unwrap().contains("User management"));
}

#[test]
fn node_may_appear_in_several_categories() {
    let reports = AuditEngine::new(weak_instance()).run(&CategorySelection::All, &mixed_corpus());
    let hits = reports
        .iter()
        .flat_map(|r| &r.sections)
        .filter(|s| s.location.iter().any(|l| l.node_id() == Some("http")))
        .count();
    // plaintext secret, denylisted, official risky
    assert_eq!(hits, 3);
}

#[test]
fn oversized_abandonment_window_is_fail_open() {
    let mut corpus = mixed_corpus();
    corpus.as_of = Some(chrono::Utc::now());
    corpus.workflows[0].meta.updated_at = Some(chrono::Utc::now());
    corpus.credentials.push(CredentialRecord {
        id: "cred-1".into(),
        name: "Prod".into(),
        credential_type: "postgres".into(),
    });
    let mut config = weak_instance();
    config.credentials.days_abandoned_workflow = 200_000_000;

    let reports = AuditEngine::new(config).run(&CategorySelection::All, &corpus);
    assert_eq!(reports.len(), RiskCategory::ALL.len());
    assert!(reports[0].section(SectionKind::CredentialsInAbandonedWorkflows).is_none());
}

#[test]
fn concurrent_runs_are_independent() {
    let engine = Arc::new(AuditEngine::new(weak_instance()));
    let expected = engine.run(&CategorySelection::All, &mixed_corpus());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.run(&CategorySelection::All, &mixed_corpus()))
        })
        .collect();

    for handle in handles {
        let got = handle.join().expect("audit thread panicked");
        assert_eq!(got.len(), expected.len());
        for (g, e) in got.iter().zip(&expected) {
            assert_eq!(g.risk, e.risk);
            assert_eq!(g.sections.len(), e.sections.len());
        }
    }
}
