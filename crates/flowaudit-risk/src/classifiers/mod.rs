//! Node type classifier tables.
//!
//! Every reporter that needs to know "is this node database-like" or "does
//! this node touch the filesystem" consults these tables and nothing else.
//! Bump [`CLASSIFIER_VERSION`] whenever a table changes so stored audit
//! results can be compared against the classifier set that produced them.

mod secrets;

pub use secrets::{SecretPattern, SecretPatterns};

/// Version of the classifier tables below.
pub const CLASSIFIER_VERSION: u32 = 3;

/// Nodes that execute a raw query against a datastore.
pub const SQL_NODE_TYPES: &[&str] = &[
    "n8n-nodes-base.postgres",
    "n8n-nodes-base.crateDb",
    "n8n-nodes-base.questDb",
    "n8n-nodes-base.timescaleDb",
    "n8n-nodes-base.mySql",
    "n8n-nodes-base.microsoftSql",
    "n8n-nodes-base.snowflake",
];

/// Raw-query nodes that also accept a query-parameters field, mapped to
/// that field's parameter path.
pub const SQL_NODE_TYPES_WITH_QUERY_PARAMS: &[(&str, &[&str])] = &[
    ("n8n-nodes-base.postgres", &["additionalFields", "queryParams"]),
    ("n8n-nodes-base.crateDb", &["additionalFields", "queryParams"]),
    ("n8n-nodes-base.questDb", &["additionalFields", "queryParams"]),
    ("n8n-nodes-base.timescaleDb", &["additionalFields", "queryParams"]),
];

/// Nodes that read or write the local filesystem, mapped to their
/// top-level path parameters.
pub const FILESYSTEM_NODE_TYPES: &[(&str, &[&str])] = &[
    ("n8n-nodes-base.readBinaryFile", &["filePath"]),
    ("n8n-nodes-base.readBinaryFiles", &["fileSelector"]),
    ("n8n-nodes-base.writeBinaryFile", &["fileName"]),
    ("n8n-nodes-base.readWriteFile", &["fileSelector", "fileName"]),
    ("n8n-nodes-base.localFileTrigger", &["path"]),
    ("n8n-nodes-base.readPdf", &[]),
    ("n8n-nodes-base.spreadsheetFile", &[]),
];

/// First-party nodes that run code, shell commands, or arbitrary
/// network requests.
pub const OFFICIAL_RISKY_NODE_TYPES: &[&str] = &[
    "n8n-nodes-base.executeCommand",
    "n8n-nodes-base.code",
    "n8n-nodes-base.function",
    "n8n-nodes-base.functionItem",
    "n8n-nodes-base.ssh",
    "n8n-nodes-base.ftp",
    "n8n-nodes-base.httpRequest",
];

/// Superseded node types, mapped to their replacement.
pub const DEPRECATED_NODE_TYPES: &[(&str, &str)] = &[
    ("n8n-nodes-base.function", "n8n-nodes-base.code"),
    ("n8n-nodes-base.functionItem", "n8n-nodes-base.code"),
    ("n8n-nodes-base.readBinaryFile", "n8n-nodes-base.readWriteFile"),
    ("n8n-nodes-base.readBinaryFiles", "n8n-nodes-base.readWriteFile"),
    ("n8n-nodes-base.writeBinaryFile", "n8n-nodes-base.readWriteFile"),
    (
        "n8n-nodes-base.spreadsheetFile",
        "n8n-nodes-base.convertToFile / n8n-nodes-base.extractFromFile",
    ),
];

/// Triggers that expose an inbound HTTP endpoint.
pub const WEBHOOK_NODE_TYPES: &[&str] = &["n8n-nodes-base.webhook", "n8n-nodes-base.formTrigger"];

/// Package prefixes of first-party nodes.
pub const OFFICIAL_NODE_PREFIXES: &[&str] = &["n8n-nodes-base.", "@n8n/n8n-nodes-langchain."];

/// Whether `node_type` executes raw queries.
pub fn is_sql_node(node_type: &str) -> bool {
    SQL_NODE_TYPES.contains(&node_type)
}

/// Path of the query-parameters field, for query-params-capable types.
pub fn query_params_path(node_type: &str) -> Option<&'static [&'static str]> {
    lookup_table(SQL_NODE_TYPES_WITH_QUERY_PARAMS, node_type)
}

/// Path parameters of a filesystem node, or `None` for other types.
pub fn filesystem_path_params(node_type: &str) -> Option<&'static [&'static str]> {
    lookup_table(FILESYSTEM_NODE_TYPES, node_type)
}

/// Whether `node_type` is a first-party code/command/network primitive.
pub fn is_official_risky(node_type: &str) -> bool {
    OFFICIAL_RISKY_NODE_TYPES.contains(&node_type)
}

/// Replacement for a deprecated node type.
pub fn deprecated_replacement(node_type: &str) -> Option<&'static str> {
    lookup_table(DEPRECATED_NODE_TYPES, node_type)
}

/// Whether `node_type` exposes an inbound HTTP endpoint.
pub fn is_webhook(node_type: &str) -> bool {
    WEBHOOK_NODE_TYPES.contains(&node_type)
}

/// Whether `node_type` ships with the platform.
pub fn is_official(node_type: &str) -> bool {
    OFFICIAL_NODE_PREFIXES
        .iter()
        .any(|prefix| node_type.starts_with(prefix))
}

fn lookup_table<V: Copy>(table: &'static [(&'static str, V)], node_type: &str) -> Option<V> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == node_type)
        .map(|(_, value)| *value)
}
