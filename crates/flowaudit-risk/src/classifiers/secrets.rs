//! Secret heuristics for plain node parameters.
//!
//! Two kinds of match: a parameter *name* that suggests a secret
//! (`password`, `apiKey`, ...) holding a non-empty literal, or a literal
//! *value* that looks like a well-known token format regardless of name.

use regex::Regex;
use tracing::warn;

/// Parameter names that hold secrets.
const SECRET_KEY_PATTERN: &str = r"(?i)^(password|passwd|pwd|secret|client[_-]?secret|api[_-]?key|access[_-]?key|secret[_-]?key|private[_-]?key|access[_-]?token|auth[_-]?token|bearer[_-]?token|refresh[_-]?token|token)$";

/// A well-known secret value format.
#[derive(Debug, Clone)]
pub struct SecretPattern {
    /// Pattern identifier (e.g., "SV-001").
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Regex matched against literal parameter values.
    pub pattern: Regex,
}

/// Compiled secret heuristics.
#[derive(Debug, Clone)]
pub struct SecretPatterns {
    key_patterns: Vec<Regex>,
    value_patterns: Vec<SecretPattern>,
}

impl SecretPatterns {
    /// Build the default heuristics plus operator-supplied name patterns.
    ///
    /// Extra patterns that fail to compile are logged and skipped.
    pub fn new(extra_key_patterns: &[String]) -> Self {
        let mut key_patterns = vec![Regex::new(SECRET_KEY_PATTERN).expect("static secret key pattern")];
        key_patterns.extend(extra_key_patterns.iter().filter_map(|raw| {
            match Regex::new(raw) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    warn!(pattern = %raw, error = %e, "skipping invalid secret key pattern");
                    None
                }
            }
        }));

        Self {
            key_patterns,
            value_patterns: value_patterns(),
        }
    }

    /// Whether a parameter name suggests a secret.
    pub fn is_secret_key(&self, key: &str) -> bool {
        self.key_patterns.iter().any(|re| re.is_match(key))
    }

    /// First well-known secret format matching `value`.
    pub fn match_value(&self, value: &str) -> Option<&SecretPattern> {
        self.value_patterns.iter().find(|p| p.pattern.is_match(value))
    }

    /// Number of compiled name patterns (default plus valid extras).
    pub fn key_pattern_count(&self) -> usize {
        self.key_patterns.len()
    }
}

impl Default for SecretPatterns {
    fn default() -> Self {
        Self::new(&[])
    }
}

fn pattern(id: &'static str, name: &'static str, re: &str) -> SecretPattern {
    SecretPattern {
        id,
        name,
        pattern: Regex::new(re).expect("static secret value pattern"),
    }
}

fn value_patterns() -> Vec<SecretPattern> {
    vec![
        pattern("SV-001", "OpenAI API key", r"\bsk-(proj-)?[A-Za-z0-9_-]{20,}"),
        pattern("SV-002", "AWS access key ID", r"\b(AKIA|ASIA)[0-9A-Z]{16}\b"),
        pattern("SV-003", "GitHub token", r"\bgh[pousr]_[A-Za-z0-9_]{30,}"),
        pattern("SV-004", "Slack token", r"\bxox[abposr]-[A-Za-z0-9-]{10,}"),
        pattern(
            "SV-005",
            "Private key block",
            r"-----BEGIN\s+(RSA\s+|EC\s+|OPENSSH\s+|DSA\s+)?PRIVATE\s+KEY-----",
        ),
        pattern(
            "SV-006",
            "Connection string with password",
            r"(?i)\b(postgres(ql)?|mysql|mariadb|mssql|mongodb(\+srv)?|redis|amqp)://[^\s:/@]+:[^\s@]+@\S+",
        ),
        pattern(
            "SV-007",
            "Bearer token literal",
            r"(?i)^bearer\s+[A-Za-z0-9._~+/-]{20,}=*$",
        ),
    ]
}
