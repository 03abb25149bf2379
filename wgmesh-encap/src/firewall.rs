//! Declarative firewall rules handed to the external firewall backend.
//!
//! Strategy variants describe the rules they need; executing them (and
//! reconciling them against the live iptables state) happens outside this
//! crate. The shape mirrors the iptables CLI: a table, a chain, and the
//! rule spec that would follow `-A <chain>`.

/// A single declarative iptables-style rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub table: String,
    pub chain: String,
    pub spec: String,
}

impl Rule {
    pub fn new(table: &str, chain: &str, spec: &str) -> Self {
        Self {
            table: table.to_string(),
            chain: chain.to_string(),
            spec: spec.to_string(),
        }
    }
}
