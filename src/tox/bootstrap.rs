//! Bootstrap Node List
//!
//! Parses the operator-supplied introducer list
//! (`host:port:pubkeyhex,host:port:pubkeyhex,...`) and falls back to a
//! built-in pair of known-good public nodes when nothing usable was given.
//!
//! Parsing never fails as a whole: every malformed entry is skipped with a
//! warning and the remaining entries are kept in input order.

use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

/// A well-known node used to join the network at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootstrapNode {
    pub host: String,
    pub port: u16,
    /// Hex-encoded DHT public key (internal spaces removed)
    pub public_key: String,
}

impl BootstrapNode {
    pub fn new(host: impl Into<String>, port: u16, public_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            public_key: public_key.into(),
        }
    }
}

impl fmt::Display for BootstrapNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Why a bootstrap entry was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    #[error("need host:port:pubkey")]
    MissingFields,

    #[error("bad port {0:?}")]
    BadPort(String),

    #[error("bad pubkey hex: {0}")]
    BadKey(String),
}

/// Built-in introducer nodes used when the configured list is empty or unusable
pub fn default_bootstrap_nodes() -> Vec<BootstrapNode> {
    vec![
        BootstrapNode::new(
            "tox.abilinski.com",
            33445,
            "10C00EB250C3233E343E2AEBA07115A5C28920E9C8D29492F6D00B29049EDC7E",
        ),
        BootstrapNode::new(
            "144.217.167.73",
            33445,
            "7E5668E0EE09E19F320AD47902419331FFEE147BB3606769CFBE921A2A2FD34C",
        ),
    ]
}

/// Parse a single `host:port:pubkeyhex` entry
///
/// Everything after the second colon is rejoined and treated as the key, so
/// a stray colon in the key surfaces as a hex error rather than being lost.
pub fn parse_entry(entry: &str) -> Result<BootstrapNode, EntryError> {
    let parts: Vec<&str> = entry.split(':').collect();
    if parts.len() < 3 {
        return Err(EntryError::MissingFields);
    }

    let host = parts[0].trim();
    let port_str = parts[1].trim();
    let public_key = parts[2..].join(":").trim().replace(' ', "");

    // u16::from_str tolerates a leading '+', plain decimal digits only here
    if port_str.is_empty() || !port_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EntryError::BadPort(port_str.to_string()));
    }
    let port: u16 = port_str
        .parse()
        .map_err(|_| EntryError::BadPort(port_str.to_string()))?;

    hex::decode(&public_key).map_err(|e| EntryError::BadKey(e.to_string()))?;

    Ok(BootstrapNode::new(host, port, public_key))
}

/// Parse a comma-separated bootstrap list, skipping invalid entries
pub fn parse_bootstrap_nodes(input: &str) -> Vec<BootstrapNode> {
    let input = input.trim();
    if input.is_empty() {
        return Vec::new();
    }

    let mut nodes = Vec::new();
    for item in input.split(',') {
        let item = item.trim();
        if item.is_empty() {
            debug!("bootstrap entry skipped (empty)");
            continue;
        }

        match parse_entry(item) {
            Ok(node) => nodes.push(node),
            Err(e) => warn!("bootstrap entry skipped ({}): {:?}", e, item),
        }
    }
    nodes
}

/// Resolve the node list the bot will bootstrap against
///
/// `None`, blank input, or input with no valid entry all yield
/// [`default_bootstrap_nodes`].
pub fn resolve_bootstrap_nodes(input: Option<&str>) -> Vec<BootstrapNode> {
    let nodes = parse_bootstrap_nodes(input.unwrap_or_default());
    if nodes.is_empty() {
        let defaults = default_bootstrap_nodes();
        info!(
            "TOX_BOOTSTRAP_NODES empty; using {} default nodes",
            defaults.len()
        );
        defaults
    } else {
        info!("using {} nodes from TOX_BOOTSTRAP_NODES", nodes.len());
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_A: &str = "10C00EB250C3233E343E2AEBA07115A5C28920E9C8D29492F6D00B29049EDC7E";
    const KEY_B: &str = "7E5668E0EE09E19F320AD47902419331FFEE147BB3606769CFBE921A2A2FD34C";

    #[test]
    fn test_parse_single_entry() {
        let nodes = parse_bootstrap_nodes(&format!("node.example.org:33445:{KEY_A}"));
        assert_eq!(nodes, vec![BootstrapNode::new("node.example.org", 33445, KEY_A)]);
    }

    #[test]
    fn test_parse_preserves_order() {
        let input = format!("b.example:1:{KEY_B}, a.example:2:{KEY_A}");
        let nodes = parse_bootstrap_nodes(&input);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].host, "b.example");
        assert_eq!(nodes[1].host, "a.example");
    }

    #[test]
    fn test_parse_trims_fields() {
        let input = format!("  host.example : 443 : {KEY_A}  ");
        let nodes = parse_bootstrap_nodes(&input);
        assert_eq!(nodes, vec![BootstrapNode::new("host.example", 443, KEY_A)]);
    }

    #[test]
    fn test_parse_strips_spaces_inside_key() {
        let input = "h:1:AB CD EF 01";
        let nodes = parse_bootstrap_nodes(input);
        assert_eq!(nodes[0].public_key, "ABCDEF01");
    }

    #[test]
    fn test_parse_keeps_key_case() {
        let nodes = parse_bootstrap_nodes("h:1:abcdef");
        assert_eq!(nodes[0].public_key, "abcdef");
    }

    #[test]
    fn test_parse_skips_empty_entries() {
        let input = format!(",,h:1:{KEY_A},  ,");
        assert_eq!(parse_bootstrap_nodes(&input).len(), 1);
    }

    #[test]
    fn test_parse_skips_missing_fields() {
        assert_eq!(parse_entry("host:33445"), Err(EntryError::MissingFields));
        let input = format!("host:33445,good:1:{KEY_A}");
        let nodes = parse_bootstrap_nodes(&input);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].host, "good");
    }

    #[test]
    fn test_parse_rejects_bad_ports() {
        for port in ["65536", "-1", "abc", "", "+80", "80.0"] {
            let entry = format!("h:{port}:{KEY_A}");
            assert!(
                matches!(parse_entry(&entry), Err(EntryError::BadPort(_))),
                "port {port:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_accepts_port_bounds() {
        assert_eq!(parse_entry(&format!("h:0:{KEY_A}")).unwrap().port, 0);
        assert_eq!(parse_entry(&format!("h:65535:{KEY_A}")).unwrap().port, 65535);
    }

    #[test]
    fn test_parse_rejects_bad_hex() {
        assert!(matches!(parse_entry("h:1:XYZ"), Err(EntryError::BadKey(_))));
        // Odd length is not valid hex
        assert!(matches!(parse_entry("h:1:ABC"), Err(EntryError::BadKey(_))));
    }

    #[test]
    fn test_parse_extra_colon_lands_in_key() {
        // The rejoined key "AB:CD" is not hex
        assert!(matches!(parse_entry("h:1:AB:CD"), Err(EntryError::BadKey(_))));
    }

    #[test]
    fn test_parse_blank_input() {
        assert!(parse_bootstrap_nodes("").is_empty());
        assert!(parse_bootstrap_nodes("   \t ").is_empty());
    }

    #[test]
    fn test_resolve_falls_back_to_defaults() {
        assert_eq!(resolve_bootstrap_nodes(None), default_bootstrap_nodes());
        assert_eq!(resolve_bootstrap_nodes(Some("  ")), default_bootstrap_nodes());
        assert_eq!(
            resolve_bootstrap_nodes(Some("bad,also:bad,h:x:00")),
            default_bootstrap_nodes()
        );
    }

    #[test]
    fn test_resolve_uses_configured_nodes() {
        let input = format!("h:1:{KEY_A}");
        let nodes = resolve_bootstrap_nodes(Some(&input));
        assert_eq!(nodes, vec![BootstrapNode::new("h", 1, KEY_A)]);
    }

    #[test]
    fn test_default_nodes() {
        let nodes = default_bootstrap_nodes();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].to_string(), "tox.abilinski.com:33445");
        assert_eq!(nodes[1].to_string(), "144.217.167.73:33445");
        for node in &nodes {
            assert_eq!(hex::decode(&node.public_key).unwrap().len(), 32);
        }
    }
}
