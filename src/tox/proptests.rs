//! Property-based tests for bootstrap list parsing
//!
//! Tests for:
//! - Valid entries keep host, port and key exactly
//! - Invalid entries are dropped without disturbing valid ones
//! - Order of valid entries follows the input

use super::bootstrap::{
    default_bootstrap_nodes, parse_bootstrap_nodes, resolve_bootstrap_nodes, BootstrapNode,
};
use proptest::prelude::*;

fn host_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9.-]{0,30}"
}

fn key_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(any::<u8>(), 32).prop_map(|bytes| hex::encode_upper(bytes))
}

fn valid_node() -> impl Strategy<Value = BootstrapNode> {
    (host_strategy(), any::<u16>(), key_strategy())
        .prop_map(|(host, port, key)| BootstrapNode::new(host, port, key))
}

/// An entry that must be rejected, one per failure class
fn invalid_entry() -> impl Strategy<Value = String> {
    prop_oneof![
        // Too few fields
        (host_strategy(), any::<u16>()).prop_map(|(h, p)| format!("{h}:{p}")),
        // Port out of range
        (host_strategy(), 65536u32..1_000_000, key_strategy())
            .prop_map(|(h, p, k)| format!("{h}:{p}:{k}")),
        // Non-hex key material
        (host_strategy(), any::<u16>(), "[g-z]{2,20}")
            .prop_map(|(h, p, k)| format!("{h}:{p}:{k}")),
    ]
}

fn render(node: &BootstrapNode) -> String {
    format!("{}:{}:{}", node.host, node.port, node.public_key)
}

proptest! {
    /// Property: a valid entry parses back to exactly the same node
    #[test]
    fn valid_entry_roundtrips(node in valid_node()) {
        let parsed = parse_bootstrap_nodes(&render(&node));
        prop_assert_eq!(parsed, vec![node]);
    }

    /// Property: spaces inside the key are stripped and nothing else changes
    #[test]
    fn spaces_in_key_are_stripped(node in valid_node(), split in 1usize..63) {
        let spaced = format!("{} {}", &node.public_key[..split], &node.public_key[split..]);
        let entry = format!("{}:{}:{}", node.host, node.port, spaced);
        let parsed = parse_bootstrap_nodes(&entry);
        prop_assert_eq!(parsed, vec![node]);
    }

    /// Property: invalid entries are excluded, valid ones kept in order
    #[test]
    fn invalid_entries_are_skipped_in_place(
        items in prop::collection::vec(
            prop_oneof![
                valid_node().prop_map(Ok::<BootstrapNode, String>),
                invalid_entry().prop_map(Err::<BootstrapNode, String>),
            ],
            0..12,
        ),
    ) {
        let input = items
            .iter()
            .map(|item| match item {
                Ok(node) => render(node),
                Err(entry) => entry.clone(),
            })
            .collect::<Vec<_>>()
            .join(",");

        let expected: Vec<BootstrapNode> =
            items.iter().filter_map(|item| item.as_ref().ok().cloned()).collect();

        prop_assert_eq!(parse_bootstrap_nodes(&input), expected);
    }

    /// Property: whitespace-only input always resolves to the built-in nodes
    #[test]
    fn blank_input_resolves_to_defaults(input in "[ \t\r\n]{0,16}") {
        prop_assert_eq!(resolve_bootstrap_nodes(Some(input.as_str())), default_bootstrap_nodes());
    }
}
