//! Node metadata the precompiler needs but the store does not hand it
//! directly, since the oracle has no store interaction (§4.5): a snapshot
//! of each node's type and assigned overlay address, supplied by the
//! caller as plain data.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NodeInfo {
    #[serde(rename = "type")]
    pub node_type: String,
    /// The node's own overlay address (the address half of its assigned
    /// `/30`/`/126`, published at T1 as its overlay loopback/primary
    /// address), used both as a routing destination and as a next-hop.
    #[serde(default)]
    pub overlay_cidr: Option<String>,
}

pub type NodeDirectory = HashMap<String, NodeInfo>;

/// The address half of an overlay `cidr` string (`"10.200.0.0/30"` → `"10.200.0.0"`).
pub fn overlay_address(cidr: &str) -> Option<&str> {
    cidr.split('/').next().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_address_from_prefix_length() {
        assert_eq!(overlay_address("10.200.0.0/30"), Some("10.200.0.0"));
        assert_eq!(overlay_address(""), None);
    }
}
