//! Centralized store key path templates (§3, §6).
//!
//! No component should hand-format a `/config/*` or `/state/*` path; every
//! path used anywhere in the workspace is constructed through one of these
//! functions.

pub const CONFIG_PREFIX: &str = "/config/";
pub const CONFIG_WORKERS_PREFIX: &str = "/config/workers/";
pub const CONFIG_NODES_PREFIX: &str = "/config/nodes/";
pub const CONFIG_LINKS_PREFIX: &str = "/config/links/";
pub const CONFIG_RUN_PREFIX: &str = "/config/run/";
pub const STATE_RUN_PREFIX: &str = "/state/run/";
pub const CONFIG_ETCHOSTS_PREFIX: &str = "/config/etchosts/";
pub const CONFIG_EPOCH_CONFIG: &str = "/config/epoch-config";
pub const STATE_LAST_ERROR: &str = "/state/last-error";

pub fn worker(name: &str) -> String {
    format!("{CONFIG_WORKERS_PREFIX}{name}")
}

pub fn node(name: &str) -> String {
    format!("{CONFIG_NODES_PREFIX}{name}")
}

pub fn node_link_prefix(node: &str) -> String {
    format!("{CONFIG_LINKS_PREFIX}{node}/")
}

pub fn link(node: &str, iface: &str) -> String {
    format!("{CONFIG_LINKS_PREFIX}{node}/{iface}")
}

pub fn run(node: &str) -> String {
    format!("{CONFIG_RUN_PREFIX}{node}")
}

pub fn state_run(node: &str) -> String {
    format!("{STATE_RUN_PREFIX}{node}")
}

pub fn etchosts(node: &str) -> String {
    format!("{CONFIG_ETCHOSTS_PREFIX}{node}")
}

/// Interface name encoding the counterparty and antenna index, e.g. `vl_sat2_1`.
pub fn iface_name(peer: &str, peer_antenna: u32) -> String {
    format!("vl_{peer}_{peer_antenna}")
}
