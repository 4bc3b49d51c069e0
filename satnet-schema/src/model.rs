//! Persistent value types stored under `/config/*` (§3).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `/config/workers/{worker-name}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WorkerSpec {
    pub ip: String,
    pub ssh_user: String,
    pub ssh_key: String,
    pub sat_vnet: String,
    pub sat_vnet_cidr: String,
    pub sat_vnet_super_cidr: String,
    /// Residual cpu cores, decremented as nodes are placed.
    pub cpu: f64,
    /// Residual memory in bytes, decremented as nodes are placed.
    pub mem: u64,
}

/// Layer-3 configuration embedded in a [`NodeSpec`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct L3Config {
    #[serde(default)]
    pub enable_netem: bool,
    #[serde(default)]
    pub enable_routing: bool,
    #[serde(default)]
    pub routing_module: Option<String>,
    #[serde(default)]
    pub routing_metadata: serde_json::Value,
    #[serde(default)]
    pub auto_assign_ips: bool,
    #[serde(default)]
    pub auto_assign_super_cidr: Vec<String>,
    #[serde(default)]
    pub cidr: Option<String>,
    #[serde(default)]
    pub cidr_v6: Option<String>,
}

/// `/config/nodes/{node-name}`. Key length must be `<= 8` bytes (§4.1, §8).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NodeSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub n_antennas: u32,
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub image: String,
    #[serde(default)]
    pub sidecars: Vec<String>,
    pub cpu_request: f64,
    pub mem_request: u64,
    pub cpu_limit: f64,
    pub mem_limit: u64,
    #[serde(default)]
    pub l3_config: L3Config,
    pub worker: Option<String>,
    #[serde(default)]
    pub eth0_ip: Option<String>,
}

/// `/config/epoch-config` — informational only, not consumed by the scheduler logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EpochConfig {
    pub epoch_dir: String,
    pub file_pattern: String,
}

/// `/config/etchosts/{node-name}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HostEntry {
    pub address: String,
}

/// `/config/links/{node-name}/{iface-name}` — one half-link from `node-name`'s perspective (§3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LinkRecord {
    pub endpoint1: String,
    pub endpoint2: String,
    pub endpoint1_antenna: u32,
    pub endpoint2_antenna: u32,
    #[serde(default)]
    pub rate: Option<String>,
    #[serde(default)]
    pub loss: Option<String>,
    #[serde(default)]
    pub delay: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
    pub vni: u32,
}

impl LinkRecord {
    /// Merge `update` onto `self` in place: missing fields on the update
    /// preserve the prior value (§4.4 conflict rules: "shaping-only update").
    pub fn merge_update(&mut self, update: &LinkUpdate) {
        if update.rate.is_some() {
            self.rate = update.rate.clone();
        }
        if update.loss.is_some() {
            self.loss = update.loss.clone();
        }
        if update.delay.is_some() {
            self.delay = update.delay.clone();
        }
        if update.limit.is_some() {
            self.limit = update.limit;
        }
    }
}

/// `/config/run/{node-name}` — a JSON array of shell command strings.
pub type TaskList = Vec<String>;

/// Last exit code reported at `/state/run/{node-name}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunResult {
    pub exit_code: i32,
    pub command: String,
}

/// One entry of an epoch file's `links-add`/`links-update`/`links-del` array (§6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct LinkUpdate {
    pub endpoint1: String,
    pub endpoint2: String,
    #[serde(default = "default_antenna")]
    pub endpoint1_antenna: u32,
    #[serde(default = "default_antenna")]
    pub endpoint2_antenna: u32,
    #[serde(default)]
    pub rate: Option<String>,
    #[serde(default)]
    pub loss: Option<String>,
    #[serde(default)]
    pub delay: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
}

fn default_antenna() -> u32 {
    1
}

/// One epoch file: `time` plus optional link and task deltas (§6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct EpochFile {
    pub time: String,
    #[serde(default)]
    pub links_add: Vec<LinkUpdate>,
    #[serde(default)]
    pub links_update: Vec<LinkUpdate>,
    #[serde(default)]
    pub links_del: Vec<LinkUpdate>,
    #[serde(default)]
    pub run: BTreeMap<String, Vec<String>>,
}

/// Static configuration document consumed by the placement controller (§4.1 "Inputs").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct StaticConfig {
    #[serde(default)]
    pub workers: Vec<WorkerConfigEntry>,
    #[serde(default)]
    pub nodes: Vec<NodeConfigEntry>,
    #[serde(default)]
    pub address_rules: Vec<AddressRule>,
    #[serde(default)]
    pub epoch_dir: String,
    #[serde(default)]
    pub file_pattern: String,
    /// Which address families to assign: "v4", "v6", or "dual".
    #[serde(default = "default_stack")]
    pub address_family: String,
}

fn default_stack() -> String {
    "v4".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WorkerConfigEntry {
    pub name: String,
    pub ip: String,
    pub ssh_user: String,
    pub ssh_key: String,
    pub sat_vnet: String,
    pub sat_vnet_cidr: String,
    pub sat_vnet_super_cidr: String,
    pub cpu: f64,
    pub mem: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NodeConfigEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub n_antennas: u32,
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub image: String,
    #[serde(default)]
    pub sidecars: Vec<String>,
    pub cpu_request: f64,
    pub mem_request: u64,
    #[serde(default)]
    pub cpu_limit: Option<f64>,
    #[serde(default)]
    pub mem_limit: Option<u64>,
    #[serde(default)]
    pub l3_config: L3Config,
    #[serde(default)]
    pub worker: Option<String>,
}

/// Address-assignment rule: `auto-assign-super-cidr` entries keyed by match type (§4.1 step 3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AddressRule {
    /// `"satellite" | "gateway" | "user" | "any"` matched against `NodeSpec.type`.
    pub match_type: String,
    pub super_cidr: String,
    #[serde(default)]
    pub super_cidr_v6: Option<String>,
}
