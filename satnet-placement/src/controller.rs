//! Placement controller orchestration: validate, place, address, publish (§4.1).

use std::collections::HashMap;

use satnet_schema::error::SatNetError;
use satnet_schema::model::{EpochConfig, L3Config, NodeSpec, StaticConfig, WorkerSpec};
use satnet_schema::{keys, validate};
use satnet_store::{Store, TxnOp};

use crate::addressing::{allocate_addresses, AssignedAddresses};
use crate::bestfit::place_nodes;

/// Runs the full placement pipeline and publishes the result as one
/// transaction (§4.1 step 4: "no partial state is left if validation fails").
pub async fn run_placement(store: &dyn Store, config: &StaticConfig) -> Result<(), SatNetError> {
    validate::validate_static_config(config)?;

    let assignments = place_nodes(&config.workers, &config.nodes)?;
    let assignment_map: HashMap<&str, &str> = assignments
        .iter()
        .map(|(n, w)| (n.as_str(), w.as_str()))
        .collect();

    let addresses = allocate_addresses(&config.nodes, &config.address_rules)?;

    let mut ops = Vec::new();

    for worker in &config.workers {
        let spec = WorkerSpec {
            ip: worker.ip.clone(),
            ssh_user: worker.ssh_user.clone(),
            ssh_key: worker.ssh_key.clone(),
            sat_vnet: worker.sat_vnet.clone(),
            sat_vnet_cidr: worker.sat_vnet_cidr.clone(),
            sat_vnet_super_cidr: worker.sat_vnet_super_cidr.clone(),
            cpu: worker.cpu,
            mem: worker.mem,
        };
        let value = serde_json::to_vec(&spec)
            .map_err(|e| SatNetError::ValidationError(format!("failed to encode worker: {e}")))?;
        ops.push(TxnOp::put(keys::worker(&worker.name), value));
    }

    for node in &config.nodes {
        let assigned_worker = assignment_map
            .get(node.name.as_str())
            .copied()
            .unwrap_or_default()
            .to_string();

        let empty = AssignedAddresses::default();
        let addr = addresses.get(&node.name).unwrap_or(&empty);

        let mut l3_config = node.l3_config.clone();
        if addr.cidr.is_some() {
            l3_config.cidr = addr.cidr.clone();
        }
        if addr.cidr_v6.is_some() {
            l3_config.cidr_v6 = addr.cidr_v6.clone();
        }

        let spec = NodeSpec {
            name: node.name.clone(),
            node_type: node.node_type.clone(),
            n_antennas: node.n_antennas,
            metadata: node.metadata.clone(),
            image: node.image.clone(),
            sidecars: node.sidecars.clone(),
            cpu_request: node.cpu_request,
            mem_request: node.mem_request,
            cpu_limit: node.cpu_limit.unwrap_or(node.cpu_request),
            mem_limit: node.mem_limit.unwrap_or(node.mem_request),
            l3_config: l3_config_or_default(l3_config),
            worker: Some(assigned_worker),
            eth0_ip: None,
        };
        let value = serde_json::to_vec(&spec)
            .map_err(|e| SatNetError::ValidationError(format!("failed to encode node: {e}")))?;
        ops.push(TxnOp::put(keys::node(&node.name), value));
    }

    let epoch_config = EpochConfig {
        epoch_dir: config.epoch_dir.clone(),
        file_pattern: config.file_pattern.clone(),
    };
    let value = serde_json::to_vec(&epoch_config)
        .map_err(|e| SatNetError::ValidationError(format!("failed to encode epoch config: {e}")))?;
    ops.push(TxnOp::put(keys::CONFIG_EPOCH_CONFIG.to_string(), value));

    store
        .txn(ops)
        .await
        .map_err(|e| SatNetError::StoreError(e.to_string()))
}

fn l3_config_or_default(cfg: L3Config) -> L3Config {
    cfg
}
