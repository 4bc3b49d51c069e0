//! Static-config validation (§4.1 step 1).

use std::collections::HashSet;

use proxmox_network_types::ip_address::Cidr;

use crate::error::SatNetError;
use crate::model::StaticConfig;

const MAX_NODE_NAME_LEN: usize = 8;

/// Validates a [`StaticConfig`] in isolation, before placement runs.
///
/// Rejects duplicate node names, names longer than 8 bytes, non-disjoint
/// worker underlay CIDRs, or node `worker` references absent from the
/// worker list.
pub fn validate_static_config(config: &StaticConfig) -> Result<(), SatNetError> {
    let mut seen_nodes = HashSet::new();
    for node in &config.nodes {
        if node.name.len() > MAX_NODE_NAME_LEN {
            return Err(SatNetError::ValidationError(format!(
                "node name {:?} exceeds {} bytes",
                node.name, MAX_NODE_NAME_LEN
            )));
        }
        if !seen_nodes.insert(node.name.as_str()) {
            return Err(SatNetError::ValidationError(format!(
                "duplicate node name {:?}",
                node.name
            )));
        }
    }

    let worker_names: HashSet<&str> = config.workers.iter().map(|w| w.name.as_str()).collect();
    for node in &config.nodes {
        if let Some(worker) = &node.worker {
            if !worker_names.contains(worker.as_str()) {
                return Err(SatNetError::ValidationError(format!(
                    "node {:?} references unknown worker {:?}",
                    node.name, worker
                )));
            }
        }
    }

    let mut seen_workers = HashSet::new();
    for worker in &config.workers {
        if !seen_workers.insert(worker.name.as_str()) {
            return Err(SatNetError::ValidationError(format!(
                "duplicate worker name {:?}",
                worker.name
            )));
        }
    }

    let mut cidrs = Vec::with_capacity(config.workers.len());
    for worker in &config.workers {
        let cidr: Cidr = worker.sat_vnet_cidr.parse().map_err(|_| {
            SatNetError::ValidationError(format!(
                "worker {:?} has invalid sat-vnet-cidr {:?}",
                worker.name, worker.sat_vnet_cidr
            ))
        })?;
        cidrs.push((worker.name.as_str(), cidr));
    }

    for i in 0..cidrs.len() {
        for j in (i + 1)..cidrs.len() {
            if cidrs_overlap(&cidrs[i].1, &cidrs[j].1) {
                return Err(SatNetError::ValidationError(format!(
                    "worker subnets for {:?} and {:?} are not disjoint",
                    cidrs[i].0, cidrs[j].0
                )));
            }
        }
    }

    Ok(())
}

fn cidrs_overlap(a: &Cidr, b: &Cidr) -> bool {
    match (a, b) {
        (Cidr::Ipv4(a), Cidr::Ipv4(b)) => a.overlaps(b),
        (Cidr::Ipv6(a), Cidr::Ipv6(b)) => a.overlaps(b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeConfigEntry, WorkerConfigEntry};

    fn worker(name: &str, cidr: &str) -> WorkerConfigEntry {
        WorkerConfigEntry {
            name: name.to_string(),
            ip: "10.0.0.1".to_string(),
            ssh_user: "root".to_string(),
            ssh_key: "/root/.ssh/id_rsa".to_string(),
            sat_vnet: "satbr0".to_string(),
            sat_vnet_cidr: cidr.to_string(),
            sat_vnet_super_cidr: "10.100.0.0/16".to_string(),
            cpu: 2.0,
            mem: 2 << 30,
        }
    }

    fn node(name: &str, worker: Option<&str>) -> NodeConfigEntry {
        NodeConfigEntry {
            name: name.to_string(),
            node_type: "satellite".to_string(),
            n_antennas: 1,
            metadata: serde_json::Value::Null,
            image: "satnet/node:latest".to_string(),
            sidecars: vec![],
            cpu_request: 0.1,
            mem_request: 200 << 20,
            cpu_limit: None,
            mem_limit: None,
            l3_config: Default::default(),
            worker: worker.map(str::to_string),
        }
    }

    #[test]
    fn rejects_long_node_name() {
        let mut cfg = StaticConfig::default();
        cfg.workers.push(worker("host-1", "10.100.1.0/24"));
        cfg.nodes.push(node("toolongname", Some("host-1")));
        assert!(matches!(
            validate_static_config(&cfg),
            Err(SatNetError::ValidationError(_))
        ));
    }

    #[test]
    fn accepts_exactly_8_byte_name() {
        let mut cfg = StaticConfig::default();
        cfg.workers.push(worker("host-1", "10.100.1.0/24"));
        cfg.nodes.push(node("eightchr", Some("host-1")));
        assert!(validate_static_config(&cfg).is_ok());
    }

    #[test]
    fn rejects_overlapping_worker_subnets() {
        let mut cfg = StaticConfig::default();
        cfg.workers.push(worker("host-1", "10.100.1.0/24"));
        cfg.workers.push(worker("host-2", "10.100.1.128/25"));
        assert!(matches!(
            validate_static_config(&cfg),
            Err(SatNetError::ValidationError(_))
        ));
    }

    #[test]
    fn rejects_unknown_worker_reference() {
        let mut cfg = StaticConfig::default();
        cfg.workers.push(worker("host-1", "10.100.1.0/24"));
        cfg.nodes.push(node("sat1", Some("host-9")));
        assert!(matches!(
            validate_static_config(&cfg),
            Err(SatNetError::ValidationError(_))
        ));
    }
}
