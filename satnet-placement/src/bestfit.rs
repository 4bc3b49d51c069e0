//! Best-fit-decreasing placement schedule (§4.1 step 2).

use satnet_schema::error::SatNetError;
use satnet_schema::model::{NodeConfigEntry, WorkerConfigEntry};

/// Mutable per-worker residual capacity tracked during placement.
#[derive(Debug, Clone)]
struct WorkerCapacity {
    name: String,
    residual_cpu: f64,
    residual_mem: u64,
}

/// Runs best-fit-decreasing over nodes lacking an explicit `worker`,
/// returning the chosen worker name per node in input order.
///
/// Both dimensions (cpu, mem) are independent: a node is admissible on a
/// worker iff the worker's residual cpu *and* mem both cover the request.
/// Ties are broken by worker name lexicographic order. Nodes that already
/// specify `worker` are passed through unchanged and their request is still
/// deducted from that worker's residual capacity.
pub fn place_nodes(
    workers: &[WorkerConfigEntry],
    nodes: &[NodeConfigEntry],
) -> Result<Vec<(String, String)>, SatNetError> {
    let mut capacities: Vec<WorkerCapacity> = workers
        .iter()
        .map(|w| WorkerCapacity {
            name: w.name.clone(),
            residual_cpu: w.cpu,
            residual_mem: w.mem,
        })
        .collect();
    capacities.sort_by(|a, b| a.name.cmp(&b.name));

    // Decreasing order by request size (cpu primary, mem secondary), stable
    // with respect to input order for equal-sized requests.
    let mut order: Vec<usize> = (0..nodes.len()).collect();
    order.sort_by(|&a, &b| {
        let na = &nodes[a];
        let nb = &nodes[b];
        nb.cpu_request
            .partial_cmp(&na.cpu_request)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(nb.mem_request.cmp(&na.mem_request))
    });

    let mut assignment = vec![None; nodes.len()];

    for idx in order {
        let node = &nodes[idx];

        let worker_name = if let Some(explicit) = &node.worker {
            explicit.clone()
        } else {
            // Admissible workers are ranked by *residual* capacity (the
            // least-loaded worker wins), so that equally-loaded workers
            // alternate rather than one worker saturating first; ties are
            // broken by worker name lexicographic order (§4.1 step 2, S1).
            let chosen = capacities
                .iter()
                .filter(|w| {
                    w.residual_cpu >= node.cpu_request && w.residual_mem >= node.mem_request
                })
                .max_by(|a, b| {
                    a.residual_cpu
                        .partial_cmp(&b.residual_cpu)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then(a.residual_mem.cmp(&b.residual_mem))
                        .then(b.name.cmp(&a.name))
                })
                .map(|w| w.name.clone());

            chosen.ok_or_else(|| SatNetError::InsufficientCapacity {
                node: node.name.clone(),
                cpu_request: node.cpu_request,
                mem_request: node.mem_request,
            })?
        };

        let capacity = capacities
            .iter_mut()
            .find(|w| w.name == worker_name)
            .ok_or_else(|| {
                SatNetError::ValidationError(format!(
                    "node {:?} references unknown worker {:?}",
                    node.name, worker_name
                ))
            })?;

        if capacity.residual_cpu < node.cpu_request || capacity.residual_mem < node.mem_request {
            return Err(SatNetError::InsufficientCapacity {
                node: node.name.clone(),
                cpu_request: node.cpu_request,
                mem_request: node.mem_request,
            });
        }

        capacity.residual_cpu -= node.cpu_request;
        capacity.residual_mem -= node.mem_request;
        assignment[idx] = Some(worker_name);
    }

    Ok(nodes
        .iter()
        .zip(assignment)
        .map(|(n, w)| (n.name.clone(), w.expect("every node is assigned")))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker(name: &str, cpu: f64, mem: u64) -> WorkerConfigEntry {
        WorkerConfigEntry {
            name: name.to_string(),
            ip: "10.0.0.1".to_string(),
            ssh_user: "root".to_string(),
            ssh_key: "k".to_string(),
            sat_vnet: "satbr0".to_string(),
            sat_vnet_cidr: "10.100.1.0/24".to_string(),
            sat_vnet_super_cidr: "10.100.0.0/16".to_string(),
            cpu,
            mem,
        }
    }

    fn node(name: &str, cpu_request: f64, mem_request: u64) -> NodeConfigEntry {
        NodeConfigEntry {
            name: name.to_string(),
            node_type: "satellite".to_string(),
            n_antennas: 1,
            metadata: serde_json::Value::Null,
            image: "satnet/node".to_string(),
            sidecars: vec![],
            cpu_request,
            mem_request,
            cpu_limit: None,
            mem_limit: None,
            l3_config: Default::default(),
            worker: None,
        }
    }

    #[test]
    fn s1_round_robin_by_best_fit_ties_broken_by_name() {
        // S1: two workers host-1/host-2 (cpu=2, mem=2GiB), four nodes each
        // requesting cpu=100m (0.1), mem=200MiB. Expected: 1,3 -> host-1; 2,4 -> host-2.
        let workers = vec![
            worker("host-1", 2.0, 2u64 << 30),
            worker("host-2", 2.0, 2u64 << 30),
        ];
        let nodes = vec![
            node("node1", 0.1, 200 << 20),
            node("node2", 0.1, 200 << 20),
            node("node3", 0.1, 200 << 20),
            node("node4", 0.1, 200 << 20),
        ];

        let result = place_nodes(&workers, &nodes).unwrap();
        assert_eq!(result[0], ("node1".to_string(), "host-1".to_string()));
        assert_eq!(result[1], ("node2".to_string(), "host-2".to_string()));
        assert_eq!(result[2], ("node3".to_string(), "host-1".to_string()));
        assert_eq!(result[3], ("node4".to_string(), "host-2".to_string()));
    }

    #[test]
    fn fails_with_insufficient_capacity() {
        let workers = vec![worker("host-1", 0.05, 1 << 20)];
        let nodes = vec![node("node1", 0.1, 200 << 20)];
        assert!(matches!(
            place_nodes(&workers, &nodes),
            Err(SatNetError::InsufficientCapacity { .. })
        ));
    }

    #[test]
    fn zero_residual_capacity_fails_not_crashes() {
        let workers = vec![worker("host-1", 0.0, 0)];
        let nodes = vec![node("node1", 0.1, 1)];
        assert!(matches!(
            place_nodes(&workers, &nodes),
            Err(SatNetError::InsufficientCapacity { .. })
        ));
    }
}
