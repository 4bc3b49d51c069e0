//! `satnet rm`: teardown — removes every deployed container, then clears
//! all `/config/*` entries (§6).

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use satnet_deploy::{SshWorkerExecutor, WorkerCommand, WorkerExecutor};
use satnet_schema::keys;

use super::deploy::{load_nodes, load_workers};

#[derive(Args, Debug)]
pub struct RmArgs {}

pub async fn execute(_args: RmArgs) -> Result<()> {
    let store = crate::store::connect().await?;
    let workers = load_workers(store.as_ref()).await?;
    let nodes = load_nodes(store.as_ref()).await?;

    let executor: Arc<dyn WorkerExecutor> = Arc::new(SshWorkerExecutor);
    let mut by_worker: HashMap<&str, Vec<&str>> = HashMap::new();
    for node in &nodes {
        if let Some(worker) = &node.worker {
            by_worker.entry(worker.as_str()).or_default().push(node.name.as_str());
        }
    }

    for (worker_name, node_names) in by_worker {
        let Some(worker) = workers.get(worker_name) else {
            continue;
        };
        for name in node_names {
            let command = WorkerCommand::new("docker").args(["rm", "-f", name]);
            // Best effort: a container already gone is not a teardown failure.
            if let Err(e) = executor.exec(worker, command).await {
                log::warn!("failed to remove container {name} on {worker_name}: {e}");
            }
        }
    }

    store.delete_prefix(keys::CONFIG_PREFIX).await?;
    log::info!("removed {} container(s) and cleared {:?}", nodes.len(), keys::CONFIG_PREFIX);
    Ok(())
}
