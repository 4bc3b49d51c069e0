//! `satnet deploy` (§4.2): reconciles the container set against published
//! `NodeSpec`s, never aborting the whole fan-out on one node's failure.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use satnet_deploy::{deploy, SshWorkerExecutor, WorkerExecutor};
use satnet_schema::model::{NodeSpec, WorkerSpec};
use satnet_schema::{keys, SatNetError};
use satnet_store::Store;

#[derive(Args, Debug)]
pub struct DeployArgs {}

pub async fn execute(_args: DeployArgs) -> Result<()> {
    let store = crate::store::connect().await?;
    let store_endpoint = std::env::var("ETCD_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

    let workers = load_workers(store.as_ref()).await?;
    let nodes = load_nodes(store.as_ref()).await?;

    let executor: Arc<dyn WorkerExecutor> = Arc::new(SshWorkerExecutor);
    let results = deploy(executor, &workers, &nodes, &store_endpoint).await;

    let mut failed = 0;
    for result in &results {
        if result.ok {
            log::info!("{}: {}", result.node, result.message);
        } else {
            log::error!("{}: {}", result.node, result.message);
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(SatNetError::WorkerExecError {
            exit_code: -1,
            stderr: format!("{failed} of {} node(s) failed to deploy", results.len()),
        }
        .into());
    }
    Ok(())
}

/// Shared with `rm`, which needs the same worker/node listing to tear
/// containers down.
pub(crate) async fn load_workers(store: &dyn Store) -> Result<HashMap<String, WorkerSpec>> {
    let entries = store.range(keys::CONFIG_WORKERS_PREFIX).await?;
    entries
        .into_iter()
        .map(|(key, value)| {
            let name = key
                .strip_prefix(keys::CONFIG_WORKERS_PREFIX)
                .unwrap_or(&key)
                .to_string();
            let spec: WorkerSpec = serde_json::from_slice(&value)
                .with_context(|| format!("malformed worker record {key:?}"))?;
            Ok((name, spec))
        })
        .collect()
}

pub(crate) async fn load_nodes(store: &dyn Store) -> Result<Vec<NodeSpec>> {
    let entries = store.range(keys::CONFIG_NODES_PREFIX).await?;
    entries
        .into_iter()
        .map(|(key, value)| {
            serde_json::from_slice(&value).with_context(|| format!("malformed node record {key:?}"))
        })
        .collect()
}
