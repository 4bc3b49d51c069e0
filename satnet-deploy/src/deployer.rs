//! Deployer: idempotent container reconciliation per worker (§4.2).

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures::future::join_all;
use satnet_schema::error::SatNetError;
use satnet_schema::model::{NodeSpec, WorkerSpec};
use tokio::sync::Semaphore;

use crate::executor::{WorkerCommand, WorkerExecutor};

type BoxedDeployFuture = Pin<Box<dyn Future<Output = DeployResult> + Send>>;

/// Per-node deployment outcome; the deployer never aborts the whole
/// fan-out because one worker failed (§4.2 step 3).
#[derive(Debug, Clone)]
pub struct DeployResult {
    pub node: String,
    pub ok: bool,
    pub message: String,
}

/// Maximum concurrent remote invocations per worker (§4.2 "bounded
/// concurrency limit per worker").
const MAX_CONCURRENT_PER_WORKER: usize = 4;

/// Reconciles the running container set against the desired `NodeSpec`s:
/// removes orphans (containers with no matching spec) and launches the
/// missing ones. Re-running is a no-op for nodes already correctly
/// deployed.
pub async fn deploy(
    executor: Arc<dyn WorkerExecutor>,
    workers: &HashMap<String, WorkerSpec>,
    nodes: &[NodeSpec],
    store_endpoint: &str,
) -> Vec<DeployResult> {
    let mut by_worker: HashMap<String, Vec<&NodeSpec>> = HashMap::new();
    for node in nodes {
        if let Some(worker) = &node.worker {
            by_worker.entry(worker.clone()).or_default().push(node);
        }
    }

    let mut tasks: Vec<BoxedDeployFuture> = Vec::new();

    for (worker_name, worker_nodes) in by_worker {
        let Some(worker_spec) = workers.get(&worker_name).cloned() else {
            for node in worker_nodes {
                let result = DeployResult {
                    node: node.name.clone(),
                    ok: false,
                    message: format!("unknown worker {worker_name:?}"),
                };
                tasks.push(Box::pin(futures::future::ready(result)));
            }
            continue;
        };

        let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_PER_WORKER));

        for node in worker_nodes {
            let executor = executor.clone();
            let worker_spec = worker_spec.clone();
            let node = node.clone();
            let store_endpoint = store_endpoint.to_string();
            let semaphore = semaphore.clone();

            tasks.push(Box::pin(async move {
                let _permit = semaphore.acquire_owned().await.expect("semaphore open");
                deploy_one_node(executor.as_ref(), &worker_spec, &node, &store_endpoint).await
            }));
        }
    }

    join_all(tasks).await
}

async fn deploy_one_node(
    executor: &dyn WorkerExecutor,
    worker: &WorkerSpec,
    node: &NodeSpec,
    store_endpoint: &str,
) -> DeployResult {
    let remove = WorkerCommand::new("docker")
        .args(["rm", "-f", &node.name]);
    // Best effort: removing a nonexistent container is not a failure.
    let _ = executor.exec(worker, remove).await;

    let mut run = WorkerCommand::new("docker")
        .args([
            "run".to_string(),
            "-d".to_string(),
            "--name".to_string(),
            node.name.clone(),
            "--network".to_string(),
            worker.sat_vnet.clone(),
            "--privileged".to_string(),
            "--cap-add".to_string(),
            "NET_ADMIN".to_string(),
            "--cpus".to_string(),
            node.cpu_limit.to_string(),
            "--memory".to_string(),
            node.mem_limit.to_string(),
        ])
        .env("SATNET_NODE", &node.name)
        .env("SATNET_STORE_ENDPOINT", store_endpoint);

    run = run.args([node.image.clone()]);

    match executor.exec(worker, run).await {
        Ok(output) if output.exit_code == 0 => DeployResult {
            node: node.name.clone(),
            ok: true,
            message: "deployed".to_string(),
        },
        Ok(output) => DeployResult {
            node: node.name.clone(),
            ok: false,
            message: format!(
                "docker run exited {}: {}",
                output.exit_code,
                String::from_utf8_lossy(&output.stderr)
            ),
        },
        Err(SatNetError::WorkerExecError { exit_code, stderr }) => DeployResult {
            node: node.name.clone(),
            ok: false,
            message: format!("exec failed (exit={exit_code}): {stderr}"),
        },
        Err(other) => DeployResult {
            node: node.name.clone(),
            ok: false,
            message: other.to_string(),
        },
    }
}

/// Removes every container with no matching `NodeSpec` on its worker
/// (§4.2 step 3: reconciliation removes orphans).
pub async fn remove_orphans(
    executor: Arc<dyn WorkerExecutor>,
    worker: &WorkerSpec,
    running_containers: &[String],
    desired_nodes: &[String],
) -> Vec<DeployResult> {
    let desired: std::collections::HashSet<&str> =
        desired_nodes.iter().map(String::as_str).collect();

    let mut futs = Vec::new();
    for container in running_containers {
        if desired.contains(container.as_str()) {
            continue;
        }
        let executor = executor.clone();
        let worker = worker.clone();
        let container = container.clone();
        futs.push(async move {
            let remove = WorkerCommand::new("docker").args(["rm", "-f", &container]);
            match executor.exec(&worker, remove).await {
                Ok(output) if output.exit_code == 0 => DeployResult {
                    node: container,
                    ok: true,
                    message: "removed orphan".to_string(),
                },
                Ok(output) => DeployResult {
                    node: container,
                    ok: false,
                    message: format!("orphan removal exited {}", output.exit_code),
                },
                Err(err) => DeployResult {
                    node: container,
                    ok: false,
                    message: err.to_string(),
                },
            }
        });
    }

    join_all(futs).await
}
