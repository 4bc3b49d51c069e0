//! `satnet exec <node> [-it|-d] <cmd...>` (§6): resolves node → worker via
//! the store and delegates to the worker executor.

use std::io::Write;

use anyhow::{anyhow, Result};
use clap::Args;
use satnet_deploy::{SshWorkerExecutor, WorkerCommand, WorkerExecutor};
use satnet_schema::model::{NodeSpec, WorkerSpec};
use satnet_schema::{keys, SatNetError};
use satnet_store::Store;

#[derive(Args, Debug)]
pub struct ExecArgs {
    pub node: String,
    /// Keep stdin open (`docker exec -i`).
    #[arg(short = 'i', long)]
    pub interactive: bool,
    /// Allocate a pseudo-tty (`docker exec -t`); no local pty is forwarded,
    /// the flag is passed through to the remote `docker exec` verbatim.
    #[arg(short = 't', long)]
    pub tty: bool,
    /// Run detached (`docker exec -d`).
    #[arg(short = 'd', long, conflicts_with_all = ["interactive", "tty"])]
    pub detach: bool,
    #[arg(trailing_var_arg = true, required = true)]
    pub cmd: Vec<String>,
}

pub async fn execute(args: ExecArgs) -> Result<()> {
    let store = crate::store::connect().await?;
    let (worker, _node) = resolve_worker(store.as_ref(), &args.node).await?;

    let mut docker_args = vec!["exec".to_string()];
    if args.detach {
        docker_args.push("-d".to_string());
    } else {
        let mut flags = String::from("-");
        if args.interactive {
            flags.push('i');
        }
        if args.tty {
            flags.push('t');
        }
        if flags.len() > 1 {
            docker_args.push(flags);
        }
    }
    docker_args.push(args.node.clone());
    docker_args.extend(args.cmd.clone());

    let executor = SshWorkerExecutor;
    let command = WorkerCommand::new("docker").args(docker_args);
    let output = executor.exec(&worker, command).await?;

    std::io::stdout().write_all(&output.stdout)?;
    std::io::stderr().write_all(&output.stderr)?;

    if output.exit_code != 0 {
        return Err(SatNetError::WorkerExecError {
            exit_code: output.exit_code,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
        .into());
    }
    Ok(())
}

pub(crate) async fn resolve_worker(
    store: &dyn Store,
    node: &str,
) -> Result<(WorkerSpec, NodeSpec)> {
    let bytes = store
        .get(&keys::node(node))
        .await?
        .ok_or_else(|| anyhow!("no such node {node:?}"))?;
    let node_spec: NodeSpec = serde_json::from_slice(&bytes)?;
    let worker_name = node_spec
        .worker
        .clone()
        .ok_or_else(|| anyhow!("node {node:?} has no assigned worker"))?;
    let worker_bytes = store
        .get(&keys::worker(&worker_name))
        .await?
        .ok_or_else(|| anyhow!("worker {worker_name:?} not found"))?;
    let worker_spec: WorkerSpec = serde_json::from_slice(&worker_bytes)?;
    Ok((worker_spec, node_spec))
}
