//! `satnet cp <src> <dst>` (§6): docker-cp semantics over the worker
//! executor. Exactly one of `src`/`dst` must name a node as `node:path`,
//! matching `docker cp`'s own container-path syntax; the command is
//! forwarded to that node's worker verbatim.

use std::io::Write;

use anyhow::{anyhow, Result};
use clap::Args;
use satnet_deploy::{SshWorkerExecutor, WorkerCommand, WorkerExecutor};
use satnet_schema::SatNetError;

use super::exec::resolve_worker;

#[derive(Args, Debug)]
pub struct CpArgs {
    pub src: String,
    pub dst: String,
}

pub async fn execute(args: CpArgs) -> Result<()> {
    let store = crate::store::connect().await?;
    let node = extract_node(&args.src)
        .or_else(|| extract_node(&args.dst))
        .ok_or_else(|| anyhow!("neither {:?} nor {:?} names a node (expected node:path)", args.src, args.dst))?;
    let (worker, _) = resolve_worker(store.as_ref(), &node).await?;

    let executor = SshWorkerExecutor;
    let command = WorkerCommand::new("docker").args(["cp", args.src.as_str(), args.dst.as_str()]);
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

fn extract_node(path: &str) -> Option<String> {
    path.split_once(':').map(|(node, _)| node.to_string())
}
