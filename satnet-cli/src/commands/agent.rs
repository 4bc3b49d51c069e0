//! `satnet agent` (§4.3 ambient note): the container entrypoint started by
//! `deploy`'s `docker run`, driving T1/T2/T3 on a single-threaded runtime
//! until shutdown.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use satnet_agent::kernel::{KernelOps, LinuxKernelOps};

#[derive(Args, Debug)]
pub struct AgentArgs {
    /// Defaults to `SATNET_NODE`, set by the deployer on `docker run` (§4.2).
    #[arg(long, env = "SATNET_NODE")]
    pub node: String,
}

pub async fn execute(args: AgentArgs) -> Result<()> {
    let store = crate::store::connect().await?;
    let kernel: Arc<dyn KernelOps> = Arc::new(LinuxKernelOps);
    satnet_agent::run(&args.node, store, kernel).await?;
    Ok(())
}
