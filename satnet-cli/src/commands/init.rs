//! `satnet init --config <sat-config>` (§4.1).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use satnet_schema::model::StaticConfig;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path to the static config JSON document (§4.1 "Inputs").
    #[arg(long, value_name = "FILE")]
    pub config: PathBuf,
}

pub async fn execute(args: InitArgs) -> Result<()> {
    let bytes = tokio::fs::read(&args.config)
        .await
        .with_context(|| format!("failed to read {:?}", args.config))?;
    let config: StaticConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse {:?} as a static config", args.config))?;

    let store = crate::store::connect().await?;
    satnet_placement::run_placement(store.as_ref(), &config).await?;

    log::info!(
        "placement published {} node(s) across {} worker(s)",
        config.nodes.len(),
        config.workers.len()
    );
    Ok(())
}
