//! `satnet run [--loop-delay d] [--fixed-wait d] [--interactive]` (§4.4).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Args;
use satnet_schema::{keys, model::EpochConfig};
use satnet_scheduler::Mode;
use satnet_store::Store;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Re-run the whole directory every `d` seconds once exhausted.
    #[arg(long, value_name = "SECONDS", conflicts_with_all = ["fixed_wait", "interactive"])]
    pub loop_delay: Option<u64>,
    /// Ignore `time`; release one file every `d` seconds.
    #[arg(long, value_name = "SECONDS", conflicts_with_all = ["loop_delay", "interactive"])]
    pub fixed_wait: Option<u64>,
    /// Poll a queue directory and release files the instant they appear.
    #[arg(long, conflicts_with_all = ["loop_delay", "fixed_wait"])]
    pub interactive: bool,
    /// Queue directory for `--interactive`; defaults to the published epoch dir.
    #[arg(long, value_name = "DIR", requires = "interactive")]
    pub queue_dir: Option<PathBuf>,
}

pub async fn execute(args: RunArgs) -> Result<()> {
    let store = crate::store::connect().await?;
    let config = load_epoch_config(store.as_ref()).await?;
    let epoch_dir = PathBuf::from(&config.epoch_dir);

    let mode = if args.interactive {
        Mode::Interactive {
            queue_dir: args.queue_dir.unwrap_or_else(|| epoch_dir.clone()),
        }
    } else if let Some(seconds) = args.fixed_wait {
        Mode::FixedWait(Duration::from_secs(seconds))
    } else if let Some(seconds) = args.loop_delay {
        Mode::Loop(Duration::from_secs(seconds))
    } else {
        Mode::Default
    };

    satnet_scheduler::run(store.as_ref(), &epoch_dir, &config.file_pattern, mode).await?;
    Ok(())
}

async fn load_epoch_config(store: &dyn Store) -> Result<EpochConfig> {
    let bytes = store
        .get(keys::CONFIG_EPOCH_CONFIG)
        .await?
        .ok_or_else(|| anyhow!("no epoch-config published; run `satnet init` first"))?;
    Ok(serde_json::from_slice(&bytes)?)
}
