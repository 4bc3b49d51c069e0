//! `satnet unlink` (§6): deletes every `/config/links/*` key in one batch.

use anyhow::Result;
use clap::Args;
use satnet_schema::keys;

#[derive(Args, Debug)]
pub struct UnlinkArgs {}

pub async fn execute(_args: UnlinkArgs) -> Result<()> {
    let store = crate::store::connect().await?;
    store.delete_prefix(keys::CONFIG_LINKS_PREFIX).await?;
    log::info!("cleared all link records under {:?}", keys::CONFIG_LINKS_PREFIX);
    Ok(())
}
