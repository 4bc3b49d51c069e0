//! Store connection bootstrap shared by every subcommand (§6 "Environment
//! variables").

use std::sync::Arc;

use anyhow::{Context, Result};
use satnet_store::{EtcdStore, Store};

pub async fn connect() -> Result<Arc<dyn Store>> {
    let client = satnet_store::connect::connect_from_env()
        .await
        .context("failed to connect to the store")?;
    Ok(Arc::new(EtcdStore::new(client)))
}
