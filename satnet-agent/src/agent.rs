//! Per-container agent process orchestration (§4.3, §5).
//!
//! Single-threaded cooperative model: T1 runs once to completion, then T2
//! and T3 are both driven on the same event loop, each reacting to its own
//! store watch. They share one `kernel_lock`, held for the duration of any
//! kernel-mutating section, so a link reconciliation and a task batch can
//! never interleave their host-side changes even though both are polled
//! concurrently under `select!` (§4.3: "link reconciliation and task
//! execution never overlap, avoiding interleaved kernel changes").

use std::sync::Arc;

use tokio::sync::Mutex as AsyncMutex;

use satnet_schema::SatNetError;
use satnet_store::Store;

use crate::init;
use crate::kernel::KernelOps;
use crate::linkmanager::LinkManager;
use crate::routing::Registry;
use crate::taskrunner;

/// Runs T1 then drives T2/T3 concurrently until shutdown is requested.
pub async fn run(
    node: &str,
    store: Arc<dyn Store>,
    kernel: Arc<dyn KernelOps>,
) -> Result<(), SatNetError> {
    let spec = init::initialize(node, store.as_ref(), kernel.as_ref()).await?;

    let routing = if spec.l3_config.enable_routing {
        Registry::resolve(spec.l3_config.routing_module.as_deref().unwrap_or("noop"))
    } else {
        Registry::resolve("noop")
    };

    let kernel_lock = Arc::new(AsyncMutex::new(()));
    let mut link_manager = LinkManager::new(node, store.clone(), kernel, routing, kernel_lock.clone());

    proxmox_daemon::state::catch_shutdown_signal(std::future::pending())
        .map_err(|e| SatNetError::KernelOpError(format!("failed to install signal handler: {e}")))?;

    tokio::select! {
        result = link_manager.run() => result,
        result = taskrunner::run(node, store.as_ref(), kernel_lock) => result,
        _ = proxmox_daemon::state::shutdown_future() => {
            log::info!("shutdown requested, draining in-flight reconciliations for {node}");
            Ok(())
        }
    }
}
