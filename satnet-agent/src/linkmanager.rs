//! T2 — link reconciler (§4.3).

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex as AsyncMutex;

use satnet_schema::model::{LinkRecord, NodeSpec};
use satnet_schema::{keys, SatNetError};
use satnet_store::{Store, WatchEvent};

use proxmox_worker_task::WorkerTaskContext;

use crate::kernel::KernelOps;
use crate::routing::RoutingModule;
use crate::shutdown::DaemonShutdownContext;

/// Tracks the interfaces this node currently believes are up, so a Put
/// carrying an unchanged record is a no-op and a structurally different
/// one triggers delete-then-create rather than a blind recreate.
pub struct LinkManager {
    node: String,
    store: Arc<dyn Store>,
    kernel: Arc<dyn KernelOps>,
    routing: Arc<dyn RoutingModule>,
    live: HashMap<String, LinkRecord>,
    shutdown: DaemonShutdownContext,
    /// Shared with [`crate::taskrunner`] so a link reconciliation and a
    /// task batch can never interleave their kernel mutations (§4.3:
    /// "link reconciliation and task execution never overlap").
    kernel_lock: Arc<AsyncMutex<()>>,
}

impl LinkManager {
    pub fn new(
        node: impl Into<String>,
        store: Arc<dyn Store>,
        kernel: Arc<dyn KernelOps>,
        routing: Arc<dyn RoutingModule>,
        kernel_lock: Arc<AsyncMutex<()>>,
    ) -> Self {
        Self {
            node: node.into(),
            store,
            kernel,
            routing,
            live: HashMap::new(),
            shutdown: DaemonShutdownContext,
            kernel_lock,
        }
    }

    /// Runs the T2 event loop until the watch stream ends or a fatal
    /// error is observed. Intended to run under `tokio::select!` against
    /// `proxmox_daemon::state::shutdown_future()` in [`crate::agent`].
    pub async fn run(&mut self) -> Result<(), SatNetError> {
        let prefix = keys::node_link_prefix(&self.node);
        loop {
            let mut rx = self.store.watch_prefix(&prefix).await?;
            while let Some(event) = rx.recv().await {
                match event {
                    WatchEvent::Put { key, value, .. } => {
                        let iface = iface_from_key(&key, &prefix);
                        let record: LinkRecord = match serde_json::from_slice(&value) {
                            Ok(record) => record,
                            Err(e) => {
                                log::warn!("malformed link record at {key}: {e}");
                                continue;
                            }
                        };
                        if let Err(e) = self.reconcile_put(&iface, record).await {
                            log::warn!("link reconcile failed for {iface}: {e}");
                        }
                    }
                    WatchEvent::Delete { key, .. } => {
                        let iface = iface_from_key(&key, &prefix);
                        if let Err(e) = self.reconcile_delete(&iface).await {
                            log::warn!("link teardown failed for {iface}: {e}");
                        }
                    }
                    WatchEvent::ResyncRequired => {
                        if let Err(e) = self.resync(&prefix).await {
                            log::warn!("link resync failed: {e}");
                        }
                    }
                    WatchEvent::Fatal(message) => {
                        return Err(SatNetError::StoreError(message));
                    }
                }
            }
            // Channel closed without a Fatal event: store side hung up,
            // re-open the watch (§4.3 "watches are resumed").
        }
    }

    async fn resync(&mut self, prefix: &str) -> Result<(), SatNetError> {
        let observed = self.store.range(prefix).await?;
        let mut seen = std::collections::HashSet::new();

        for (key, value) in observed {
            let iface = iface_from_key(&key, prefix);
            seen.insert(iface.clone());
            if let Ok(record) = serde_json::from_slice::<LinkRecord>(&value) {
                self.reconcile_put(&iface, record).await?;
            }
        }

        let stale: Vec<String> = self
            .live
            .keys()
            .filter(|iface| !seen.contains(*iface))
            .cloned()
            .collect();
        for iface in stale {
            self.reconcile_delete(&iface).await?;
        }
        Ok(())
    }

    async fn reconcile_put(&mut self, iface: &str, record: LinkRecord) -> Result<(), SatNetError> {
        if self.live.get(iface) == Some(&record) {
            return Ok(());
        }
        if self.shutdown.fail_on_shutdown().is_err() {
            return Err(SatNetError::StoreError(
                "shutdown requested, deferring new link reconciliation".to_string(),
            ));
        }

        let (peer, self_antenna) = self.peer_and_self_antenna(&record);
        let self_spec = self.node_spec(&self.node).await?;
        let peer_spec = self.node_spec(&peer).await?;

        let _kernel_guard = self.kernel_lock.lock().await;
        let existing_vni = self.kernel.iface_vni(iface).await?;
        let structurally_changed = self.live.get(iface).map(|prev| prev.vni) != Some(record.vni)
            || existing_vni.is_some_and(|vni| vni != record.vni);

        if structurally_changed && self.kernel.iface_exists(iface).await? {
            self.kernel.delete_iface(iface).await?;
        }

        if !self.kernel.iface_exists(iface).await? {
            self.kernel
                .create_vxlan(iface, record.vni, &peer_spec.eth0_ip_or_err(&peer)?, &self_spec.eth0_ip_or_err(&self.node)?)
                .await?;
            let bridge = format!("br{self_antenna}");
            self.kernel.attach_to_bridge(iface, &bridge).await?;
        }

        self.kernel.apply_netem(iface, &record).await?;

        let (message, ok) = self.routing.link_add(self.store.as_ref(), &self.node, iface).await;
        if !ok {
            log::warn!("routing module rejected link_add for {iface}: {message}");
        }

        self.live.insert(iface.to_string(), record);
        Ok(())
    }

    async fn reconcile_delete(&mut self, iface: &str) -> Result<(), SatNetError> {
        let was_live = self.live.remove(iface).is_some();

        let _kernel_guard = self.kernel_lock.lock().await;
        if !was_live && !self.kernel.iface_exists(iface).await? {
            return Ok(());
        }

        let (message, ok) = self.routing.link_del(self.store.as_ref(), &self.node, iface).await;
        if !ok {
            log::warn!("routing module rejected link_del for {iface}: {message}");
        }

        self.kernel.delete_iface(iface).await
    }

    fn peer_and_self_antenna(&self, record: &LinkRecord) -> (String, u32) {
        if record.endpoint1 == self.node {
            (record.endpoint2.clone(), record.endpoint1_antenna)
        } else {
            (record.endpoint1.clone(), record.endpoint2_antenna)
        }
    }

    async fn node_spec(&self, name: &str) -> Result<NodeSpec, SatNetError> {
        let bytes = self
            .store
            .get(&keys::node(name))
            .await?
            .ok_or_else(|| SatNetError::StoreError(format!("node {name} not found")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| SatNetError::StoreError(format!("malformed node spec for {name}: {e}")))
    }
}

trait Eth0IpOrErr {
    fn eth0_ip_or_err(&self, name: &str) -> Result<String, SatNetError>;
}

impl Eth0IpOrErr for NodeSpec {
    fn eth0_ip_or_err(&self, name: &str) -> Result<String, SatNetError> {
        self.eth0_ip
            .clone()
            .ok_or_else(|| SatNetError::StoreError(format!("node {name} has no eth0-ip yet")))
    }
}

fn iface_from_key(key: &str, prefix: &str) -> String {
    key.strip_prefix(prefix).unwrap_or(key).to_string()
}
