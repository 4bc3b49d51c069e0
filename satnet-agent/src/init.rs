//! T1 — one-shot node initialization (§4.3).

use satnet_schema::model::{HostEntry, NodeSpec};
use satnet_schema::{keys, SatNetError};
use satnet_store::Store;

use crate::kernel::KernelOps;
use crate::routing::Registry;

/// Creates the per-antenna bridges, discovers the container's own `eth0`
/// address, publishes it, and (if routing is enabled) hands off to the
/// configured routing module's `init` hook.
pub async fn initialize(
    node: &str,
    store: &dyn Store,
    kernel: &dyn KernelOps,
) -> Result<NodeSpec, SatNetError> {
    let bytes = store
        .get(&keys::node(node))
        .await?
        .ok_or_else(|| SatNetError::StoreError(format!("node {node} has no spec in store")))?;
    let mut spec: NodeSpec = serde_json::from_slice(&bytes)
        .map_err(|e| SatNetError::StoreError(format!("malformed node spec for {node}: {e}")))?;

    for antenna in 1..=spec.n_antennas.max(1) {
        kernel.create_bridge(&format!("br{antenna}")).await?;
    }

    let eth0_ip = discover_eth0_ipv4().await?;
    spec.eth0_ip = Some(eth0_ip.clone());
    store
        .put(&keys::node(node), serde_json::to_vec(&spec).unwrap())
        .await?;
    store
        .put(
            &keys::etchosts(node),
            serde_json::to_vec(&HostEntry {
                address: eth0_ip.clone(),
            })
            .unwrap(),
        )
        .await?;

    if spec.l3_config.enable_routing {
        let identifier = spec.l3_config.routing_module.as_deref().unwrap_or("noop");
        let module = Registry::resolve(identifier);
        let (message, ok) = module.init(store, node).await;
        if !ok {
            log::warn!("routing module {identifier} init reported failure: {message}");
        }
    }

    Ok(spec)
}

/// Reads the container's own `eth0` IPv4 address via `ip -4 addr show`.
async fn discover_eth0_ipv4() -> Result<String, SatNetError> {
    let output = tokio::process::Command::new("ip")
        .args(["-4", "-o", "addr", "show", "dev", "eth0"])
        .output()
        .await
        .map_err(|e| SatNetError::KernelOpError(format!("ip addr show eth0 failed: {e}")))?;

    if !output.status.success() {
        return Err(SatNetError::KernelOpError(
            "eth0 has no IPv4 address".to_string(),
        ));
    }

    let text = String::from_utf8_lossy(&output.stdout);
    text.split_whitespace()
        .find(|token| token.contains('/') && token.chars().next().is_some_and(|c| c.is_ascii_digit()))
        .and_then(|token| token.split('/').next())
        .map(str::to_string)
        .ok_or_else(|| SatNetError::KernelOpError("could not parse eth0 address".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use satnet_schema::model::LinkRecord;
    use satnet_store::FakeStore;

    struct FakeKernel;

    #[async_trait]
    impl KernelOps for FakeKernel {
        async fn create_bridge(&self, _name: &str) -> Result<(), SatNetError> {
            Ok(())
        }
        async fn iface_exists(&self, _name: &str) -> Result<bool, SatNetError> {
            Ok(false)
        }
        async fn iface_vni(&self, _name: &str) -> Result<Option<u32>, SatNetError> {
            Ok(None)
        }
        async fn create_vxlan(
            &self,
            _iface: &str,
            _vni: u32,
            _remote: &str,
            _local: &str,
        ) -> Result<(), SatNetError> {
            Ok(())
        }
        async fn attach_to_bridge(&self, _iface: &str, _bridge: &str) -> Result<(), SatNetError> {
            Ok(())
        }
        async fn delete_iface(&self, _iface: &str) -> Result<(), SatNetError> {
            Ok(())
        }
        async fn apply_netem(&self, _iface: &str, _link: &LinkRecord) -> Result<(), SatNetError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn missing_node_spec_is_an_error() {
        let store = FakeStore::new();
        let kernel = FakeKernel;
        let result = initialize("sat1", &store, &kernel).await;
        assert!(result.is_err());
    }
}
