use satnet_store::Store;
use tokio::process::Command;

use super::{static_routes_from_metadata, RoutingModule};

/// Reference module: shells static routes out of
/// `NodeSpec.l3_config.routing_metadata` via `ip route`. Meant as a
/// worked example for out-of-tree modules, not a routing protocol.
pub struct IpRouteModule;

impl IpRouteModule {
    async fn apply_route(&self, dest: &str, via: &str, delete: bool) -> (String, bool) {
        let verb = if delete { "del" } else { "replace" };
        let output = Command::new("ip")
            .args(["route", verb, dest, "via", via])
            .output()
            .await;
        match output {
            Ok(out) if out.status.success() => (format!("route {verb} {dest} via {via}"), true),
            Ok(out) => (
                format!(
                    "route {verb} {dest} via {via} failed: {}",
                    String::from_utf8_lossy(&out.stderr)
                ),
                false,
            ),
            Err(e) => (format!("route {verb} {dest} via {via}: {e}"), false),
        }
    }
}

#[async_trait::async_trait]
impl RoutingModule for IpRouteModule {
    async fn init(&self, _store: &dyn Store, node: &str) -> (String, bool) {
        (format!("ip-route: initialized for {node}"), true)
    }

    async fn link_add(&self, store: &dyn Store, node: &str, iface: &str) -> (String, bool) {
        let key = satnet_schema::keys::node(node);
        let metadata = match store.get(&key).await {
            Ok(Some(bytes)) => serde_json::from_slice::<satnet_schema::model::NodeSpec>(&bytes)
                .map(|spec| spec.l3_config.routing_metadata)
                .unwrap_or_default(),
            _ => serde_json::Value::Null,
        };

        let routes = static_routes_from_metadata(&metadata);
        if routes.is_empty() {
            return (format!("ip-route: no static routes for {iface}"), true);
        }

        let mut ok = true;
        let mut messages = Vec::new();
        for (dest, via) in routes {
            let (message, route_ok) = self.apply_route(&dest, &via, false).await;
            ok &= route_ok;
            messages.push(message);
        }
        (messages.join("; "), ok)
    }

    async fn link_del(&self, store: &dyn Store, node: &str, iface: &str) -> (String, bool) {
        let key = satnet_schema::keys::node(node);
        let metadata = match store.get(&key).await {
            Ok(Some(bytes)) => serde_json::from_slice::<satnet_schema::model::NodeSpec>(&bytes)
                .map(|spec| spec.l3_config.routing_metadata)
                .unwrap_or_default(),
            _ => serde_json::Value::Null,
        };

        let routes = static_routes_from_metadata(&metadata);
        if routes.is_empty() {
            return (format!("ip-route: no static routes for {iface}"), true);
        }

        let mut ok = true;
        let mut messages = Vec::new();
        for (dest, via) in routes {
            let (message, route_ok) = self.apply_route(&dest, &via, true).await;
            ok &= route_ok;
            messages.push(message);
        }
        (messages.join("; "), ok)
    }
}
