//! Routing-module registry (§6 "Routing-module interface", §9 REDESIGN
//! FLAGS "dynamic routing-module loading").
//!
//! The wire contract is language-neutral: `init`/`link_add`/`link_del`
//! each take a store handle and node name (plus an interface name for the
//! link hooks) and return `(message, ok)`. Modules must be idempotent and
//! must never panic; failure is reported through the boolean, not `Err`.

mod ip_route;
mod noop;
mod subprocess;

use std::sync::Arc;

use satnet_store::Store;

pub use ip_route::IpRouteModule;
pub use noop::NoopModule;
pub use subprocess::SubprocessModule;

/// One routing-module implementation, compiled-in or a subprocess proxy.
#[async_trait::async_trait]
pub trait RoutingModule: Send + Sync {
    async fn init(&self, store: &dyn Store, node: &str) -> (String, bool);

    async fn link_add(&self, store: &dyn Store, node: &str, iface: &str) -> (String, bool);

    async fn link_del(&self, store: &dyn Store, node: &str, iface: &str) -> (String, bool);
}

/// Maps a `routing-module` identifier (as set in `NodeSpec.l3_config`) to a
/// constructed [`RoutingModule`]. Unknown identifiers outside the
/// compiled-in set are assumed to name an external subprocess by path.
pub struct Registry;

impl Registry {
    /// Resolves `identifier` to a module instance. `"noop"` and `"ip-route"`
    /// are compiled in; anything else is treated as the path to an
    /// external executable speaking the subprocess protocol.
    pub fn resolve(identifier: &str) -> Arc<dyn RoutingModule> {
        match identifier {
            "noop" | "" => Arc::new(NoopModule),
            "ip-route" => Arc::new(IpRouteModule),
            path => Arc::new(SubprocessModule::new(path)),
        }
    }
}

/// Static routes to install, read out of `NodeSpec.l3_config.routing_metadata`
/// by [`IpRouteModule`] (`{"routes": [{"dest": "...", "via": "..."}]}`).
pub fn static_routes_from_metadata(metadata: &serde_json::Value) -> Vec<(String, String)> {
    metadata
        .get("routes")
        .and_then(|v| v.as_array())
        .map(|routes| {
            routes
                .iter()
                .filter_map(|r| {
                    let dest = r.get("dest")?.as_str()?.to_string();
                    let via = r.get("via")?.as_str()?.to_string();
                    Some((dest, via))
                })
                .collect()
        })
        .unwrap_or_default()
}
