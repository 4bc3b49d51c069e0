use satnet_store::Store;

use super::RoutingModule;

/// Installs no routes; used when `enable-routing` is false or as the
/// default for node types that rely purely on the overlay topology.
pub struct NoopModule;

#[async_trait::async_trait]
impl RoutingModule for NoopModule {
    async fn init(&self, _store: &dyn Store, _node: &str) -> (String, bool) {
        ("noop: nothing to initialize".to_string(), true)
    }

    async fn link_add(&self, _store: &dyn Store, _node: &str, _iface: &str) -> (String, bool) {
        ("noop: ignoring link add".to_string(), true)
    }

    async fn link_del(&self, _store: &dyn Store, _node: &str, _iface: &str) -> (String, bool) {
        ("noop: ignoring link del".to_string(), true)
    }
}
