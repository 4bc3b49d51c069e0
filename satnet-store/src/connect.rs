//! Connection bootstrap from the environment variables specified in §6.

use anyhow::{Context, Result};
use etcd_client::{Client, ConnectOptions, TlsOptions};

/// Reads `ETCD_HOST`, `ETCD_PORT`, `ETCD_USER`, `ETCD_PASSWORD`, `ETCD_CA_CERT`
/// from the environment and connects a client.
pub async fn connect_from_env() -> Result<Client> {
    let host = std::env::var("ETCD_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("ETCD_PORT").unwrap_or_else(|_| "2379".to_string());
    let endpoint = format!("{host}:{port}");

    let mut options = ConnectOptions::new();

    if let (Ok(user), Ok(password)) = (std::env::var("ETCD_USER"), std::env::var("ETCD_PASSWORD"))
    {
        options = options.with_user(user, password);
    }

    if let Ok(ca_cert_path) = std::env::var("ETCD_CA_CERT") {
        let ca_cert = std::fs::read_to_string(&ca_cert_path)
            .with_context(|| format!("failed to read ETCD_CA_CERT at {ca_cert_path:?}"))?;
        let tls = TlsOptions::new().ca_cert_pem(ca_cert);
        options = options.with_tls(tls);
    }

    Client::connect([endpoint], Some(options))
        .await
        .context("failed to connect to store")
}
