//! `Store` implementation backed by `etcd-client`.

use async_trait::async_trait;
use etcd_client::{Client, Compare, CompareOp, EventType, GetOptions, Txn, TxnOp as EtcdTxnOp, WatchOptions};
use satnet_schema::SatNetError;
use tokio::sync::mpsc;

use crate::backoff::Backoff;
use crate::traits::{Store, TxnOp, WatchEvent};

pub struct EtcdStore {
    client: Client,
}

impl EtcdStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn store_err(err: etcd_client::Error) -> SatNetError {
    SatNetError::StoreError(err.to_string())
}

#[async_trait]
impl Store for EtcdStore {
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), SatNetError> {
        self.client
            .kv_client()
            .put(key, value, None)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SatNetError> {
        self.client
            .kv_client()
            .delete(key, None)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<(), SatNetError> {
        self.client
            .kv_client()
            .delete(prefix, Some(etcd_client::DeleteOptions::new().with_prefix()))
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, SatNetError> {
        let resp = self
            .client
            .kv_client()
            .get(key, None)
            .await
            .map_err(store_err)?;
        Ok(resp.kvs().first().map(|kv| kv.value().to_vec()))
    }

    async fn range(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, SatNetError> {
        let resp = self
            .client
            .kv_client()
            .get(prefix, Some(GetOptions::new().with_prefix()))
            .await
            .map_err(store_err)?;
        resp.kvs()
            .iter()
            .map(|kv| {
                let key = kv
                    .key_str()
                    .map_err(store_err)?
                    .to_string();
                Ok((key, kv.value().to_vec()))
            })
            .collect()
    }

    async fn txn(&self, ops: Vec<TxnOp>) -> Result<(), SatNetError> {
        let etcd_ops: Vec<EtcdTxnOp> = ops
            .into_iter()
            .map(|op| match op {
                TxnOp::Put { key, value } => EtcdTxnOp::put(key, value, None),
                TxnOp::Delete { key } => EtcdTxnOp::delete(key, None),
            })
            .collect();

        // Unconditional transaction: every op always runs in the "then" branch.
        // Atomicity comes from etcd applying the whole batch as one revision.
        let txn = Txn::new()
            .when(Vec::<Compare>::new())
            .and_then(etcd_ops)
            .or_else(Vec::<EtcdTxnOp>::new());

        self.client
            .kv_client()
            .txn(txn)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn watch_prefix(
        &self,
        prefix: &str,
    ) -> Result<mpsc::Receiver<WatchEvent>, SatNetError> {
        let (tx, rx) = mpsc::channel(256);
        let mut watch_client = self.client.watch_client();
        let prefix = prefix.to_string();

        tokio::spawn(async move {
            let mut backoff = Backoff::new();
            loop {
                let (mut watcher, mut stream) = match watch_client
                    .watch(prefix.clone(), Some(WatchOptions::new().with_prefix()))
                    .await
                {
                    Ok(pair) => pair,
                    Err(err) => {
                        if tx
                            .send(WatchEvent::Fatal(format!("watch setup failed: {err}")))
                            .await
                            .is_err()
                        {
                            return;
                        }
                        tokio::time::sleep(backoff.next_delay()).await;
                        continue;
                    }
                };
                let _ = watcher.request_progress().await;
                backoff.reset();

                if tx.send(WatchEvent::ResyncRequired).await.is_err() {
                    return;
                }

                loop {
                    match stream.message().await {
                        Ok(Some(resp)) => {
                            for event in resp.events() {
                                let Some(kv) = event.kv() else { continue };
                                let key = match kv.key_str() {
                                    Ok(k) => k.to_string(),
                                    Err(_) => continue,
                                };
                                let revision = kv.mod_revision();
                                let forwarded = match event.event_type() {
                                    EventType::Put => WatchEvent::Put {
                                        key,
                                        value: kv.value().to_vec(),
                                        revision,
                                    },
                                    EventType::Delete => WatchEvent::Delete { key, revision },
                                };
                                if tx.send(forwarded).await.is_err() {
                                    return;
                                }
                            }
                        }
                        Ok(None) => break,
                        Err(_) => break,
                    }
                }

                tokio::time::sleep(backoff.next_delay()).await;
            }
        });

        Ok(rx)
    }
}
