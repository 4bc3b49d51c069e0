//! In-memory [`Store`] used by the test suites of dependent crates.
//!
//! Implements the same trait as [`crate::etcd::EtcdStore`] so production
//! reconciliation code paths are exercised verbatim without a live etcd.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use satnet_schema::SatNetError;
use tokio::sync::mpsc;

use crate::traits::{Store, TxnOp, WatchEvent};

struct Inner {
    data: BTreeMap<String, Vec<u8>>,
    revision: i64,
    watchers: Vec<(String, mpsc::Sender<WatchEvent>)>,
}

pub struct FakeStore {
    inner: Mutex<Inner>,
}

impl Default for FakeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                data: BTreeMap::new(),
                revision: 0,
                watchers: Vec::new(),
            }),
        }
    }

    fn notify(inner: &mut Inner, event: WatchEvent, key: &str) {
        inner.watchers.retain(|(prefix, tx)| {
            if key.starts_with(prefix.as_str()) {
                let _ = tx.try_send(event.clone());
                !tx.is_closed()
            } else {
                true
            }
        });
    }
}

#[async_trait]
impl Store for FakeStore {
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), SatNetError> {
        let mut inner = self.inner.lock().unwrap();
        inner.revision += 1;
        let revision = inner.revision;
        inner.data.insert(key.to_string(), value.clone());
        Self::notify(
            &mut inner,
            WatchEvent::Put {
                key: key.to_string(),
                value,
                revision,
            },
            key,
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SatNetError> {
        let mut inner = self.inner.lock().unwrap();
        inner.revision += 1;
        let revision = inner.revision;
        inner.data.remove(key);
        Self::notify(
            &mut inner,
            WatchEvent::Delete {
                key: key.to_string(),
                revision,
            },
            key,
        );
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<(), SatNetError> {
        let mut inner = self.inner.lock().unwrap();
        let keys: Vec<String> = inner
            .data
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect();
        for key in keys {
            inner.revision += 1;
            let revision = inner.revision;
            inner.data.remove(&key);
            Self::notify(&mut inner, WatchEvent::Delete { key: key.clone(), revision }, &key);
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, SatNetError> {
        Ok(self.inner.lock().unwrap().data.get(key).cloned())
    }

    async fn range(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, SatNetError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .data
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    async fn txn(&self, ops: Vec<TxnOp>) -> Result<(), SatNetError> {
        let mut inner = self.inner.lock().unwrap();
        inner.revision += 1;
        let revision = inner.revision;
        let mut events = Vec::new();
        for op in ops {
            match op {
                TxnOp::Put { key, value } => {
                    inner.data.insert(key.clone(), value.clone());
                    events.push((
                        key.clone(),
                        WatchEvent::Put {
                            key,
                            value,
                            revision,
                        },
                    ));
                }
                TxnOp::Delete { key } => {
                    inner.data.remove(&key);
                    events.push((key.clone(), WatchEvent::Delete { key, revision }));
                }
            }
        }
        for (key, event) in events {
            Self::notify(&mut inner, event, &key);
        }
        Ok(())
    }

    async fn watch_prefix(
        &self,
        prefix: &str,
    ) -> Result<mpsc::Receiver<WatchEvent>, SatNetError> {
        let (tx, rx) = mpsc::channel(256);
        let mut inner = self.inner.lock().unwrap();
        let _ = tx.try_send(WatchEvent::ResyncRequired);
        inner.watchers.push((prefix.to_string(), tx));
        Ok(rx)
    }
}
