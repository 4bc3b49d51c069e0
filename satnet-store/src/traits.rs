//! The `Store` abstraction: a strongly consistent hierarchical key-value
//! store with atomic put/delete, range scans, and ordered watch (§2, §6).

use async_trait::async_trait;
use satnet_schema::SatNetError;

/// One operation inside an atomic [`Store::txn`] batch.
#[derive(Debug, Clone)]
pub enum TxnOp {
    Put { key: String, value: Vec<u8> },
    Delete { key: String },
}

impl TxnOp {
    pub fn put(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        TxnOp::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn delete(key: impl Into<String>) -> Self {
        TxnOp::Delete { key: key.into() }
    }
}

/// A single watch notification, expressed as a result-type event rather
/// than an exception per the REDESIGN FLAGS guidance on watch loops.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    Put {
        key: String,
        value: Vec<u8>,
        revision: i64,
    },
    Delete {
        key: String,
        revision: i64,
    },
    /// The watch stream reconnected after a transient disconnect; the
    /// consumer must perform a full list-then-diff resync (§4.3, §5).
    ResyncRequired,
    /// The watch stream cannot be recovered (e.g. the prefix was compacted
    /// away); the consumer should surface this as a `StoreError`.
    Fatal(String),
}

/// Strongly consistent hierarchical KV store, as specified in §2/§6.
///
/// Keys are UTF-8 paths; values are opaque bytes (always UTF-8 JSON in
/// practice, serialized by callers).
#[async_trait]
pub trait Store: Send + Sync {
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), SatNetError>;

    async fn delete(&self, key: &str) -> Result<(), SatNetError>;

    /// Deletes every key under `prefix` in one request (used by `unlink`/`rm`, §6).
    async fn delete_prefix(&self, prefix: &str) -> Result<(), SatNetError>;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, SatNetError>;

    /// Lists every key/value pair under `prefix`, ordered by key.
    async fn range(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, SatNetError>;

    /// Applies every operation in `ops` as a single atomic transaction:
    /// either all keys are applied or none (§4.1, §4.4).
    async fn txn(&self, ops: Vec<TxnOp>) -> Result<(), SatNetError>;

    /// Opens an ordered watch on every key under `prefix`. The returned
    /// channel yields [`WatchEvent::ResyncRequired`] after every
    /// reconnect, per the reconnect/backoff contract in §5.
    async fn watch_prefix(
        &self,
        prefix: &str,
    ) -> Result<tokio::sync::mpsc::Receiver<WatchEvent>, SatNetError>;
}
