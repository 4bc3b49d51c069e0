//! T3 — task runner (§4.3).

use std::sync::Arc;

use tokio::sync::Mutex as AsyncMutex;

use satnet_schema::model::{RunResult, TaskList};
use satnet_schema::{keys, SatNetError};
use satnet_store::{Store, WatchEvent};

/// Watches `/config/run/{node}` and executes each observed array of shell
/// commands sequentially, reporting the last exit code at
/// `/state/run/{node}`. Commands are never retried automatically; a
/// long-running command is expected to self-detach.
///
/// `kernel_lock` is the same lock [`crate::linkmanager::LinkManager`] holds
/// while reconciling links, so a task batch and a link reconciliation never
/// run their host-mutating commands at the same time (§4.3: "link
/// reconciliation and task execution never overlap").
pub async fn run(node: &str, store: &dyn Store, kernel_lock: Arc<AsyncMutex<()>>) -> Result<(), SatNetError> {
    let key = keys::run(node);
    loop {
        let mut rx = store.watch_prefix(&key).await?;
        while let Some(event) = rx.recv().await {
            match event {
                WatchEvent::Put { value, .. } => {
                    if let Err(e) = execute_batch(node, store, &value, &kernel_lock).await {
                        log::warn!("task batch for {node} failed: {e}");
                    }
                }
                WatchEvent::Delete { .. } => {}
                WatchEvent::ResyncRequired => {
                    if let Some(value) = store.get(&key).await? {
                        if let Err(e) = execute_batch(node, store, &value, &kernel_lock).await {
                            log::warn!("task batch for {node} failed on resync: {e}");
                        }
                    }
                }
                WatchEvent::Fatal(message) => {
                    return Err(SatNetError::StoreError(message));
                }
            }
        }
    }
}

async fn execute_batch(
    node: &str,
    store: &dyn Store,
    value: &[u8],
    kernel_lock: &AsyncMutex<()>,
) -> Result<(), SatNetError> {
    let _kernel_guard = kernel_lock.lock().await;
    let commands: TaskList = serde_json::from_slice(value)
        .map_err(|e| SatNetError::StoreError(format!("malformed run list for {node}: {e}")))?;

    let mut last = RunResult {
        exit_code: 0,
        command: String::new(),
    };

    for command in commands {
        let output = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(&command)
            .output()
            .await
            .map_err(|e| SatNetError::KernelOpError(format!("spawn of {command:?} failed: {e}")))?;

        last = RunResult {
            exit_code: output.status.code().unwrap_or(-1),
            command: command.clone(),
        };

        store
            .put(&keys::state_run(node), serde_json::to_vec(&last).unwrap())
            .await?;

        if !output.status.success() {
            log::warn!(
                "command {command:?} on {node} exited {}: {}",
                last.exit_code,
                String::from_utf8_lossy(&output.stderr)
            );
        }
    }

    Ok(())
}
