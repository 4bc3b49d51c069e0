//! Scheduler loop driving the four release modes (§4.4).

use std::path::{Path, PathBuf};
use std::time::Duration;

use satnet_schema::model::EpochFile;
use satnet_schema::{keys, SatNetError};
use satnet_store::Store;

use crate::clock::VirtualClock;
use crate::directory::list_epoch_files;
use crate::release::apply_epoch_file;

#[derive(Debug, Clone)]
pub enum Mode {
    /// Sleep until each file's virtual release time.
    Default,
    /// Ignore `time`; release one file every `d`.
    FixedWait(Duration),
    /// Don't read the directory up front; watch a queue directory and
    /// release files the instant they appear.
    Interactive { queue_dir: PathBuf },
    /// After exhausting the list, wait `d` and restart from the first file.
    Loop(Duration),
}

pub async fn run(
    store: &dyn Store,
    epoch_dir: &Path,
    file_pattern: &str,
    mode: Mode,
) -> Result<(), SatNetError> {
    match mode {
        Mode::Interactive { queue_dir } => run_interactive(store, &queue_dir, file_pattern).await,
        Mode::FixedWait(delay) => run_fixed_wait(store, epoch_dir, file_pattern, delay).await,
        Mode::Loop(delay) => run_loop(store, epoch_dir, file_pattern, delay).await,
        Mode::Default => run_default(store, epoch_dir, file_pattern).await,
    }
}

async fn read_and_parse(path: &Path) -> Result<EpochFile, SatNetError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| SatNetError::EpochParseError {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;
    serde_json::from_slice(&bytes).map_err(|e| SatNetError::EpochParseError {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Releases each file at `t0 + (time_i - t0)` wall-clock, skipping (with a
/// warning recorded to `/state/last-error`) any file that fails to parse
/// rather than aborting the run (§7/§8 S5).
async fn run_default(store: &dyn Store, epoch_dir: &Path, file_pattern: &str) -> Result<(), SatNetError> {
    let files = list_epoch_files(epoch_dir, file_pattern)?;
    let mut timed = Vec::new();
    for path in &files {
        match read_and_parse(path).await {
            Ok(file) => match proxmox_time::parse_rfc3339(&file.time) {
                Ok(time) => timed.push((time, file)),
                Err(e) => {
                    record_parse_error(
                        store,
                        &SatNetError::EpochParseError {
                            file: path.display().to_string(),
                            reason: e.to_string(),
                        },
                    )
                    .await
                }
            },
            Err(e) => record_parse_error(store, &e).await,
        }
    }

    let Some((t0, _)) = timed.first() else {
        return Ok(());
    };
    let clock = VirtualClock::start(*t0);

    for (time_i, file) in &timed {
        clock.wait_for_release(*time_i).await;
        apply_epoch_file(store, file).await?;
    }
    Ok(())
}

async fn run_fixed_wait(
    store: &dyn Store,
    epoch_dir: &Path,
    file_pattern: &str,
    delay: Duration,
) -> Result<(), SatNetError> {
    let files = list_epoch_files(epoch_dir, file_pattern)?;
    for path in &files {
        tokio::time::sleep(delay).await;
        match read_and_parse(path).await {
            Ok(file) => apply_epoch_file(store, &file).await?,
            Err(e) => record_parse_error(store, &e).await,
        }
    }
    Ok(())
}

async fn run_loop(
    store: &dyn Store,
    epoch_dir: &Path,
    file_pattern: &str,
    delay: Duration,
) -> Result<(), SatNetError> {
    loop {
        run_default(store, epoch_dir, file_pattern).await?;
        tokio::time::sleep(delay).await;
    }
}

/// Watches `queue_dir` by polling (§5: no filesystem-notification crate in
/// the dependency stack) and releases each newly observed file the moment
/// it appears, without scheduling off of `time` — the field is still
/// validated, so a malformed one is reported the same way `read_and_parse`
/// reports other malformed files, rather than being silently applied.
async fn run_interactive(store: &dyn Store, queue_dir: &Path, file_pattern: &str) -> Result<(), SatNetError> {
    let mut seen = std::collections::HashSet::new();
    loop {
        let files = list_epoch_files(queue_dir, file_pattern)?;
        for path in files {
            if !seen.insert(path.clone()) {
                continue;
            }
            match read_and_parse(&path).await {
                Ok(file) => {
                    if let Err(e) = proxmox_time::parse_rfc3339(&file.time) {
                        record_parse_error(
                            store,
                            &SatNetError::EpochParseError {
                                file: path.display().to_string(),
                                reason: e.to_string(),
                            },
                        )
                        .await;
                        continue;
                    }
                    apply_epoch_file(store, &file).await?
                }
                Err(e) => record_parse_error(store, &e).await,
            }
        }
        tokio::time::sleep(Duration::from_millis(250)).await;
    }
}

async fn record_parse_error(store: &dyn Store, error: &SatNetError) {
    log::warn!("skipping malformed epoch file: {error}");
    let _ = store
        .put(keys::STATE_LAST_ERROR, error.to_string().into_bytes())
        .await;
}
