//! `satnet oracle` (§4.5 ambient note): an operator-facing preprocessing
//! step ahead of `run` that folds the routing precompiler into the CLI
//! surface. Reads a directory of epoch files plus the published node
//! directory, and writes the precompiled set (originals, drain files,
//! post-create files) to an output directory for `run`/`--interactive` to
//! consume.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use satnet_oracle::{precompile, NodeDirectory, NodeInfo, PrecompileInput};
use satnet_schema::keys;
use satnet_store::Store;

#[derive(Args, Debug)]
pub struct OracleArgs {
    #[arg(long, value_name = "DIR")]
    pub input_dir: PathBuf,
    #[arg(long, value_name = "DIR")]
    pub output_dir: PathBuf,
    #[arg(long, default_value = "epoch-*.json")]
    pub file_pattern: String,
    /// Node types the precompiler generates routes for (comma-separated).
    #[arg(long, value_delimiter = ',', default_value = "satellite")]
    pub routed_types: Vec<String>,
    /// Seconds before the triggering epoch to emit the drain (secondary
    /// next-hop) file; 0 disables drain-file generation.
    #[arg(long, default_value_t = 0)]
    pub drain_offset: i64,
    /// Seconds after the triggering epoch to emit the post-create (primary
    /// next-hop) file.
    #[arg(long, default_value_t = 1)]
    pub creation_offset: i64,
}

pub async fn execute(args: OracleArgs) -> Result<()> {
    let store = crate::store::connect().await?;
    let node_dir = load_node_directory(store.as_ref()).await?;

    let paths = satnet_scheduler::directory::list_epoch_files(&args.input_dir, &args.file_pattern)?;
    let mut inputs = Vec::with_capacity(paths.len());
    for path in &paths {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading {path:?}"))?;
        let file: satnet_schema::model::EpochFile =
            serde_json::from_slice(&bytes).with_context(|| format!("parsing {path:?}"))?;
        let time = proxmox_time::parse_rfc3339(&file.time)
            .with_context(|| format!("parsing time field in {path:?}"))?;
        inputs.push(PrecompileInput { time, file });
    }

    let outputs = precompile(
        &inputs,
        &node_dir,
        &args.routed_types,
        args.drain_offset,
        args.creation_offset,
    )?;

    tokio::fs::create_dir_all(&args.output_dir)
        .await
        .with_context(|| format!("creating {:?}", args.output_dir))?;
    for (index, file) in outputs.iter().enumerate() {
        let path = args.output_dir.join(format!("epoch-{index}.json"));
        let bytes = serde_json::to_vec_pretty(file)?;
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("writing {path:?}"))?;
    }

    log::info!(
        "precompiled {} input file(s) into {} output file(s) under {:?}",
        inputs.len(),
        outputs.len(),
        args.output_dir
    );
    Ok(())
}

async fn load_node_directory(store: &dyn Store) -> Result<NodeDirectory> {
    let entries = store.range(keys::CONFIG_NODES_PREFIX).await?;
    let mut directory = NodeDirectory::new();
    for (key, value) in entries {
        let spec: satnet_schema::model::NodeSpec =
            serde_json::from_slice(&value).with_context(|| format!("malformed node record {key:?}"))?;
        directory.insert(
            spec.name.clone(),
            NodeInfo {
                node_type: spec.node_type,
                overlay_cidr: spec.l3_config.cidr,
            },
        );
    }
    Ok(directory)
}
