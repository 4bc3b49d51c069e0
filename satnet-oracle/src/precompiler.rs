//! Batch transform: epoch files in, epoch files out with injected `ip
//! route` run commands (§4.5). Pure — no async runtime, no store access.

use std::collections::{BTreeMap, BTreeSet};

use satnet_schema::model::EpochFile;
use satnet_schema::SatNetError;

use crate::adjacency::Adjacency;
use crate::dijkstra::next_hops_from;
use crate::types::{overlay_address, NodeDirectory};

/// One input epoch file paired with the overlay addresses resolved from
/// `NodeDirectory` at call time (so the caller owns all I/O).
pub struct PrecompileInput {
    pub time: i64,
    pub file: EpochFile,
}

/// Runs the full pipeline over an already-ordered list of epoch files and
/// returns the merged, timestamp-ordered output set (originals plus
/// generated drain/post-create files).
pub fn precompile(
    inputs: &[PrecompileInput],
    node_dir: &NodeDirectory,
    routed_types: &[String],
    drain_offset: i64,
    creation_offset: i64,
) -> Result<Vec<EpochFile>, SatNetError> {
    let routed: BTreeSet<String> = node_dir
        .iter()
        .filter(|(_, info)| routed_types.iter().any(|t| t == &info.node_type))
        .map(|(name, _)| name.clone())
        .collect();

    let mut adjacency = Adjacency::new();
    let mut out: BTreeMap<i64, EpochFile> = BTreeMap::new();

    for input in inputs {
        for update in input.file.links_add.iter().chain(input.file.links_update.iter()) {
            adjacency.add_edge(update);
        }

        upsert(&mut out, input.time, input.file.clone())?;

        // The drain file is built from the adjacency as it stands before
        // this epoch's deletions land, so a link about to disappear still
        // contributes its current secondary candidates — the whole point
        // of draining ahead of the event rather than reacting to it.
        if drain_offset > 0 {
            let drain_time = input.time - drain_offset;
            let drain_file = build_route_file(drain_time, &adjacency, &routed, node_dir, false)?;
            upsert(&mut out, drain_time, drain_file)?;
        }

        for update in &input.file.links_del {
            adjacency.remove_edge(update);
        }

        let post_time = input.time + creation_offset;
        let post_file = build_route_file(post_time, &adjacency, &routed, node_dir, true)?;
        upsert(&mut out, post_time, post_file)?;
    }

    Ok(out.into_values().collect())
}

fn build_route_file(
    at: i64,
    adjacency: &Adjacency,
    routed: &BTreeSet<String>,
    node_dir: &NodeDirectory,
    primary: bool,
) -> Result<EpochFile, SatNetError> {
    let mut run = std::collections::BTreeMap::new();

    for source in routed {
        let hops = next_hops_from(adjacency, source, routed);
        let mut commands = Vec::new();

        for dest in routed {
            if dest == source {
                continue;
            }
            let Some(dest_info) = node_dir.get(dest) else {
                continue;
            };
            let Some(dest_cidr) = &dest_info.overlay_cidr else {
                continue;
            };

            match hops.get(dest) {
                Some(hop) if primary => {
                    let via = next_hop_address(node_dir, &hop.primary)?;
                    commands.push(format!("ip route replace {dest_cidr} via {via}"));
                }
                Some(hop) => match &hop.secondary {
                    Some(secondary) => {
                        let via = next_hop_address(node_dir, secondary)?;
                        commands.push(format!("ip route replace {dest_cidr} via {via} metric 100"));
                    }
                    None => commands.push(format!("ip route del {dest_cidr}")),
                },
                // Destination unreachable entirely: nothing to (re)create,
                // but a route that existed before must be withdrawn.
                None if !primary => commands.push(format!("ip route del {dest_cidr}")),
                None => {}
            }
        }

        if !commands.is_empty() {
            run.insert(source.clone(), commands);
        }
    }

    Ok(EpochFile {
        time: proxmox_time::epoch_to_rfc3339_utc(at)
            .map_err(|e| SatNetError::EpochParseError {
                file: "generated".to_string(),
                reason: e.to_string(),
            })?,
        links_add: vec![],
        links_update: vec![],
        links_del: vec![],
        run,
    })
}

fn next_hop_address(node_dir: &NodeDirectory, node: &str) -> Result<String, SatNetError> {
    node_dir
        .get(node)
        .and_then(|info| info.overlay_cidr.as_deref())
        .and_then(overlay_address)
        .map(str::to_string)
        .ok_or_else(|| SatNetError::ValidationError(format!("node {node} has no overlay address")))
}

/// Merges `file` into `out` at `time`; a timestamp collision merges the
/// `run` sections (concatenating per-node command lists) while leaving the
/// rest of whichever file already occupies the slot untouched, per §4.5's
/// "merges the generated run sections when timestamps collide".
fn upsert(out: &mut BTreeMap<i64, EpochFile>, time: i64, file: EpochFile) -> Result<(), SatNetError> {
    match out.get_mut(&time) {
        Some(existing) => {
            for (node, commands) in file.run {
                existing.run.entry(node).or_default().extend(commands);
            }
            if existing.links_add.is_empty() {
                existing.links_add = file.links_add;
            }
            if existing.links_update.is_empty() {
                existing.links_update = file.links_update;
            }
            if existing.links_del.is_empty() {
                existing.links_del = file.links_del;
            }
        }
        None => {
            out.insert(time, file);
        }
    }
    Ok(())
}
