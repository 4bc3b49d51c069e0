//! Release semantics for one epoch file (§4.4 step "Release semantics").

use satnet_schema::model::{EpochFile, LinkRecord, LinkUpdate};
use satnet_schema::{keys, vni, SatNetError};
use satnet_store::{Store, TxnOp};

/// Applies `file`'s link/task deltas as a single atomic transaction,
/// ordered `delete → add → update → run` so a re-homing event (delete
/// A-B, add A-C) never races on the consumer side.
pub async fn apply_epoch_file(store: &dyn Store, file: &EpochFile) -> Result<(), SatNetError> {
    let mut ops = Vec::new();

    for update in &file.links_del {
        delete_link_ops(&mut ops, update);
    }
    for update in &file.links_add {
        add_or_update_link_ops(store, &mut ops, update, false).await?;
    }
    for update in &file.links_update {
        add_or_update_link_ops(store, &mut ops, update, true).await?;
    }
    for (node, commands) in &file.run {
        ops.push(TxnOp::put(keys::run(node), serde_json::to_vec(commands).unwrap()));
    }

    store.txn(ops).await
}

fn delete_link_ops(ops: &mut Vec<TxnOp>, update: &LinkUpdate) {
    ops.push(TxnOp::delete(keys::link(
        &update.endpoint1,
        &keys::iface_name(&update.endpoint2, update.endpoint2_antenna),
    )));
    ops.push(TxnOp::delete(keys::link(
        &update.endpoint2,
        &keys::iface_name(&update.endpoint1, update.endpoint1_antenna),
    )));
}

/// Handles both `links-add` and `links-update` entries: an add onto an
/// existing link is treated as an update (merged shaping); an add onto a
/// missing link creates it. An update onto a missing link is logged and
/// ignored, never fatal — there is no record to merge into.
async fn add_or_update_link_ops(
    store: &dyn Store,
    ops: &mut Vec<TxnOp>,
    update: &LinkUpdate,
    is_update: bool,
) -> Result<(), SatNetError> {
    let vni = vni::compute_vni(
        &update.endpoint1,
        update.endpoint1_antenna,
        &update.endpoint2,
        update.endpoint2_antenna,
    );

    let key1 = keys::link(
        &update.endpoint1,
        &keys::iface_name(&update.endpoint2, update.endpoint2_antenna),
    );
    let key2 = keys::link(
        &update.endpoint2,
        &keys::iface_name(&update.endpoint1, update.endpoint1_antenna),
    );

    let existing1 = store.get(&key1).await?;
    let existing2 = store.get(&key2).await?;

    if is_update && (existing1.is_none() || existing2.is_none()) {
        log::warn!(
            "ignoring links-update for missing link {}<->{}",
            update.endpoint1,
            update.endpoint2
        );
        return Ok(());
    }

    let record1 = merge_or_new(existing1, update, vni)?;
    let record2 = merge_or_new(existing2, update, vni)?;

    ops.push(TxnOp::put(key1, serde_json::to_vec(&record1).unwrap()));
    ops.push(TxnOp::put(key2, serde_json::to_vec(&record2).unwrap()));
    Ok(())
}

fn merge_or_new(
    existing: Option<Vec<u8>>,
    update: &LinkUpdate,
    vni: u32,
) -> Result<LinkRecord, SatNetError> {
    match existing {
        Some(bytes) => {
            let mut record: LinkRecord = serde_json::from_slice(&bytes).map_err(|e| {
                SatNetError::EpochParseError {
                    file: "link record".to_string(),
                    reason: e.to_string(),
                }
            })?;
            record.merge_update(update);
            record.vni = vni;
            Ok(record)
        }
        None => Ok(LinkRecord {
            endpoint1: update.endpoint1.clone(),
            endpoint2: update.endpoint2.clone(),
            endpoint1_antenna: update.endpoint1_antenna,
            endpoint2_antenna: update.endpoint2_antenna,
            rate: update.rate.clone(),
            loss: update.loss.clone(),
            delay: update.delay.clone(),
            limit: update.limit,
            vni,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satnet_store::FakeStore;
    use std::collections::BTreeMap;

    fn link_update(ep1: &str, ep2: &str) -> LinkUpdate {
        LinkUpdate {
            endpoint1: ep1.to_string(),
            endpoint2: ep2.to_string(),
            endpoint1_antenna: 1,
            endpoint2_antenna: 1,
            rate: None,
            loss: None,
            delay: Some("10ms".to_string()),
            limit: None,
        }
    }

    #[tokio::test]
    async fn add_then_update_preserves_unset_fields() {
        let store = FakeStore::new();
        let file = EpochFile {
            time: "2030-01-01T00:00:00Z".to_string(),
            links_add: vec![link_update("sat1", "sat2")],
            links_update: vec![],
            links_del: vec![],
            run: BTreeMap::new(),
        };
        apply_epoch_file(&store, &file).await.unwrap();

        let mut update = link_update("sat1", "sat2");
        update.delay = None;
        update.loss = Some("1%".to_string());
        let file2 = EpochFile {
            time: "2030-01-01T00:00:05Z".to_string(),
            links_add: vec![],
            links_update: vec![update],
            links_del: vec![],
            run: BTreeMap::new(),
        };
        apply_epoch_file(&store, &file2).await.unwrap();

        let raw = store
            .get(&keys::link("sat1", &keys::iface_name("sat2", 1)))
            .await
            .unwrap()
            .unwrap();
        let record: LinkRecord = serde_json::from_slice(&raw).unwrap();
        assert_eq!(record.delay, Some("10ms".to_string()));
        assert_eq!(record.loss, Some("1%".to_string()));
    }

    #[tokio::test]
    async fn update_of_missing_link_is_ignored_not_created() {
        let store = FakeStore::new();
        let file = EpochFile {
            time: "2030-01-01T00:00:00Z".to_string(),
            links_add: vec![],
            links_update: vec![link_update("sat1", "sat2")],
            links_del: vec![],
            run: BTreeMap::new(),
        };
        apply_epoch_file(&store, &file).await.unwrap();

        let raw = store
            .get(&keys::link("sat1", &keys::iface_name("sat2", 1)))
            .await
            .unwrap();
        assert!(raw.is_none());
    }

    #[tokio::test]
    async fn delete_missing_link_is_a_no_op() {
        let store = FakeStore::new();
        let file = EpochFile {
            time: "2030-01-01T00:00:00Z".to_string(),
            links_add: vec![],
            links_update: vec![],
            links_del: vec![link_update("sat1", "sat2")],
            run: BTreeMap::new(),
        };
        assert!(apply_epoch_file(&store, &file).await.is_ok());
    }

    #[tokio::test]
    async fn run_section_replaces_task_list_per_node() {
        let store = FakeStore::new();
        let mut run = BTreeMap::new();
        run.insert("sat1".to_string(), vec!["echo hi".to_string()]);
        let file = EpochFile {
            time: "2030-01-01T00:00:00Z".to_string(),
            links_add: vec![],
            links_update: vec![],
            links_del: vec![],
            run,
        };
        apply_epoch_file(&store, &file).await.unwrap();

        let raw = store.get(&keys::run("sat1")).await.unwrap().unwrap();
        let commands: Vec<String> = serde_json::from_slice(&raw).unwrap();
        assert_eq!(commands, vec!["echo hi".to_string()]);
    }
}
