//! Sparse undirected adjacency, maintained across epoch files (§4.5 step 1-2).

use std::collections::{BTreeSet, HashMap};

use satnet_schema::model::LinkUpdate;

#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    neighbors: HashMap<String, BTreeSet<String>>,
}

impl Adjacency {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn neighbors_of(&self, node: &str) -> impl Iterator<Item = &str> {
        self.neighbors
            .get(node)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.neighbors.keys().map(String::as_str)
    }

    /// Applies a `links-del` entry: removes the edge if present, a no-op otherwise.
    pub fn remove_edge(&mut self, update: &LinkUpdate) {
        if let Some(set) = self.neighbors.get_mut(&update.endpoint1) {
            set.remove(&update.endpoint2);
        }
        if let Some(set) = self.neighbors.get_mut(&update.endpoint2) {
            set.remove(&update.endpoint1);
        }
    }

    /// Applies a `links-add`/`links-update` entry: idempotent, inserting
    /// both directions of the edge.
    pub fn add_edge(&mut self, update: &LinkUpdate) {
        self.neighbors
            .entry(update.endpoint1.clone())
            .or_default()
            .insert(update.endpoint2.clone());
        self.neighbors
            .entry(update.endpoint2.clone())
            .or_default()
            .insert(update.endpoint1.clone());
    }
}
