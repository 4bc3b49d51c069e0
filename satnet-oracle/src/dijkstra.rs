//! Shortest-path next-hop computation (§4.5 step 3).
//!
//! Hop count, unit edge weight, ties broken by lexicographically smallest
//! neighbor name. A `BinaryHeap`-based Dijkstra rather than a plain BFS,
//! to keep the door open for weighted links without a rewrite.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::adjacency::Adjacency;

#[derive(Eq, PartialEq)]
struct HeapEntry {
    distance: u32,
    node: String,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap` (a max-heap) pops the smallest distance
        // first; ties broken by lexicographically smallest node name.
        other
            .distance
            .cmp(&self.distance)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest hop-count distance from `source` to every reachable node.
pub fn shortest_distances(adjacency: &Adjacency, source: &str) -> HashMap<String, u32> {
    let mut distances = HashMap::new();
    let mut heap = BinaryHeap::new();

    distances.insert(source.to_string(), 0u32);
    heap.push(HeapEntry {
        distance: 0,
        node: source.to_string(),
    });

    while let Some(HeapEntry { distance, node }) = heap.pop() {
        if distances.get(&node).is_some_and(|&best| best < distance) {
            continue;
        }
        for neighbor in adjacency.neighbors_of(&node) {
            let next = distance + 1;
            let better = distances
                .get(neighbor)
                .is_none_or(|&current| next < current);
            if better {
                distances.insert(neighbor.to_string(), next);
                heap.push(HeapEntry {
                    distance: next,
                    node: neighbor.to_string(),
                });
            }
        }
    }

    distances
}

/// Primary and (optionally) secondary next hop from `source` toward one
/// destination: the secondary is the best alternative whose first hop
/// differs from the primary's, used to pre-migrate traffic off a link
/// about to be deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextHops {
    pub primary: String,
    pub secondary: Option<String>,
}

/// Computes `{primary, secondary}` next hops from `source` to every other
/// node reachable in `adjacency`, restricted to `routed` destinations.
pub fn next_hops_from(
    adjacency: &Adjacency,
    source: &str,
    routed: &std::collections::BTreeSet<String>,
) -> HashMap<String, NextHops> {
    let mut result = HashMap::new();

    // distance-from-neighbor tables, one per first-hop candidate, reused
    // across all destinations for this source.
    let neighbor_distances: Vec<(String, HashMap<String, u32>)> = adjacency
        .neighbors_of(source)
        .map(|n| (n.to_string(), shortest_distances(adjacency, n)))
        .collect();

    for dest in routed {
        if dest == source {
            continue;
        }

        // via_dist(n) = 1 if n == dest, else 1 + dist(n, dest); unreachable
        // candidates are dropped.
        let mut candidates: Vec<(u32, &str)> = neighbor_distances
            .iter()
            .filter_map(|(neighbor, distances)| {
                if neighbor == dest {
                    Some((1u32, neighbor.as_str()))
                } else {
                    distances.get(dest).map(|d| (d + 1, neighbor.as_str()))
                }
            })
            .collect();

        if candidates.is_empty() {
            continue;
        }

        candidates.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
        let primary = candidates[0].1.to_string();
        let secondary = candidates
            .iter()
            .find(|(_, n)| *n != primary)
            .map(|(_, n)| n.to_string());

        result.insert(dest.clone(), NextHops { primary, secondary });
    }

    result
}
