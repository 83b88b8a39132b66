//! Immutable per-turn statistics records.
//!
//! These records are the data contract with external reporting and plotting
//! layers: one per executed turn, in turn order.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::graph::NodeId;
use crate::network::WarfareNetwork;
use crate::output::NetworkOutput;
use crate::state::NetworkState;

/// Snapshot of a network after a turn's strike and repair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub turn: u32,
    pub network_output: f64,
    /// Workers assigned to nodes.
    pub total_workers: u64,
    pub reserve_workers: u64,
    pub destroyed_nodes: u32,
    pub damaged_nodes: u32,
    pub destroyed_edges: u32,
    pub damaged_edges: u32,
    /// Cumulative casualties since construction.
    pub workers_killed: u64,
    pub avg_node_capacity: f64,
    pub avg_edge_capacity: f64,
    pub avg_workers_per_node: f64,
    pub endpoint_outputs: BTreeMap<NodeId, f64>,
}

#[derive(Default)]
struct DamageTally {
    destroyed: u32,
    damaged: u32,
    mean: f64,
}

fn tally(capacities: &[f64]) -> DamageTally {
    if capacities.is_empty() {
        return DamageTally::default();
    }
    let mut out = DamageTally::default();
    let mut sum = 0.0;
    for &cap in capacities {
        sum += cap;
        if cap == 0.0 {
            out.destroyed += 1;
        } else if cap < 1.0 {
            out.damaged += 1;
        }
    }
    #[allow(clippy::cast_precision_loss)]
    let len = capacities.len() as f64;
    out.mean = sum / len;
    out
}

impl SimulationStats {
    /// Build a record from the current state and its computed output.
    #[must_use]
    pub fn capture(turn: u32, state: &NetworkState, output: NetworkOutput) -> Self {
        let nodes = tally(state.node_capacities());
        let edges = tally(state.edge_capacities());
        let total_workers = state.assigned_workers();
        let node_count = state.worker_counts().len();
        #[allow(clippy::cast_precision_loss)]
        let avg_workers_per_node = if node_count == 0 {
            0.0
        } else {
            total_workers as f64 / node_count as f64
        };
        Self {
            turn,
            network_output: output.total,
            total_workers,
            reserve_workers: state.reserve(),
            destroyed_nodes: nodes.destroyed,
            damaged_nodes: nodes.damaged,
            destroyed_edges: edges.destroyed,
            damaged_edges: edges.damaged,
            workers_killed: state.workers_killed(),
            avg_node_capacity: nodes.mean,
            avg_edge_capacity: edges.mean,
            avg_workers_per_node,
            endpoint_outputs: output.per_endpoint,
        }
    }

    /// Assigned plus reserve workers.
    #[must_use]
    pub const fn workforce(&self) -> u64 {
        self.total_workers.saturating_add(self.reserve_workers)
    }
}

impl WarfareNetwork {
    /// Statistics for the network as it stands, labelled with `turn`.
    #[must_use]
    pub fn statistics(&self, turn: u32) -> SimulationStats {
        SimulationStats::capture(turn, &self.state, self.network_output())
    }
}
