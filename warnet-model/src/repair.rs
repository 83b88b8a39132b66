//! Per-turn recovery of capacities and workforce.
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::RepairCfg;
use crate::graph::{EdgeId, NodeId};
use crate::network::WarfareNetwork;
use crate::state::NetworkState;

/// Summary of one repair pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairReport {
    pub nodes_repaired: u32,
    pub edges_repaired: u32,
    /// Workers added to the reserve by natural growth.
    pub workers_grown: u64,
    /// Workers moved from the reserve onto understaffed nodes.
    pub workers_assigned: u64,
}

impl WarfareNetwork {
    /// Run the repair and replenishment pass for the current turn.
    pub fn repair_and_replenish(&mut self) -> RepairReport {
        repair_and_replenish(&mut self.state, &self.config.repair)
    }
}

/// Repair nodes and edges, grow the reserve, then restaff nodes from it.
///
/// - a damaged, staffed node recovers `node_rate * staffing * (1 - capacity)`;
/// - a damaged edge recovers `edge_rate * (1 - capacity)`;
/// - while the workforce is below the initial assignment the reserve grows by
///   `floor(workforce * daily_growth_rate)`, never past that assignment;
/// - nodes are restaffed in ascending id order until the reserve runs dry.
pub fn repair_and_replenish(state: &mut NetworkState, cfg: &RepairCfg) -> RepairReport {
    let mut report = RepairReport {
        nodes_repaired: repair_nodes(state, cfg.node_rate),
        edges_repaired: repair_edges(state, cfg.edge_rate),
        ..RepairReport::default()
    };

    report.workers_grown = grow_reserve(state, cfg.daily_growth_rate());
    if report.workers_grown > 0 {
        debug!("Replenished {} workers to the reserve", report.workers_grown);
    }

    for idx in 0..state.worker_counts().len() {
        if state.reserve() == 0 {
            break;
        }
        #[allow(clippy::cast_possible_truncation)]
        let node = NodeId(idx as u32);
        let moved = state.staff_from_reserve(node);
        if moved > 0 {
            trace!("Added {moved} workers to node {node}");
            report.workers_assigned += moved;
        }
    }
    report
}

fn repair_nodes(state: &mut NetworkState, rate: f64) -> u32 {
    let mut repaired = 0;
    for idx in 0..state.node_capacities().len() {
        #[allow(clippy::cast_possible_truncation)]
        let node = NodeId(idx as u32);
        let capacity = state.node_capacity(node);
        if capacity >= 1.0 || state.workers(node) == 0 {
            continue;
        }
        let amount = rate * state.staffing(node) * (1.0 - capacity);
        state.set_node_capacity(node, (capacity + amount).min(1.0));
        if amount > 0.0 {
            trace!("Node {node} repaired by {amount:.4}");
            repaired += 1;
        }
    }
    repaired
}

fn repair_edges(state: &mut NetworkState, rate: f64) -> u32 {
    let mut repaired = 0;
    for idx in 0..state.edge_capacities().len() {
        #[allow(clippy::cast_possible_truncation)]
        let edge = EdgeId(idx as u32);
        let capacity = state.edge_capacity(edge);
        if capacity >= 1.0 {
            continue;
        }
        let amount = rate * (1.0 - capacity);
        state.set_edge_capacity(edge, (capacity + amount).min(1.0));
        if amount > 0.0 {
            repaired += 1;
        }
    }
    repaired
}

fn grow_reserve(state: &mut NetworkState, daily_rate: f64) -> u64 {
    let workforce = state.total_workforce();
    let ceiling = state.initial_workers();
    if workforce >= ceiling {
        return 0;
    }
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let grown = ((workforce as f64 * daily_rate).floor().max(0.0) as u64).min(ceiling - workforce);
    state.grow_reserve(grown);
    grown
}
