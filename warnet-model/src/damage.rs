//! Precision and area bombing strikes.
//!
//! Each strike is a discrete mutation of the capacity and workforce state;
//! there is no hidden state beyond what [`crate::state::NetworkState`] holds.
use log::debug;
use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

use crate::config::Strategy;
use crate::constants::{DAMAGE_SEVERITY_MAX, DAMAGE_SEVERITY_MIN};
use crate::graph::{EdgeId, NodeId};
use crate::network::WarfareNetwork;

/// What a single strike hit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrikeReport {
    pub nodes_hit: u32,
    pub edges_hit: u32,
    /// Always zero for precision strikes.
    pub workers_killed: u64,
}

impl StrikeReport {
    #[must_use]
    pub const fn targets_hit(&self) -> u32 {
        self.nodes_hit + self.edges_hit
    }
}

impl WarfareNetwork {
    /// Apply `strategy` with `targets` aim points.
    pub fn strike(&mut self, strategy: Strategy, targets: u32) -> StrikeReport {
        match strategy {
            Strategy::Precision => self.precision_bombing(targets),
            Strategy::Area => self.area_bombing(targets),
        }
    }

    /// Damage `min(targets, nodes + edges)` distinct nodes or edges.
    ///
    /// Each hit multiplies the target's capacity by `1 - U(0.5, 1.0)`.
    pub fn precision_bombing(&mut self, targets: u32) -> StrikeReport {
        let node_count = self.graph.node_count() as usize;
        let pool = node_count + self.graph.edge_count();
        let amount = (targets as usize).min(pool);
        debug!("Precision strike: {amount} of {targets} requested targets");

        let mut report = StrikeReport::default();
        if amount == 0 {
            return report;
        }

        for pick in index::sample(&mut self.rng, pool, amount) {
            let severity = self.rng.gen_range(DAMAGE_SEVERITY_MIN..DAMAGE_SEVERITY_MAX);
            let factor = (1.0 - severity).max(0.0);
            if pick < node_count {
                #[allow(clippy::cast_possible_truncation)]
                let node = NodeId(pick as u32);
                let capacity = self.state.scale_node_capacity(node, factor);
                debug!("Node {node} hit with severity {severity:.3}; capacity now {capacity:.4}");
                report.nodes_hit += 1;
            } else {
                #[allow(clippy::cast_possible_truncation)]
                let edge = EdgeId((pick - node_count) as u32);
                let capacity = self.state.scale_edge_capacity(edge, factor);
                debug!(
                    "Edge {} hit with severity {severity:.3}; capacity now {capacity:.4}",
                    edge.0
                );
                report.edges_hit += 1;
            }
        }
        report
    }

    /// Precision-style infrastructure damage plus bounded worker casualties.
    ///
    /// The casualty budget is `min(targets * workers_per_target, max_fraction *
    /// workforce)`. The reserve absorbs casualties first; the remainder falls on
    /// randomly chosen staffed nodes until the budget is spent.
    pub fn area_bombing(&mut self, targets: u32) -> StrikeReport {
        let mut report = self.precision_bombing(targets);
        let budget = self
            .config
            .casualties
            .budget(targets, self.state.total_workforce());

        let mut remaining = budget;
        let from_reserve = self.state.draw_reserve(remaining);
        remaining -= from_reserve;
        if from_reserve > 0 {
            debug!("Removed {from_reserve} workers from the reserve pool");
        }

        if remaining > 0 {
            let mut staffed: Vec<NodeId> = self
                .graph
                .nodes()
                .filter(|&node| self.state.workers(node) > 0)
                .collect();
            while remaining > 0 && !staffed.is_empty() {
                let slot = self.rng.gen_range(0..staffed.len());
                let node = staffed[slot];
                let taken = self.state.draw_node(node, remaining);
                remaining -= taken;
                debug!("Removed {taken} workers from node {node}");
                if self.state.workers(node) == 0 {
                    staffed.swap_remove(slot);
                }
            }
        }

        let killed = budget - remaining;
        self.state.record_killed(killed);
        report.workers_killed = killed;
        debug!(
            "Area strike killed {killed} workers ({} cumulative)",
            self.state.workers_killed()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::graph::NetworkGraph;

    fn network(seed: u64) -> WarfareNetwork {
        WarfareNetwork::new(SimulationConfig::new(10, 20, 10).with_seed(seed)).unwrap()
    }

    fn damaged_targets(net: &WarfareNetwork) -> usize {
        let nodes = net.state().node_capacities().iter().filter(|&&c| c < 1.0);
        let edges = net.state().edge_capacities().iter().filter(|&&c| c < 1.0);
        nodes.count() + edges.count()
    }

    #[test]
    fn precision_hits_exactly_the_requested_distinct_targets() {
        for seed in 0..16 {
            let mut net = network(seed);
            let report = net.precision_bombing(5);
            assert_eq!(report.targets_hit(), 5);
            assert_eq!(report.workers_killed, 0);
            assert_eq!(damaged_targets(&net), 5);
            assert!(
                net.state()
                    .node_capacities()
                    .iter()
                    .chain(net.state().edge_capacities())
                    .all(|&c| (0.0..=0.5).contains(&c) || (c - 1.0).abs() < f64::EPSILON)
            );
        }
    }

    #[test]
    fn precision_clamps_oversized_requests() {
        let mut net = network(3);
        let report = net.precision_bombing(500);
        assert_eq!(report.nodes_hit, 10);
        assert_eq!(report.edges_hit, 20);
        assert_eq!(damaged_targets(&net), 30);
    }

    #[test]
    fn zero_targets_is_a_no_op() {
        let mut net = network(3);
        let before = net.state().clone();
        assert_eq!(net.area_bombing(0), StrikeReport::default());
        assert_eq!(net.state(), &before);
    }

    #[test]
    fn area_casualties_respect_budget_and_drain_reserve_first() {
        let mut net = network(9);
        let report = net.area_bombing(5);
        // min(5 * 5, 10% of 200)
        assert_eq!(report.workers_killed, 20);
        assert_eq!(net.state().reserve(), 80);
        assert_eq!(net.state().assigned_workers(), 100);
        assert_eq!(net.state().workers_killed(), 20);
    }

    #[test]
    fn area_casualties_fall_on_nodes_once_reserve_is_empty() {
        let mut net = network(12);
        net.state_mut().set_reserve(0);
        let report = net.area_bombing(1);
        // min(1 * 5, 10% of 100)
        assert_eq!(report.workers_killed, 5);
        assert_eq!(net.state().assigned_workers(), 95);
    }

    #[test]
    fn area_casualties_stop_when_workforce_is_exhausted() {
        let graph = NetworkGraph::from_edges(2, [(0, 1)]).unwrap();
        let mut cfg = SimulationConfig::default();
        cfg.reserve_workers = Some(0);
        cfg.casualties.max_fraction = 1.0;
        let mut net = WarfareNetwork::with_graph(cfg, graph).unwrap();
        let report = net.area_bombing(100);
        assert_eq!(report.workers_killed, 20);
        assert_eq!(net.state().total_workforce(), 0);
        assert_eq!(net.area_bombing(100).workers_killed, 0);
    }

    #[test]
    fn strikes_are_seed_deterministic() {
        let mut a = network(77);
        let mut b = network(77);
        for k in [3, 4, 9] {
            assert_eq!(a.area_bombing(k), b.area_bombing(k));
        }
        assert_eq!(a.state(), b.state());
    }
}
