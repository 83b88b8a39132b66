//! Network output: cascading path values weighted by production breadth.
use log::trace;
use std::collections::BTreeMap;

use crate::graph::NodeId;
use crate::network::WarfareNetwork;
use crate::paths::{EndpointPaths, PathCache};
use crate::state::NetworkState;

/// Total output and its per-endpoint breakdown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkOutput {
    pub total: f64,
    pub per_endpoint: BTreeMap<NodeId, f64>,
}

/// Product of node capacities along `path`; a destroyed node zeroes the path.
///
/// Edge capacities do not enter the product.
#[must_use]
pub fn path_value(path: &[NodeId], state: &NetworkState) -> f64 {
    let mut value = 1.0;
    for &node in path {
        value *= state.node_capacity(node);
        if value == 0.0 {
            return 0.0;
        }
    }
    value
}

/// Sum of path values to one endpoint, multiplied by its distinct-node count.
#[must_use]
pub fn endpoint_output(entry: &EndpointPaths, state: &NetworkState) -> f64 {
    if entry.is_empty() {
        return 0.0;
    }
    let summed: f64 = entry.paths().iter().map(|path| path_value(path, state)).sum();
    #[allow(clippy::cast_precision_loss)]
    let breadth = entry.distinct_nodes() as f64;
    summed * breadth
}

#[must_use]
pub fn network_output(paths: &PathCache, state: &NetworkState) -> NetworkOutput {
    let mut output = NetworkOutput::default();
    for entry in paths.entries() {
        let value = endpoint_output(entry, state);
        trace!("Endpoint {} output: {value:.4}", entry.endpoint());
        output.per_endpoint.insert(entry.endpoint(), value);
        output.total += value;
    }
    output
}

impl WarfareNetwork {
    #[must_use]
    pub fn network_output(&self) -> NetworkOutput {
        network_output(&self.paths, &self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PathLimits, SimulationConfig};
    use crate::graph::NetworkGraph;

    fn diamond() -> WarfareNetwork {
        // 0 -> 1 -> 3, 0 -> 2 -> 3, 4 isolated
        let graph = NetworkGraph::from_edges(5, [(0, 1), (0, 2), (1, 3), (2, 3)]).unwrap();
        WarfareNetwork::with_graph(SimulationConfig::default(), graph).unwrap()
    }

    #[test]
    fn intact_network_output_counts_paths_times_breadth() {
        let net = diamond();
        let output = net.network_output();
        // paths: 0-1-3, 0-2-3, 1-3, 2-3 over 4 distinct nodes
        assert!((output.per_endpoint[&NodeId(3)] - 16.0).abs() < 1e-12);
        assert!(output.per_endpoint[&NodeId(4)].abs() < f64::EPSILON);
        assert!((output.total - 16.0).abs() < 1e-12);
    }

    #[test]
    fn destroyed_node_zeroes_every_path_through_it() {
        let mut net = diamond();
        net.state_mut().set_node_capacity(NodeId(1), 0.0);
        net.state_mut().set_node_capacity(NodeId(2), 0.5);
        let output = net.network_output();
        // 0-2-3 = 0.5, 2-3 = 0.5, paths through node 1 = 0
        assert!((output.total - 4.0).abs() < 1e-12);
        let path = [NodeId(0), NodeId(1), NodeId(3)];
        assert!(path_value(&path, net.state()).abs() < f64::EPSILON);
    }

    #[test]
    fn edge_damage_does_not_change_output() {
        let mut net = diamond();
        let before = net.network_output();
        for idx in 0..4 {
            net.state_mut().set_edge_capacity(crate::graph::EdgeId(idx), 0.0);
        }
        assert_eq!(net.network_output(), before);
    }

    #[test]
    fn isolated_endpoint_reports_zero() {
        let graph = NetworkGraph::from_edges(1, []).unwrap();
        let cache = PathCache::build(&graph, PathLimits::default());
        let state = NetworkState::new(1, 0, 10, 0);
        let output = network_output(&cache, &state);
        assert_eq!(output.per_endpoint.len(), 1);
        assert!(output.total.abs() < f64::EPSILON);
    }
}
