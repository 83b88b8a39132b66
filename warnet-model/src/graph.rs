//! Immutable random digraph backing a simulation instance.
//!
//! Nodes and edges are dense indices into flat arrays. Forward and
//! predecessor adjacency are built once and never change.
use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use thiserror::Error;

/// Dense node index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dense edge index into [`NetworkGraph::edges`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub u32);

impl EdgeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Directed link between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("{edges} edges requested but a {nodes}-node digraph holds at most {max}")]
    TooManyEdges { nodes: u32, edges: u32, max: u64 },
    #[error("self-loop on node {0}")]
    SelfLoop(NodeId),
    #[error("duplicate edge {from} -> {to}")]
    DuplicateEdge { from: NodeId, to: NodeId },
    #[error("node {node} out of range for a {nodes}-node graph")]
    NodeOutOfRange { node: NodeId, nodes: u32 },
}

/// Directed graph with exact node/edge counts, no self-loops, no parallel edges.
#[derive(Debug, Clone)]
pub struct NetworkGraph {
    node_count: u32,
    edges: Vec<Edge>,
    successors: Vec<Vec<NodeId>>,
    predecessors: Vec<Vec<NodeId>>,
    endpoints: Vec<NodeId>,
}

impl NetworkGraph {
    /// Sample a uniformly random digraph with exactly `num_nodes` nodes and `num_edges` edges.
    ///
    /// Edges are drawn without replacement from the `n * (n - 1)` ordered
    /// non-loop pairs.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::TooManyEdges` when `num_edges` exceeds `n * (n - 1)`.
    pub fn random<R: Rng + ?Sized>(
        num_nodes: u32,
        num_edges: u32,
        rng: &mut R,
    ) -> Result<Self, GraphError> {
        let n = u64::from(num_nodes);
        let max = n * n.saturating_sub(1);
        let too_many = || GraphError::TooManyEdges {
            nodes: num_nodes,
            edges: num_edges,
            max,
        };
        if u64::from(num_edges) > max {
            return Err(too_many());
        }
        if num_edges == 0 {
            return Ok(Self::build(num_nodes, Vec::new()));
        }

        let pool = usize::try_from(max).map_err(|_| too_many())?;
        let mut picks = index::sample(rng, pool, num_edges as usize).into_vec();
        picks.sort_unstable();

        let row = n - 1;
        let edges = picks
            .into_iter()
            .map(|pick| {
                let pick = pick as u64;
                let source = pick / row;
                let offset = pick % row;
                // Skip the diagonal: offsets at or past the source shift by one.
                let target = if offset >= source { offset + 1 } else { offset };
                #[allow(clippy::cast_possible_truncation)]
                let (source, target) = (source as u32, target as u32);
                Edge {
                    source: NodeId(source),
                    target: NodeId(target),
                }
            })
            .collect();
        Ok(Self::build(num_nodes, edges))
    }

    /// Build a graph from explicit `(source, target)` pairs.
    ///
    /// # Errors
    ///
    /// Rejects self-loops, duplicate edges and out-of-range node ids.
    pub fn from_edges<I>(num_nodes: u32, pairs: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let mut edges = Vec::new();
        for (source, target) in pairs {
            for node in [source, target] {
                if node >= num_nodes {
                    return Err(GraphError::NodeOutOfRange {
                        node: NodeId(node),
                        nodes: num_nodes,
                    });
                }
            }
            if source == target {
                return Err(GraphError::SelfLoop(NodeId(source)));
            }
            edges.push(Edge {
                source: NodeId(source),
                target: NodeId(target),
            });
        }
        edges.sort_unstable();
        if let Some(pair) = edges.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(GraphError::DuplicateEdge {
                from: pair[0].source,
                to: pair[0].target,
            });
        }
        Ok(Self::build(num_nodes, edges))
    }

    fn build(node_count: u32, edges: Vec<Edge>) -> Self {
        let mut successors = vec![Vec::new(); node_count as usize];
        let mut predecessors = vec![Vec::new(); node_count as usize];
        for edge in &edges {
            successors[edge.source.index()].push(edge.target);
            predecessors[edge.target.index()].push(edge.source);
        }
        let endpoints = (0..node_count)
            .map(NodeId)
            .filter(|node| successors[node.index()].is_empty())
            .collect();
        Self {
            node_count,
            edges,
            successors,
            predecessors,
            endpoints,
        }
    }

    #[must_use]
    pub const fn node_count(&self) -> u32 {
        self.node_count
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + use<> {
        (0..self.node_count).map(NodeId)
    }

    /// Edges sorted by `(source, target)`; the position is the [`EdgeId`].
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    pub fn successors(&self, node: NodeId) -> &[NodeId] {
        self.successors.get(node.index()).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn predecessors(&self, node: NodeId) -> &[NodeId] {
        self.predecessors.get(node.index()).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.successors(node).len()
    }

    /// Sink nodes (out-degree zero), ascending.
    #[must_use]
    pub fn endpoints(&self) -> &[NodeId] {
        &self.endpoints
    }

    #[must_use]
    pub fn is_endpoint(&self, node: NodeId) -> bool {
        self.endpoints.binary_search(&node).is_ok()
    }

    /// Membership mask of every node that can reach `target`, `target` included.
    #[must_use]
    pub fn ancestors(&self, target: NodeId) -> Vec<bool> {
        let mut mask = vec![false; self.node_count as usize];
        if target.index() >= mask.len() {
            return mask;
        }
        mask[target.index()] = true;
        let mut queue = VecDeque::from([target]);
        while let Some(node) = queue.pop_front() {
            for &pred in self.predecessors(node) {
                if !mask[pred.index()] {
                    mask[pred.index()] = true;
                    queue.push_back(pred);
                }
            }
        }
        mask
    }
}
