//! Bounded simple-path cache feeding each endpoint.
//!
//! Unbounded simple-path enumeration on a general digraph explodes
//! combinatorially, so enumeration is cut off at `max_path_length` edges and
//! at most `max_paths_per_node` paths are kept per originating node. The cache
//! is built once per instance and never mutated.
use log::debug;
use smallvec::SmallVec;

use crate::config::PathLimits;
use crate::constants::INLINE_PATH_NODES;
use crate::graph::{NetworkGraph, NodeId};

/// Node sequence ending at an endpoint.
pub type Path = SmallVec<[NodeId; INLINE_PATH_NODES]>;

/// Cached paths for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointPaths {
    endpoint: NodeId,
    paths: Vec<Path>,
    distinct_nodes: usize,
}

impl EndpointPaths {
    #[must_use]
    pub const fn endpoint(&self) -> NodeId {
        self.endpoint
    }

    #[must_use]
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Number of distinct nodes appearing across all cached paths.
    #[must_use]
    pub const fn distinct_nodes(&self) -> usize {
        self.distinct_nodes
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Read-only mapping from endpoint to its bounded path set.
#[derive(Debug, Clone)]
pub struct PathCache {
    entries: Vec<EndpointPaths>,
}

impl PathCache {
    /// Enumerate bounded paths for every endpoint of `graph`.
    #[must_use]
    pub fn build(graph: &NetworkGraph, limits: PathLimits) -> Self {
        let entries = graph
            .endpoints()
            .iter()
            .map(|&endpoint| {
                let entry = Self::build_endpoint(graph, endpoint, limits);
                debug!(
                    "Cached {} paths ({} distinct nodes) for endpoint {endpoint}",
                    entry.paths.len(),
                    entry.distinct_nodes
                );
                entry
            })
            .collect();
        Self { entries }
    }

    fn build_endpoint(graph: &NetworkGraph, endpoint: NodeId, limits: PathLimits) -> EndpointPaths {
        let reachable = graph.ancestors(endpoint);
        let walker = PathWalker {
            graph,
            reachable: &reachable,
            endpoint,
            max_edges: limits.max_path_length,
        };

        let mut paths = Vec::new();
        for origin in graph.nodes() {
            if origin == endpoint || !reachable[origin.index()] {
                continue;
            }
            let mut current = Path::new();
            current.push(origin);
            let mut budget = limits.max_paths_per_node;
            walker.extend(&mut current, &mut paths, &mut budget);
        }

        let mut nodes: Vec<NodeId> = paths.iter().flatten().copied().collect();
        nodes.sort_unstable();
        nodes.dedup();

        EndpointPaths {
            endpoint,
            paths,
            distinct_nodes: nodes.len(),
        }
    }

    /// Entries in ascending endpoint order.
    #[must_use]
    pub fn entries(&self) -> &[EndpointPaths] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, endpoint: NodeId) -> Option<&EndpointPaths> {
        self.entries
            .binary_search_by_key(&endpoint, EndpointPaths::endpoint)
            .ok()
            .map(|idx| &self.entries[idx])
    }

    /// Paths to `endpoint`; empty for unknown or unreachable endpoints.
    #[must_use]
    pub fn paths_to(&self, endpoint: NodeId) -> &[Path] {
        self.get(endpoint).map(EndpointPaths::paths).unwrap_or_default()
    }

    #[must_use]
    pub fn total_paths(&self) -> usize {
        self.entries.iter().map(|entry| entry.paths.len()).sum()
    }
}

/// Depth-first enumeration over the induced subgraph of an endpoint's ancestors.
struct PathWalker<'a> {
    graph: &'a NetworkGraph,
    reachable: &'a [bool],
    endpoint: NodeId,
    max_edges: usize,
}

impl PathWalker<'_> {
    fn extend(&self, current: &mut Path, out: &mut Vec<Path>, budget: &mut usize) {
        let Some(&last) = current.last() else {
            return;
        };
        for &next in self.graph.successors(last) {
            if *budget == 0 {
                return;
            }
            if !self.reachable[next.index()] || current.contains(&next) {
                continue;
            }
            // current.len() edges once `next` is pushed.
            if next == self.endpoint {
                current.push(next);
                out.push(current.clone());
                current.pop();
                *budget -= 1;
            } else if current.len() < self.max_edges {
                current.push(next);
                self.extend(current, out, budget);
                current.pop();
            }
        }
    }
}
