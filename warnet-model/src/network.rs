//! A single simulation instance: topology, path cache, mutable state and RNG.
use log::info;
use thiserror::Error;

use crate::config::{ConfigError, SimulationConfig, Strategy};
use crate::graph::{GraphError, NetworkGraph};
use crate::paths::PathCache;
use crate::rng::SimRng;
use crate::state::NetworkState;

/// Failures raised while constructing or running simulations.
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("simulation task failed: {0}")]
    TaskFailed(String),
}

/// Warfare network owned by exactly one run.
///
/// Topology and path cache are fixed at construction; only the capacity and
/// workforce state change as turns are played.
#[derive(Debug, Clone)]
pub struct WarfareNetwork {
    pub(crate) config: SimulationConfig,
    pub(crate) graph: NetworkGraph,
    pub(crate) paths: PathCache,
    pub(crate) state: NetworkState,
    pub(crate) rng: SimRng,
}

impl WarfareNetwork {
    /// Build a random network from `config`.
    ///
    /// # Errors
    ///
    /// Returns `SimulationError::Config` when the configuration is invalid.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let mut rng = SimRng::from_user_seed(config.seed);
        let graph = NetworkGraph::random(config.num_nodes, config.num_edges, &mut rng)?;
        Ok(Self::assemble(config, graph, rng))
    }

    /// Build a network over a caller-supplied topology.
    ///
    /// `num_nodes` and `num_edges` in `config` are replaced by the graph's own
    /// counts before validation.
    ///
    /// # Errors
    ///
    /// Returns `SimulationError::Config` when the remaining fields are invalid.
    pub fn with_graph(
        mut config: SimulationConfig,
        graph: NetworkGraph,
    ) -> Result<Self, SimulationError> {
        config.num_nodes = graph.node_count();
        config.num_edges = u32::try_from(graph.edge_count()).map_err(|_| {
            GraphError::TooManyEdges {
                nodes: graph.node_count(),
                edges: u32::MAX,
                max: SimulationConfig::max_edges(graph.node_count()),
            }
        })?;
        config.validate()?;
        let rng = SimRng::from_user_seed(config.seed);
        Ok(Self::assemble(config, graph, rng))
    }

    fn assemble(config: SimulationConfig, graph: NetworkGraph, rng: SimRng) -> Self {
        let paths = PathCache::build(&graph, config.path_limits);
        let state = NetworkState::new(
            graph.node_count(),
            graph.edge_count(),
            config.workers_per_node,
            config.initial_reserve(),
        );
        info!(
            "Initialized {} network: {} nodes, {} edges, {} endpoints, {} cached paths",
            config.strategy,
            graph.node_count(),
            graph.edge_count(),
            graph.endpoints().len(),
            paths.total_paths()
        );
        Self {
            config,
            graph,
            paths,
            state,
            rng,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.config.strategy
    }

    #[must_use]
    pub const fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    #[must_use]
    pub const fn paths(&self) -> &PathCache {
        &self.paths
    }

    #[must_use]
    pub const fn state(&self) -> &NetworkState {
        &self.state
    }

    /// Mutable access to capacities and workforce, for scenario setup.
    pub fn state_mut(&mut self) -> &mut NetworkState {
        &mut self.state
    }

    /// Draws taken from the instance's random source so far.
    #[must_use]
    pub const fn rng_draws(&self) -> u64 {
        self.rng.draws()
    }
}
