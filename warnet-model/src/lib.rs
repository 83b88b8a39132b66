//! Warfare Network Model
//!
//! Discrete-time simulation of an industrial production network under
//! sustained bombing. A random directed graph of factories and transport
//! links is struck every turn, either with precision strikes against
//! infrastructure or with area strikes that also kill workers, and then
//! repaired by whatever workforce remains. The crate has no I/O of its own;
//! the runner crate drives it and renders reports.

pub mod config;
pub mod constants;
pub mod damage;
pub mod graph;
pub mod network;
pub mod output;
pub mod paths;
pub mod repair;
pub mod rng;
pub mod simulation;
pub mod state;
pub mod stats;

pub use config::{
    CasualtyCfg, ConfigError, EscalationCfg, PathLimits, RepairCfg, SimulationConfig, Strategy,
};
pub use damage::StrikeReport;
pub use graph::{Edge, EdgeId, GraphError, NetworkGraph, NodeId};
pub use network::{SimulationError, WarfareNetwork};
pub use output::{NetworkOutput, endpoint_output, network_output, path_value};
pub use paths::{EndpointPaths, Path, PathCache};
pub use repair::{RepairReport, repair_and_replenish};
pub use rng::SimRng;
#[cfg(feature = "async")]
pub use simulation::compare_doctrines_concurrent;
pub use simulation::{
    DoctrineComparison, DoctrineSummary, SimulationRun, Termination, TurnOutcome,
    compare_doctrines, run_simulation,
};
pub use state::NetworkState;
pub use stats::SimulationStats;
