//! Turn loop, early termination and the precision-versus-area comparison.
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::{SimulationConfig, Strategy};
use crate::damage::StrikeReport;
use crate::graph::NodeId;
use crate::network::{SimulationError, WarfareNetwork};
use crate::repair::RepairReport;
use crate::stats::SimulationStats;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Termination {
    /// Output fell below the termination threshold on `turn`.
    OutputCollapsed { turn: u32 },
    /// Every configured turn was played.
    TurnLimit,
}

/// Everything that happened during one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub intensity: u32,
    pub strike: StrikeReport,
    pub repair: RepairReport,
    pub stats: SimulationStats,
}

/// Ordered statistics history of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRun {
    pub strategy: Strategy,
    pub seed: u64,
    pub stats: Vec<SimulationStats>,
    pub termination: Termination,
}

impl SimulationRun {
    #[must_use]
    pub fn turns_run(&self) -> usize {
        self.stats.len()
    }

    #[must_use]
    pub fn final_stats(&self) -> Option<&SimulationStats> {
        self.stats.last()
    }

    /// Final-turn figures for side-by-side reporting.
    #[must_use]
    pub fn summary(&self) -> Option<DoctrineSummary> {
        let last = self.final_stats()?;
        Some(DoctrineSummary {
            strategy: self.strategy,
            turns_run: self.turns_run(),
            termination: self.termination,
            final_output: last.network_output,
            active_workers: last.total_workers,
            reserve_workers: last.reserve_workers,
            destroyed_nodes: last.destroyed_nodes,
            destroyed_edges: last.destroyed_edges,
            workers_killed: last.workers_killed,
            endpoint_outputs: last.endpoint_outputs.clone(),
        })
    }
}

/// Condensed end-of-run view of one doctrine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctrineSummary {
    pub strategy: Strategy,
    pub turns_run: usize,
    pub termination: Termination,
    pub final_output: f64,
    pub active_workers: u64,
    pub reserve_workers: u64,
    pub destroyed_nodes: u32,
    pub destroyed_edges: u32,
    pub workers_killed: u64,
    pub endpoint_outputs: BTreeMap<NodeId, f64>,
}

impl WarfareNetwork {
    /// Play one turn: strike at the escalated intensity, repair, then snapshot.
    pub fn step(&mut self, turn: u32) -> TurnOutcome {
        let intensity = self.config.escalation.intensity(turn);
        debug!("Turn {turn}: bombing intensity {intensity}");
        let strike = self.strike(self.config.strategy, intensity);
        let repair = self.repair_and_replenish();
        let stats = self.statistics(turn);
        TurnOutcome {
            intensity,
            strike,
            repair,
            stats,
        }
    }

    /// Play turns until the output collapses or `max_turns` is reached.
    ///
    /// Consumes the network; nothing of a run outlives it except the returned
    /// statistics.
    #[must_use]
    pub fn run(mut self) -> SimulationRun {
        let max_turns = self.config.max_turns;
        let threshold = self.config.termination_threshold();
        let mut stats = Vec::with_capacity(max_turns.min(1_024) as usize);
        let mut termination = Termination::TurnLimit;

        info!(
            "Running {} doctrine for up to {max_turns} turns (seed {})",
            self.config.strategy, self.config.seed
        );
        for turn in 0..max_turns {
            let outcome = self.step(turn);
            let output = outcome.stats.network_output;
            stats.push(outcome.stats);
            if output < threshold {
                info!(
                    "Network output {output:.2} fell below {threshold:.2} on turn {turn}; stopping"
                );
                termination = Termination::OutputCollapsed { turn };
                break;
            }
        }
        info!(
            "{} doctrine finished after {} turns ({} random draws)",
            self.config.strategy,
            stats.len(),
            self.rng_draws()
        );

        SimulationRun {
            strategy: self.config.strategy,
            seed: self.config.seed,
            stats,
            termination,
        }
    }
}

/// Build a network from `config` and run it to completion.
///
/// # Errors
///
/// Returns `SimulationError::Config` when the configuration is invalid.
pub fn run_simulation(config: SimulationConfig) -> Result<SimulationRun, SimulationError> {
    Ok(WarfareNetwork::new(config)?.run())
}

/// Precision and area runs over identical initial parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctrineComparison {
    pub precision: SimulationRun,
    pub area: SimulationRun,
}

impl DoctrineComparison {
    #[must_use]
    pub const fn get(&self, strategy: Strategy) -> &SimulationRun {
        match strategy {
            Strategy::Precision => &self.precision,
            Strategy::Area => &self.area,
        }
    }

    #[must_use]
    pub fn summary(&self, strategy: Strategy) -> Option<DoctrineSummary> {
        self.get(strategy).summary()
    }
}

/// Run both doctrines one after the other.
///
/// Each doctrine gets its own network built from `config` (strategy
/// overridden), so both face the same topology and share no state.
///
/// # Errors
///
/// Returns `SimulationError::Config` when the configuration is invalid.
pub fn compare_doctrines(config: &SimulationConfig) -> Result<DoctrineComparison, SimulationError> {
    config.validate()?;
    let precision = run_simulation(config.clone().with_strategy(Strategy::Precision))?;
    let area = run_simulation(config.clone().with_strategy(Strategy::Area))?;
    Ok(DoctrineComparison { precision, area })
}

/// Run both doctrines concurrently on blocking worker tasks.
///
/// Only the owned [`SimulationRun`] values cross task boundaries.
///
/// # Errors
///
/// Returns `SimulationError::Config` for invalid configuration and
/// `SimulationError::TaskFailed` when a worker task panics or is cancelled.
#[cfg(feature = "async")]
pub async fn compare_doctrines_concurrent(
    config: SimulationConfig,
) -> Result<DoctrineComparison, SimulationError> {
    config.validate()?;
    let precision_cfg = config.clone().with_strategy(Strategy::Precision);
    let area_cfg = config.with_strategy(Strategy::Area);

    let precision = tokio::task::spawn_blocking(move || run_simulation(precision_cfg));
    let area = tokio::task::spawn_blocking(move || run_simulation(area_cfg));
    let (precision, area) = tokio::join!(precision, area);

    let join_err = |err: tokio::task::JoinError| SimulationError::TaskFailed(err.to_string());
    Ok(DoctrineComparison {
        precision: precision.map_err(join_err)??,
        area: area.map_err(join_err)??,
    })
}
