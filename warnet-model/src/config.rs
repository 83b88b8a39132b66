//! Simulation configuration, strategy selection and validation.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::{
    ANNUAL_GROWTH_RATE, DAYS_PER_YEAR, DEFAULT_MAX_TURNS, DEFAULT_NUM_EDGES, DEFAULT_NUM_NODES,
    DEFAULT_SEED, DEFAULT_WORKERS_PER_NODE, EDGE_REPAIR_RATE, ESCALATION_BASE, ESCALATION_PERIOD,
    MAX_CASUALTY_FRACTION, MAX_PATH_LENGTH, MAX_PATHS_PER_NODE, NODE_REPAIR_RATE,
    TERMINATION_FRACTION, WORKERS_PER_TARGET,
};

/// Bombing doctrine applied every turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Infrastructure-only strikes.
    #[default]
    Precision,
    /// Infrastructure strikes plus bounded worker casualties.
    Area,
}

impl Strategy {
    pub const ALL: [Self; 2] = [Self::Precision, Self::Area];

    /// Stable lowercase identifier used in reports and CLI arguments.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Precision => "precision",
            Self::Area => "area",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "precision" => Ok(Self::Precision),
            "area" => Ok(Self::Area),
            other => Err(ConfigError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Configuration validation failures.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    ZeroField { field: &'static str },
    #[error("{edges} edges requested but a {nodes}-node digraph holds at most {max}")]
    TooManyEdges { nodes: u32, edges: u32, max: u64 },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.4})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("unknown strategy `{0}` (expected `precision` or `area`)")]
    UnknownStrategy(String),
    #[error("invalid configuration document: {0}")]
    Parse(String),
}

fn require_nonzero(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::ZeroField { field });
    }
    Ok(())
}

fn require_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if !(min..=max).contains(&value) {
        return Err(ConfigError::RangeViolation {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}

/// Bombing escalation schedule: `base + turn / period` targets per turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationCfg {
    pub base: u32,
    pub period: u32,
}

impl Default for EscalationCfg {
    fn default() -> Self {
        Self {
            base: ESCALATION_BASE,
            period: ESCALATION_PERIOD,
        }
    }
}

impl EscalationCfg {
    /// Number of targets struck on `turn`.
    #[must_use]
    pub fn intensity(&self, turn: u32) -> u32 {
        self.base.saturating_add(turn / self.period.max(1))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_nonzero("escalation.period", u64::from(self.period))
    }
}

/// Per-turn recovery rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairCfg {
    /// Fraction of remaining node damage repaired by a fully staffed node.
    pub node_rate: f64,
    /// Fraction of remaining edge damage repaired regardless of staffing.
    pub edge_rate: f64,
    /// Annualised workforce growth rate.
    pub growth_rate: f64,
    /// Turns per year used to turn `growth_rate` into a per-turn rate.
    pub days_per_year: f64,
}

impl Default for RepairCfg {
    fn default() -> Self {
        Self {
            node_rate: NODE_REPAIR_RATE,
            edge_rate: EDGE_REPAIR_RATE,
            growth_rate: ANNUAL_GROWTH_RATE,
            days_per_year: DAYS_PER_YEAR,
        }
    }
}

impl RepairCfg {
    #[must_use]
    pub fn daily_growth_rate(&self) -> f64 {
        self.growth_rate / self.days_per_year
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_range("repair.node_rate", self.node_rate, 0.0, 1.0)?;
        require_range("repair.edge_rate", self.edge_rate, 0.0, 1.0)?;
        require_range("repair.growth_rate", self.growth_rate, 0.0, 1.0)?;
        if !(self.days_per_year.is_finite() && self.days_per_year > 0.0) {
            return Err(ConfigError::RangeViolation {
                field: "repair.days_per_year",
                min: f64::MIN_POSITIVE,
                max: f64::MAX,
                value: self.days_per_year,
            });
        }
        Ok(())
    }
}

/// Caps that keep simple-path enumeration tractable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathLimits {
    /// Maximum edges per cached path.
    pub max_path_length: usize,
    /// Maximum cached paths per originating node and endpoint.
    pub max_paths_per_node: usize,
}

impl Default for PathLimits {
    fn default() -> Self {
        Self {
            max_path_length: MAX_PATH_LENGTH,
            max_paths_per_node: MAX_PATHS_PER_NODE,
        }
    }
}

impl PathLimits {
    fn validate(&self) -> Result<(), ConfigError> {
        require_nonzero("path_limits.max_path_length", self.max_path_length as u64)?;
        require_nonzero(
            "path_limits.max_paths_per_node",
            self.max_paths_per_node as u64,
        )
    }
}

/// Area-bombing casualty model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CasualtyCfg {
    pub workers_per_target: u32,
    /// Cap on a single strike's casualties as a share of the whole workforce.
    pub max_fraction: f64,
}

impl Default for CasualtyCfg {
    fn default() -> Self {
        Self {
            workers_per_target: WORKERS_PER_TARGET,
            max_fraction: MAX_CASUALTY_FRACTION,
        }
    }
}

impl CasualtyCfg {
    /// Casualty budget for a strike of `targets` against `workforce` workers.
    #[must_use]
    pub fn budget(&self, targets: u32, workforce: u64) -> u64 {
        let by_targets = u64::from(targets) * u64::from(self.workers_per_target);
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let by_fraction = (workforce as f64 * self.max_fraction).floor().max(0.0) as u64;
        by_targets.min(by_fraction)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_range("casualties.max_fraction", self.max_fraction, 0.0, 1.0)
    }
}

/// Full parameter set for one simulation instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub num_nodes: u32,
    pub num_edges: u32,
    pub workers_per_node: u32,
    /// Starting reserve pool. Defaults to the assigned workforce when absent.
    pub reserve_workers: Option<u64>,
    pub max_turns: u32,
    pub strategy: Strategy,
    pub escalation: EscalationCfg,
    pub repair: RepairCfg,
    pub path_limits: PathLimits,
    pub casualties: CasualtyCfg,
    /// Early-stop threshold as a fraction of the initial assigned workforce.
    pub termination_fraction: f64,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_nodes: DEFAULT_NUM_NODES,
            num_edges: DEFAULT_NUM_EDGES,
            workers_per_node: DEFAULT_WORKERS_PER_NODE,
            reserve_workers: None,
            max_turns: DEFAULT_MAX_TURNS,
            strategy: Strategy::default(),
            escalation: EscalationCfg::default(),
            repair: RepairCfg::default(),
            path_limits: PathLimits::default(),
            casualties: CasualtyCfg::default(),
            termination_fraction: TERMINATION_FRACTION,
            seed: DEFAULT_SEED,
        }
    }
}

impl SimulationConfig {
    /// Configuration for a `num_nodes`/`num_edges` graph with every other field defaulted.
    #[must_use]
    pub fn new(num_nodes: u32, num_edges: u32, workers_per_node: u32) -> Self {
        Self {
            num_nodes,
            num_edges,
            workers_per_node,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Parse a JSON configuration document; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON and any validation error
    /// for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Largest edge count a simple digraph on `num_nodes` nodes can hold.
    #[must_use]
    pub fn max_edges(num_nodes: u32) -> u64 {
        let n = u64::from(num_nodes);
        n * n.saturating_sub(1)
    }

    /// Workers assigned across all nodes at construction.
    #[must_use]
    pub fn initial_workers(&self) -> u64 {
        u64::from(self.workers_per_node) * u64::from(self.num_nodes)
    }

    /// Reserve pool size at construction.
    #[must_use]
    pub fn initial_reserve(&self) -> u64 {
        self.reserve_workers.unwrap_or_else(|| self.initial_workers())
    }

    /// Network output below which a run ends early.
    #[must_use]
    pub fn termination_threshold(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let workers = self.initial_workers() as f64;
        workers * self.termination_fraction
    }

    /// Validate every field against its documented bounds.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_nonzero("num_nodes", u64::from(self.num_nodes))?;
        require_nonzero("workers_per_node", u64::from(self.workers_per_node))?;
        require_nonzero("max_turns", u64::from(self.max_turns))?;
        let max = Self::max_edges(self.num_nodes);
        if u64::from(self.num_edges) > max {
            return Err(ConfigError::TooManyEdges {
                nodes: self.num_nodes,
                edges: self.num_edges,
                max,
            });
        }
        if let Some(reserve) = self.reserve_workers {
            let max_reserve = u64::MAX - self.initial_workers();
            if reserve > max_reserve {
                #[allow(clippy::cast_precision_loss)]
                let (max, value) = (max_reserve as f64, reserve as f64);
                return Err(ConfigError::RangeViolation {
                    field: "reserve_workers",
                    min: 0.0,
                    max,
                    value,
                });
            }
        }
        require_range(
            "termination_fraction",
            self.termination_fraction,
            0.0,
            1.0,
        )?;
        self.escalation.validate()?;
        self.repair.validate()?;
        self.path_limits.validate()?;
        self.casualties.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        SimulationConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_zero_workers_per_node() {
        let cfg = SimulationConfig::new(10, 20, 0);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ZeroField {
                field: "workers_per_node"
            })
        );
    }

    #[test]
    fn rejects_edge_count_beyond_complete_digraph() {
        let cfg = SimulationConfig::new(4, 13, 10);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::TooManyEdges {
                nodes: 4,
                edges: 13,
                max: 12
            })
        );
        SimulationConfig::new(4, 12, 10).validate().unwrap();
    }

    #[test]
    fn rejects_zero_turns() {
        let cfg = SimulationConfig::new(10, 20, 10).with_max_turns(0);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ZeroField { field: "max_turns" })
        ));
    }

    #[test]
    fn rejects_out_of_range_rates() {
        let mut cfg = SimulationConfig::new(10, 20, 10);
        cfg.repair.edge_rate = 1.5;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::RangeViolation {
                field: "repair.edge_rate",
                ..
            })
        ));
    }

    #[test]
    fn escalation_steps_every_period() {
        let esc = EscalationCfg::default();
        assert_eq!(esc.intensity(0), 3);
        assert_eq!(esc.intensity(19), 3);
        assert_eq!(esc.intensity(20), 4);
        assert_eq!(esc.intensity(65), 6);
    }

    #[test]
    fn casualty_budget_respects_fraction_cap() {
        let cas = CasualtyCfg::default();
        assert_eq!(cas.budget(5, 200), 20);
        assert_eq!(cas.budget(5, 10_000), 25);
        assert_eq!(cas.budget(0, 10_000), 0);
    }

    #[test]
    fn reserve_defaults_to_assigned_workforce() {
        let mut cfg = SimulationConfig::new(10, 20, 10);
        assert_eq!(cfg.initial_workers(), 100);
        assert_eq!(cfg.initial_reserve(), 100);
        cfg.reserve_workers = Some(7);
        assert_eq!(cfg.initial_reserve(), 7);
        assert!((cfg.termination_threshold() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_reserve_that_overflows_the_workforce() {
        let err = SimulationConfig::from_json(
            r#"{"num_nodes":10,"num_edges":20,"reserve_workers":18446744073709551615,"max_turns":3,"strategy":"area"}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::RangeViolation {
                field: "reserve_workers",
                ..
            }
        ));

        let mut cfg = SimulationConfig::new(10, 20, 10);
        cfg.reserve_workers = Some(u64::MAX - 100);
        cfg.validate().unwrap();
        cfg.reserve_workers = Some(u64::MAX - 99);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn strategy_parses_case_insensitively() {
        assert_eq!("AREA".parse::<Strategy>(), Ok(Strategy::Area));
        assert_eq!(" precision ".parse::<Strategy>(), Ok(Strategy::Precision));
        assert!(matches!(
            "carpet".parse::<Strategy>(),
            Err(ConfigError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let cfg = SimulationConfig::from_json(
            r#"{ "num_nodes": 12, "num_edges": 30, "strategy": "area", "repair": { "edge_rate": 0.2 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.num_nodes, 12);
        assert_eq!(cfg.strategy, Strategy::Area);
        assert_eq!(cfg.workers_per_node, DEFAULT_WORKERS_PER_NODE);
        assert!((cfg.repair.edge_rate - 0.2).abs() < f64::EPSILON);
        assert!((cfg.repair.node_rate - NODE_REPAIR_RATE).abs() < f64::EPSILON);
    }

    #[test]
    fn json_rejects_invalid_documents() {
        assert!(matches!(
            SimulationConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SimulationConfig::from_json(r#"{ "num_nodes": 3, "num_edges": 7 }"#),
            Err(ConfigError::TooManyEdges { .. })
        ));
    }
}
