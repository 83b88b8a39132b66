//! Centralized tuning constants for the warfare-network model.
//!
//! These are the defaults behind [`crate::config::SimulationConfig`]. They are
//! illustrative model parameters, not calibrated historical data; every one of
//! them can be overridden through configuration.

// Topology -----------------------------------------------------------------
pub const DEFAULT_NUM_NODES: u32 = 1_000;
pub const DEFAULT_NUM_EDGES: u32 = 4_000;

// Path cache ---------------------------------------------------------------
/// Maximum number of edges on a cached path.
pub const MAX_PATH_LENGTH: usize = 5;
/// Maximum number of cached paths contributed by one originating node.
pub const MAX_PATHS_PER_NODE: usize = 10;
/// Inline capacity for path storage: `MAX_PATH_LENGTH` edges touch one extra node.
pub const INLINE_PATH_NODES: usize = MAX_PATH_LENGTH + 1;

// Workforce ----------------------------------------------------------------
pub const DEFAULT_WORKERS_PER_NODE: u32 = 10;
/// Casualties inflicted per area-bombing target before the fraction cap.
pub const WORKERS_PER_TARGET: u32 = 5;
/// Largest share of the total workforce a single area strike may kill.
pub const MAX_CASUALTY_FRACTION: f64 = 0.1;

// Damage -------------------------------------------------------------------
pub const DAMAGE_SEVERITY_MIN: f64 = 0.5;
pub const DAMAGE_SEVERITY_MAX: f64 = 1.0;

// Repair -------------------------------------------------------------------
pub const NODE_REPAIR_RATE: f64 = 0.25;
pub const EDGE_REPAIR_RATE: f64 = 0.10;
pub const ANNUAL_GROWTH_RATE: f64 = 0.02;
pub const DAYS_PER_YEAR: f64 = 365.0;

// Turn loop ----------------------------------------------------------------
pub const DEFAULT_MAX_TURNS: u32 = 365;
pub const ESCALATION_BASE: u32 = 3;
pub const ESCALATION_PERIOD: u32 = 20;
/// Output threshold, as a fraction of the initial assigned workforce.
pub const TERMINATION_FRACTION: f64 = 0.1;

// Random source ------------------------------------------------------------
pub const DEFAULT_SEED: u64 = 0x5EED_1944;
pub(crate) const RNG_DOMAIN_TAG: &[u8] = b"warnet.network";
