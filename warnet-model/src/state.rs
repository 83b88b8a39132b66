//! Mutable capacity and workforce state of a simulation instance.
//!
//! Capacities are stored as flat arrays indexed by [`NodeId`] / [`EdgeId`].
//! Every mutator clamps at the mutation site so a capacity can never leave
//! `[0, 1]` and a node never holds more than `max_workers`.
use crate::graph::{EdgeId, NodeId};

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkState {
    node_capacity: Vec<f64>,
    edge_capacity: Vec<f64>,
    workers: Vec<u32>,
    max_workers: u32,
    reserve: u64,
    initial_workers: u64,
    workers_killed: u64,
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

impl NetworkState {
    /// Fully operational network with every node staffed to `workers_per_node`.
    #[must_use]
    pub fn new(node_count: u32, edge_count: usize, workers_per_node: u32, reserve: u64) -> Self {
        Self {
            node_capacity: vec![1.0; node_count as usize],
            edge_capacity: vec![1.0; edge_count],
            workers: vec![workers_per_node; node_count as usize],
            max_workers: workers_per_node,
            reserve,
            initial_workers: u64::from(workers_per_node) * u64::from(node_count),
            workers_killed: 0,
        }
    }

    // Capacity ------------------------------------------------------------

    #[must_use]
    pub fn node_capacity(&self, node: NodeId) -> f64 {
        self.node_capacity.get(node.index()).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn edge_capacity(&self, edge: EdgeId) -> f64 {
        self.edge_capacity.get(edge.index()).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn node_capacities(&self) -> &[f64] {
        &self.node_capacity
    }

    #[must_use]
    pub fn edge_capacities(&self) -> &[f64] {
        &self.edge_capacity
    }

    /// Overwrite a node capacity, clamped into `[0, 1]`.
    pub fn set_node_capacity(&mut self, node: NodeId, value: f64) {
        if let Some(cap) = self.node_capacity.get_mut(node.index()) {
            *cap = clamp_unit(value);
        }
    }

    /// Overwrite an edge capacity, clamped into `[0, 1]`.
    pub fn set_edge_capacity(&mut self, edge: EdgeId, value: f64) {
        if let Some(cap) = self.edge_capacity.get_mut(edge.index()) {
            *cap = clamp_unit(value);
        }
    }

    /// Multiply a node capacity by `factor`, returning the clamped result.
    pub(crate) fn scale_node_capacity(&mut self, node: NodeId, factor: f64) -> f64 {
        let next = clamp_unit(self.node_capacity(node) * factor.max(0.0));
        self.set_node_capacity(node, next);
        next
    }

    /// Multiply an edge capacity by `factor`, returning the clamped result.
    pub(crate) fn scale_edge_capacity(&mut self, edge: EdgeId, factor: f64) -> f64 {
        let next = clamp_unit(self.edge_capacity(edge) * factor.max(0.0));
        self.set_edge_capacity(edge, next);
        next
    }

    // Workforce -----------------------------------------------------------

    #[must_use]
    pub fn workers(&self, node: NodeId) -> u32 {
        self.workers.get(node.index()).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn worker_counts(&self) -> &[u32] {
        &self.workers
    }

    #[must_use]
    pub const fn max_workers(&self) -> u32 {
        self.max_workers
    }

    #[must_use]
    pub const fn reserve(&self) -> u64 {
        self.reserve
    }

    /// Workers assigned across all nodes at construction.
    #[must_use]
    pub const fn initial_workers(&self) -> u64 {
        self.initial_workers
    }

    /// Cumulative area-bombing casualties.
    #[must_use]
    pub const fn workers_killed(&self) -> u64 {
        self.workers_killed
    }

    #[must_use]
    pub fn assigned_workers(&self) -> u64 {
        self.workers.iter().copied().map(u64::from).sum()
    }

    /// Assigned plus reserve.
    #[must_use]
    pub fn total_workforce(&self) -> u64 {
        self.assigned_workers().saturating_add(self.reserve)
    }

    /// Fraction of a full crew currently staffing `node`.
    #[must_use]
    pub fn staffing(&self, node: NodeId) -> f64 {
        if self.max_workers == 0 {
            return 0.0;
        }
        f64::from(self.workers(node)) / f64::from(self.max_workers)
    }

    /// Overwrite a node's assignment, clamped to `max_workers`.
    pub fn set_workers(&mut self, node: NodeId, count: u32) {
        let max = self.max_workers;
        if let Some(slot) = self.workers.get_mut(node.index()) {
            *slot = count.min(max);
        }
    }

    pub fn set_reserve(&mut self, count: u64) {
        self.reserve = count;
    }

    /// Remove up to `count` workers from the reserve, returning how many were taken.
    pub(crate) fn draw_reserve(&mut self, count: u64) -> u64 {
        let taken = count.min(self.reserve);
        self.reserve -= taken;
        taken
    }

    /// Remove up to `count` workers from `node`, returning how many were taken.
    pub(crate) fn draw_node(&mut self, node: NodeId, count: u64) -> u64 {
        let Some(slot) = self.workers.get_mut(node.index()) else {
            return 0;
        };
        let taken = count.min(u64::from(*slot));
        #[allow(clippy::cast_possible_truncation)]
        let remaining = (u64::from(*slot) - taken) as u32;
        *slot = remaining;
        taken
    }

    pub(crate) fn grow_reserve(&mut self, count: u64) {
        self.reserve = self.reserve.saturating_add(count);
    }

    /// Move reserve workers into `node` up to its shortfall, returning how many moved.
    pub(crate) fn staff_from_reserve(&mut self, node: NodeId) -> u64 {
        let max = self.max_workers;
        let Some(slot) = self.workers.get_mut(node.index()) else {
            return 0;
        };
        let shortfall = u64::from(max.saturating_sub(*slot));
        let moved = shortfall.min(self.reserve);
        self.reserve -= moved;
        #[allow(clippy::cast_possible_truncation)]
        let moved_u32 = moved as u32;
        *slot += moved_u32;
        moved
    }

    pub(crate) fn record_killed(&mut self, count: u64) {
        self.workers_killed = self.workers_killed.saturating_add(count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> NetworkState {
        NetworkState::new(4, 3, 10, 40)
    }

    #[test]
    fn starts_fully_operational_and_staffed() {
        let s = state();
        assert!(s.node_capacities().iter().all(|&c| (c - 1.0).abs() < f64::EPSILON));
        assert!(s.edge_capacities().iter().all(|&c| (c - 1.0).abs() < f64::EPSILON));
        assert_eq!(s.assigned_workers(), 40);
        assert_eq!(s.initial_workers(), 40);
        assert_eq!(s.total_workforce(), 80);
    }

    #[test]
    fn workforce_saturates_instead_of_overflowing() {
        let mut s = NetworkState::new(4, 0, 10, u64::MAX);
        assert_eq!(s.total_workforce(), u64::MAX);
        s.grow_reserve(5);
        assert_eq!(s.reserve(), u64::MAX);
        assert_eq!(s.draw_reserve(10), 10);
        assert_eq!(s.total_workforce(), u64::MAX);
    }

    #[test]
    fn capacity_setters_clamp_into_unit_interval() {
        let mut s = state();
        s.set_node_capacity(NodeId(0), 1.7);
        s.set_node_capacity(NodeId(1), -0.3);
        s.set_edge_capacity(EdgeId(0), f64::NAN);
        assert!((s.node_capacity(NodeId(0)) - 1.0).abs() < f64::EPSILON);
        assert!(s.node_capacity(NodeId(1)).abs() < f64::EPSILON);
        assert!(s.edge_capacity(EdgeId(0)).abs() < f64::EPSILON);
        assert!((s.scale_edge_capacity(EdgeId(1), -2.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn worker_moves_never_go_negative() {
        let mut s = state();
        assert_eq!(s.draw_reserve(100), 40);
        assert_eq!(s.reserve(), 0);
        assert_eq!(s.draw_node(NodeId(2), 25), 10);
        assert_eq!(s.workers(NodeId(2)), 0);
        assert_eq!(s.draw_node(NodeId(9), 5), 0);
    }

    #[test]
    fn staffing_from_reserve_fills_only_the_shortfall() {
        let mut s = state();
        s.set_workers(NodeId(0), 4);
        s.set_reserve(3);
        assert_eq!(s.staff_from_reserve(NodeId(0)), 3);
        assert_eq!(s.workers(NodeId(0)), 7);
        s.set_reserve(50);
        assert_eq!(s.staff_from_reserve(NodeId(0)), 3);
        assert_eq!(s.workers(NodeId(0)), 10);
        assert_eq!(s.reserve(), 47);
        s.set_workers(NodeId(1), 99);
        assert_eq!(s.workers(NodeId(1)), 10);
    }
}
