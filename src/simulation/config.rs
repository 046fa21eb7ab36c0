//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::dispatching::DEFAULT_URGENCY_EPSILON;
use crate::models::{Capacity, CapacityModel, MachinePool, Occupancy};

/// Engine-wide settings applied to every run.
///
/// Request payloads carry only the workload; machine capacities and the
/// occupancy rule come from here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// How capacities are assigned to machines.
    pub capacity_model: CapacityModel,
    /// Whether machines may host several tasks at once.
    pub occupancy: Occupancy,
    /// Floor on time-to-deadline for urgency-based policies.
    pub urgency_epsilon: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            capacity_model: CapacityModel::default(),
            occupancy: Occupancy::Exclusive,
            urgency_epsilon: DEFAULT_URGENCY_EPSILON,
        }
    }
}

impl SimulationConfig {
    /// Default configuration: 1 CPU / 1 RAM per machine, exclusive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives every machine the same capacity.
    pub fn with_capacity(mut self, capacity: Capacity) -> Self {
        self.capacity_model = CapacityModel::Uniform(capacity);
        self
    }

    /// Sets the capacity model.
    pub fn with_capacity_model(mut self, model: CapacityModel) -> Self {
        self.capacity_model = model;
        self
    }

    /// Sets the occupancy rule.
    pub fn with_occupancy(mut self, occupancy: Occupancy) -> Self {
        self.occupancy = occupancy;
        self
    }

    /// Sets the urgency floor.
    pub fn with_urgency_epsilon(mut self, epsilon: f64) -> Self {
        self.urgency_epsilon = epsilon;
        self
    }

    /// Builds a fresh pool of `count` machines.
    pub fn build_pool(&self, count: usize) -> MachinePool {
        MachinePool::new(count, self.capacity_model, self.occupancy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::new();
        let pool = config.build_pool(3);
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.occupancy(), Occupancy::Exclusive);
        assert!(pool.machines().iter().all(|m| m.capacity == Capacity::new(1, 1)));
    }

    #[test]
    fn test_builder() {
        let config = SimulationConfig::new()
            .with_capacity(Capacity::new(4, 8))
            .with_occupancy(Occupancy::Shared)
            .with_urgency_epsilon(0.5);
        let pool = config.build_pool(2);
        assert_eq!(pool.get(1).unwrap().capacity, Capacity::new(4, 8));
        assert_eq!(pool.occupancy(), Occupancy::Shared);
        assert!((config.urgency_epsilon - 0.5).abs() < 1e-12);
    }
}
