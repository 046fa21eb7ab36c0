//! Machine and machine-pool model.
//!
//! Machines are resource-bearing execution slots. Each has a CPU and RAM
//! capacity; dispatching a task reserves its demand and completion releases
//! it. With the default capacity of one unit each, accounting reduces to
//! plain mutual exclusion, but the pool always tracks free units so richer
//! capacity models need no engine changes.

use serde::{Deserialize, Serialize};

use super::{Task, TaskId};

/// Machine identifier (0-based index into the pool).
pub type MachineId = usize;

/// CPU and RAM units of a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacity {
    /// CPU units.
    pub cpu: u32,
    /// RAM units.
    pub ram: u32,
}

impl Capacity {
    /// Creates a capacity.
    pub const fn new(cpu: u32, ram: u32) -> Self {
        Self { cpu, ram }
    }

    /// Whether this capacity covers the task's demand.
    #[inline]
    pub fn covers(&self, task: &Task) -> bool {
        self.cpu >= task.cpu_required && self.ram >= task.ram_required
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// How machine capacities are assigned across the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityModel {
    /// Every machine has the same capacity.
    Uniform(Capacity),
    /// Even-id machines get `even`, odd-id machines get `odd`.
    Alternating {
        /// Capacity of machines 0, 2, 4, ...
        even: Capacity,
        /// Capacity of machines 1, 3, 5, ...
        odd: Capacity,
    },
}

impl Default for CapacityModel {
    fn default() -> Self {
        CapacityModel::Uniform(Capacity::default())
    }
}

impl CapacityModel {
    /// Large/small alternating pool (8 CPU / 32 RAM, then 4 CPU / 8 RAM).
    pub fn heterogeneous() -> Self {
        CapacityModel::Alternating {
            even: Capacity::new(8, 32),
            odd: Capacity::new(4, 8),
        }
    }

    /// Capacity of machine `id`.
    pub fn capacity_of(&self, id: MachineId) -> Capacity {
        match *self {
            CapacityModel::Uniform(c) => c,
            CapacityModel::Alternating { even, odd } => {
                if id % 2 == 0 {
                    even
                } else {
                    odd
                }
            }
        }
    }
}

/// Whether several tasks may share one machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupancy {
    /// At most one task per machine.
    #[default]
    Exclusive,
    /// Any number of tasks while free CPU and RAM both suffice.
    Shared,
}

/// A single machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Machine {
    /// Machine identifier.
    pub id: MachineId,
    /// Configured capacity.
    pub capacity: Capacity,
    /// Currently unreserved CPU units.
    pub cpu_free: u32,
    /// Currently unreserved RAM units.
    pub ram_free: u32,
    /// Tasks currently running here, in dispatch order.
    pub running: Vec<TaskId>,
}

impl Machine {
    /// Creates an idle machine.
    pub fn new(id: MachineId, capacity: Capacity) -> Self {
        Self {
            id,
            capacity,
            cpu_free: capacity.cpu,
            ram_free: capacity.ram,
            running: Vec::new(),
        }
    }

    /// Whether no task is running.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }

    /// Whether any CPU and RAM is unreserved.
    #[inline]
    pub fn has_free_capacity(&self) -> bool {
        self.cpu_free > 0 && self.ram_free > 0
    }

    /// Whether the task fits right now under the given occupancy rule.
    pub fn can_host(&self, task: &Task, occupancy: Occupancy) -> bool {
        if occupancy == Occupancy::Exclusive && !self.is_idle() {
            return false;
        }
        self.cpu_free >= task.cpu_required && self.ram_free >= task.ram_required
    }

    fn reserve(&mut self, task: &Task) {
        self.cpu_free -= task.cpu_required;
        self.ram_free -= task.ram_required;
        self.running.push(task.id);
    }

    fn release(&mut self, task: &Task) -> bool {
        let Some(pos) = self.running.iter().position(|&id| id == task.id) else {
            return false;
        };
        self.running.remove(pos);
        self.cpu_free = (self.cpu_free + task.cpu_required).min(self.capacity.cpu);
        self.ram_free = (self.ram_free + task.ram_required).min(self.capacity.ram);
        true
    }
}

/// Fixed-size set of machines.
#[derive(Debug, Clone, PartialEq)]
pub struct MachinePool {
    machines: Vec<Machine>,
    occupancy: Occupancy,
}

impl MachinePool {
    /// Builds `count` machines using the capacity model.
    pub fn new(count: usize, model: CapacityModel, occupancy: Occupancy) -> Self {
        let machines = (0..count)
            .map(|id| Machine::new(id, model.capacity_of(id)))
            .collect();
        Self {
            machines,
            occupancy,
        }
    }

    /// Uniform pool with default 1/1 capacity, exclusive occupancy.
    pub fn uniform(count: usize) -> Self {
        Self::new(count, CapacityModel::default(), Occupancy::Exclusive)
    }

    /// Occupancy rule.
    pub fn occupancy(&self) -> Occupancy {
        self.occupancy
    }

    /// All machines, ordered by id.
    pub fn machines(&self) -> &[Machine] {
        &self.machines
    }

    /// Machine by id.
    pub fn get(&self, id: MachineId) -> Option<&Machine> {
        self.machines.get(id)
    }

    /// Number of machines.
    pub fn len(&self) -> usize {
        self.machines.len()
    }

    /// Whether the pool has no machines.
    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    /// Whether every machine is idle.
    pub fn all_idle(&self) -> bool {
        self.machines.iter().all(Machine::is_idle)
    }

    /// Whether at least one machine could accept some task right now.
    pub fn any_available(&self) -> bool {
        self.machines.iter().any(|m| match self.occupancy {
            Occupancy::Exclusive => m.is_idle(),
            Occupancy::Shared => m.has_free_capacity(),
        })
    }

    /// Whether the task fits some machine's configured capacity at all.
    pub fn can_ever_host(&self, task: &Task) -> bool {
        self.machines.iter().any(|m| m.capacity.covers(task))
    }

    /// Lowest-id machine that can host the task now.
    pub fn first_fit(&self, task: &Task) -> Option<MachineId> {
        self.machines
            .iter()
            .find(|m| m.can_host(task, self.occupancy))
            .map(|m| m.id)
    }

    /// Reserves the task's demand on `machine`.
    ///
    /// Returns `false` (and changes nothing) if the task does not fit.
    pub fn reserve(&mut self, machine: MachineId, task: &Task) -> bool {
        let occupancy = self.occupancy;
        match self.machines.get_mut(machine) {
            Some(m) if m.can_host(task, occupancy) => {
                m.reserve(task);
                true
            }
            _ => false,
        }
    }

    /// Releases the task's demand from `machine`.
    ///
    /// Returns `false` if the task was not running there.
    pub fn release(&mut self, machine: MachineId, task: &Task) -> bool {
        self.machines
            .get_mut(machine)
            .is_some_and(|m| m.release(task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;

    #[test]
    fn test_capacity_model_alternating() {
        let model = CapacityModel::heterogeneous();
        assert_eq!(model.capacity_of(0), Capacity::new(8, 32));
        assert_eq!(model.capacity_of(1), Capacity::new(4, 8));
        assert_eq!(model.capacity_of(2), Capacity::new(8, 32));
    }

    #[test]
    fn test_exclusive_reserve_release() {
        let mut pool = MachinePool::uniform(2);
        let t1 = Task::high(1, 0.0, 3.0, 10.0);
        let t2 = Task::high(2, 0.0, 3.0, 10.0);

        assert_eq!(pool.first_fit(&t1), Some(0));
        assert!(pool.reserve(0, &t1));
        assert!(!pool.reserve(0, &t2));
        assert_eq!(pool.first_fit(&t2), Some(1));

        assert!(pool.release(0, &t1));
        assert!(!pool.release(0, &t1));
        assert!(pool.get(0).unwrap().is_idle());
        assert_eq!(pool.get(0).unwrap().cpu_free, 1);
    }

    #[test]
    fn test_exclusive_blocks_even_with_spare_units() {
        let mut pool = MachinePool::new(
            1,
            CapacityModel::Uniform(Capacity::new(4, 4)),
            Occupancy::Exclusive,
        );
        let t1 = Task::high(1, 0.0, 1.0, 5.0);
        let t2 = Task::high(2, 0.0, 1.0, 5.0);
        assert!(pool.reserve(0, &t1));
        assert_eq!(pool.first_fit(&t2), None);
        assert!(!pool.any_available());
    }

    #[test]
    fn test_shared_packs_until_full() {
        let mut pool = MachinePool::new(
            1,
            CapacityModel::Uniform(Capacity::new(4, 4)),
            Occupancy::Shared,
        );
        let t1 = Task::high(1, 0.0, 1.0, 5.0).with_resources(2, 1);
        let t2 = Task::high(2, 0.0, 1.0, 5.0).with_resources(2, 3);
        let t3 = Task::high(3, 0.0, 1.0, 5.0).with_resources(1, 1);

        assert!(pool.reserve(0, &t1));
        assert!(pool.reserve(0, &t2));
        assert!(!pool.reserve(0, &t3));
        let m = pool.get(0).unwrap();
        assert_eq!((m.cpu_free, m.ram_free), (0, 0));
        assert_eq!(m.running, vec![1, 2]);
    }

    #[test]
    fn test_first_fit_skips_small_and_busy_machines() {
        let mut pool = MachinePool::new(3, CapacityModel::heterogeneous(), Occupancy::Exclusive);
        let big = Task::low(1, 0.0, 1.0, 5.0).with_resources(6, 16);
        let other = Task::low(3, 0.0, 1.0, 5.0);
        let huge = Task::low(2, 0.0, 1.0, 5.0).with_resources(16, 1);

        assert_eq!(pool.first_fit(&big), Some(0));
        assert!(pool.reserve(0, &other));
        // Machine 1 is the small model; machine 2 is the next large one.
        assert_eq!(pool.first_fit(&big), Some(2));
        assert!(pool.reserve(2, &other));
        assert_eq!(pool.first_fit(&big), None);
        assert!(!pool.can_ever_host(&huge));
    }
}
