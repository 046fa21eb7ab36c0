//! Simulation request (input payload).

use serde::{Deserialize, Serialize};

use super::Task;

/// Default DPE mixing weight.
pub const DEFAULT_ALPHA: f64 = 0.7;

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

/// A request to simulate one task set under one policy.
///
/// # Example
/// ```
/// use u_schedule_sim::models::{SimulationRequest, Task};
///
/// let request = SimulationRequest::new("EDF", 2)
///     .with_task(Task::high(1, 0.0, 3.0, 10.0))
///     .with_task(Task::low(2, 1.0, 2.0, 20.0));
/// assert_eq!(request.tasks.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Policy identifier (`SPT`, `EDF`, `PRIORITY_FIRST`, `DPE`, ...).
    pub algorithm: String,
    /// Number of machines in the pool.
    pub num_machines: usize,
    /// Tasks to simulate; ids unique.
    pub tasks: Vec<Task>,
    /// DPE mixing weight in [0, 1]. Ignored by other policies.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

impl SimulationRequest {
    /// Creates a request with no tasks and the default alpha.
    pub fn new(algorithm: impl Into<String>, num_machines: usize) -> Self {
        Self {
            algorithm: algorithm.into(),
            num_machines,
            tasks: Vec::new(),
            alpha: DEFAULT_ALPHA,
        }
    }

    /// Adds a task.
    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    /// Replaces the task set.
    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    /// Sets the DPE alpha.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Same tasks and machines under another policy.
    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = algorithm.into();
        self
    }
}
