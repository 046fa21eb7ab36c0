//! Task model and per-run task state.
//!
//! A [`Task`] is the immutable input description of a unit of work. The
//! engine pairs every task with a [`TaskRuntime`] that tracks its lifecycle
//! during one simulation run.
//!
//! # Lifecycle
//!
//! ```text
//! Pending ──arrival──▶ Ready ──dispatch──▶ Running ──completion──▶ Completed
//! ```
//!
//! Transitions only move forward. A task that never fits any machine stays
//! `Pending` for the whole run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Simulated (logical) time. Never wall-clock.
pub type SimTime = f64;

/// Task identifier (unique, positive).
pub type TaskId = u32;

/// Priority class of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    /// Dispatched first by priority-aware policies.
    High,
    /// Background work.
    Low,
}

impl Priority {
    /// Rank used by priority ordering (HIGH = 0, LOW = 1).
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Low => 1,
        }
    }

    /// Weight used by the dynamic-priority policy (HIGH = 1.0, LOW = 0.0).
    pub fn weight(self) -> f64 {
        match self {
            Priority::High => 1.0,
            Priority::Low => 0.0,
        }
    }

    /// Wire name (`"HIGH"` / `"LOW"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Low => "LOW",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_units() -> u32 {
    1
}

/// A task to be simulated.
///
/// Field names follow the request wire format, so a `Task` deserializes
/// directly from a `TaskInput` JSON object. `cpu_required` and
/// `ram_required` default to one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: TaskId,
    /// Time at which the task becomes ready.
    pub arrival_time: SimTime,
    /// Time the task occupies a machine.
    pub processing_time: SimTime,
    /// Priority class.
    pub priority: Priority,
    /// Latest acceptable completion time.
    pub deadline: SimTime,
    /// CPU units needed while running.
    #[serde(default = "default_units")]
    pub cpu_required: u32,
    /// RAM units needed while running.
    #[serde(default = "default_units")]
    pub ram_required: u32,
}

impl Task {
    /// Creates a task requiring one CPU and one RAM unit.
    pub fn new(
        id: TaskId,
        arrival_time: SimTime,
        processing_time: SimTime,
        priority: Priority,
        deadline: SimTime,
    ) -> Self {
        Self {
            id,
            arrival_time,
            processing_time,
            priority,
            deadline,
            cpu_required: 1,
            ram_required: 1,
        }
    }

    /// Shorthand for a HIGH priority task.
    pub fn high(
        id: TaskId,
        arrival_time: SimTime,
        processing_time: SimTime,
        deadline: SimTime,
    ) -> Self {
        Self::new(id, arrival_time, processing_time, Priority::High, deadline)
    }

    /// Shorthand for a LOW priority task.
    pub fn low(
        id: TaskId,
        arrival_time: SimTime,
        processing_time: SimTime,
        deadline: SimTime,
    ) -> Self {
        Self::new(id, arrival_time, processing_time, Priority::Low, deadline)
    }

    /// Sets the resource demand.
    pub fn with_resources(mut self, cpu_required: u32, ram_required: u32) -> Self {
        self.cpu_required = cpu_required;
        self.ram_required = ram_required;
        self
    }

    /// Whether a completion at `completion_time` meets the deadline.
    #[inline]
    pub fn meets_deadline_at(&self, completion_time: SimTime) -> bool {
        completion_time <= self.deadline
    }

    /// Remaining time until the deadline (negative when overdue).
    #[inline]
    pub fn time_to_deadline(&self, now: SimTime) -> SimTime {
        self.deadline - now
    }
}

/// Lifecycle state of a task within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskState {
    /// Not yet arrived (or never fits any machine).
    Pending,
    /// Arrived, waiting for a machine.
    Ready,
    /// Occupying a machine.
    Running,
    /// Finished.
    Completed,
}

/// Illegal lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("task cannot move from {from:?} to {to:?}")]
pub struct TransitionError {
    /// State the task was in.
    pub from: TaskState,
    /// State that was requested.
    pub to: TaskState,
}

/// Mutable per-run state of a task.
///
/// Every timestamp and the machine assignment are written exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRuntime {
    state: TaskState,
    start_time: Option<SimTime>,
    completion_time: Option<SimTime>,
    assigned_machine: Option<usize>,
}

impl Default for TaskRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskRuntime {
    /// Fresh runtime in the `Pending` state.
    pub fn new() -> Self {
        Self {
            state: TaskState::Pending,
            start_time: None,
            completion_time: None,
            assigned_machine: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Dispatch time, if dispatched.
    pub fn start_time(&self) -> Option<SimTime> {
        self.start_time
    }

    /// Completion time, if completed.
    pub fn completion_time(&self) -> Option<SimTime> {
        self.completion_time
    }

    /// Machine the task was dispatched to.
    pub fn assigned_machine(&self) -> Option<usize> {
        self.assigned_machine
    }

    /// Pending → Ready.
    pub fn mark_ready(&mut self) -> Result<(), TransitionError> {
        self.advance(TaskState::Pending, TaskState::Ready)
    }

    /// Ready → Running on `machine` at `now`.
    pub fn mark_running(&mut self, now: SimTime, machine: usize) -> Result<(), TransitionError> {
        self.advance(TaskState::Ready, TaskState::Running)?;
        self.start_time = Some(now);
        self.assigned_machine = Some(machine);
        Ok(())
    }

    /// Running → Completed at `now`.
    pub fn mark_completed(&mut self, now: SimTime) -> Result<(), TransitionError> {
        self.advance(TaskState::Running, TaskState::Completed)?;
        self.completion_time = Some(now);
        Ok(())
    }

    fn advance(&mut self, from: TaskState, to: TaskState) -> Result<(), TransitionError> {
        if self.state != from {
            return Err(TransitionError {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_builder() {
        let task = Task::high(7, 1.0, 4.0, 12.0).with_resources(2, 3);
        assert_eq!(task.id, 7);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.cpu_required, 2);
        assert_eq!(task.ram_required, 3);
        assert!(task.meets_deadline_at(12.0));
        assert!(!task.meets_deadline_at(12.5));
        assert!((task.time_to_deadline(10.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_task_deserialize_defaults() {
        let json = r#"{"id": 1, "arrival_time": 0, "processing_time": 5,
            "priority": "LOW", "deadline": 10}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.cpu_required, 1);
        assert_eq!(task.ram_required, 1);
    }

    #[test]
    fn test_priority_wire_name() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"HIGH\"");
        assert_eq!(Priority::Low.to_string(), "LOW");
        assert!(Priority::High.rank() < Priority::Low.rank());
    }

    #[test]
    fn test_runtime_forward_transitions() {
        let mut rt = TaskRuntime::new();
        assert_eq!(rt.state(), TaskState::Pending);
        rt.mark_ready().unwrap();
        rt.mark_running(2.0, 1).unwrap();
        rt.mark_completed(5.0).unwrap();

        assert_eq!(rt.state(), TaskState::Completed);
        assert_eq!(rt.start_time(), Some(2.0));
        assert_eq!(rt.completion_time(), Some(5.0));
        assert_eq!(rt.assigned_machine(), Some(1));
    }

    #[test]
    fn test_runtime_rejects_double_dispatch() {
        let mut rt = TaskRuntime::new();
        rt.mark_ready().unwrap();
        rt.mark_running(0.0, 0).unwrap();
        let err = rt.mark_running(1.0, 1).unwrap_err();
        assert_eq!(err.from, TaskState::Running);
        assert_eq!(rt.start_time(), Some(0.0));
        assert_eq!(rt.assigned_machine(), Some(0));
    }

    #[test]
    fn test_runtime_rejects_skipping_ready() {
        let mut rt = TaskRuntime::new();
        assert!(rt.mark_running(0.0, 0).is_err());
        assert!(rt.mark_completed(1.0).is_err());
    }
}
