//! Simulation result (output payload).
//!
//! A result is immutable once produced. It carries the per-task outcome,
//! per-priority deadline statistics and the chronological event log.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{MachineId, Priority, SimTime, TaskId};
use crate::metrics::ScheduleKpi;

/// Kind of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogEvent {
    /// Task became known to the engine.
    Arrival,
    /// Task dispatched to a machine.
    Start,
    /// Task finished.
    Completion,
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogEvent::Arrival => "ARRIVAL",
            LogEvent::Start => "START",
            LogEvent::Completion => "COMPLETION",
        })
    }
}

/// One human-readable trace entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Simulated time of the event.
    pub time: SimTime,
    /// Event kind.
    pub event: LogEvent,
    /// Task involved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    /// Machine involved (START / COMPLETION).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_id: Option<MachineId>,
    /// Scheduled completion time (START only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<SimTime>,
    /// Human-readable description.
    pub message: String,
}

impl LogEntry {
    /// Arrival entry.
    pub fn arrival(time: SimTime, task_id: TaskId, cpu: u32, ram: u32) -> Self {
        Self {
            time,
            event: LogEvent::Arrival,
            task_id: Some(task_id),
            machine_id: None,
            completion_time: None,
            message: format!("Task {task_id} arrives (Needs {cpu}CPU, {ram}GB)"),
        }
    }

    /// Start entry.
    pub fn start(
        time: SimTime,
        task_id: TaskId,
        machine_id: MachineId,
        completes_at: SimTime,
    ) -> Self {
        Self {
            time,
            event: LogEvent::Start,
            task_id: Some(task_id),
            machine_id: Some(machine_id),
            completion_time: Some(completes_at),
            message: format!(
                "Task {task_id} starts on Machine {machine_id} (completes at {completes_at:.1})"
            ),
        }
    }

    /// Completion entry.
    pub fn completion(time: SimTime, task_id: TaskId, machine_id: MachineId) -> Self {
        Self {
            time,
            event: LogEvent::Completion,
            task_id: Some(task_id),
            machine_id: Some(machine_id),
            completion_time: None,
            message: format!("Task {task_id} completes on Machine {machine_id}"),
        }
    }
}

/// Outcome of a single task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    /// Task identifier.
    pub id: TaskId,
    /// Priority class.
    pub priority: Priority,
    /// Arrival time.
    pub arrival_time: SimTime,
    /// Dispatch time; `None` if never dispatched.
    pub start_time: Option<SimTime>,
    /// Completion time; `None` if never completed.
    pub completion_time: Option<SimTime>,
    /// Deadline.
    pub deadline: SimTime,
    /// Completed no later than the deadline.
    pub meets_deadline: bool,
    /// Machine the task ran on.
    pub machine_id: Option<MachineId>,
    /// CPU demand.
    pub cpu_required: u32,
    /// RAM demand.
    pub ram_required: u32,
}

/// Deadline statistics of one priority bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityStats {
    /// Tasks in the bucket.
    pub total: usize,
    /// Tasks that completed by their deadline.
    pub met_deadline: usize,
}

impl PriorityStats {
    /// Fraction of tasks meeting their deadline, as a percentage (0 if empty).
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.met_deadline as f64 / self.total as f64 * 100.0
        }
    }
}

/// Complete output of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Latest completion time (0 if nothing completed).
    pub makespan: SimTime,
    /// Number of input tasks.
    pub total_tasks: usize,
    /// HIGH bucket statistics.
    pub high_priority_stats: PriorityStats,
    /// LOW bucket statistics.
    pub low_priority_stats: PriorityStats,
    /// One record per input task, ordered by id.
    pub tasks: Vec<TaskResult>,
    /// Chronological trace.
    pub logs: Vec<LogEntry>,
    /// Tasks whose demand exceeds every machine's capacity.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unschedulable_tasks: Vec<TaskId>,
    /// Extended performance indicators.
    pub kpi: ScheduleKpi,
}

impl SimulationResult {
    /// Result record for a task id.
    pub fn task(&self, id: TaskId) -> Option<&TaskResult> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Task ids in dispatch order (by START log entries).
    pub fn dispatch_order(&self) -> Vec<TaskId> {
        self.logs
            .iter()
            .filter(|l| l.event == LogEvent::Start)
            .filter_map(|l| l.task_id)
            .collect()
    }

    /// Stats for one priority bucket.
    pub fn stats_for(&self, priority: Priority) -> PriorityStats {
        match priority {
            Priority::High => self.high_priority_stats,
            Priority::Low => self.low_priority_stats,
        }
    }
}
