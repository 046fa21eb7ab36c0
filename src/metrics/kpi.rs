//! Schedule quality metrics (KPIs).
//!
//! Computes scheduling performance indicators from the per-task records of a
//! finished run.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Success Rate | % of tasks completing by their deadline |
//! | Avg Response Time | Mean of completion - arrival |
//! | Avg Waiting Time | Mean of start - arrival |
//! | Total Tardiness | Sum of max(0, completion - deadline) |
//! | Maximum Tardiness | Largest single delay |
//! | Avg Utilization | Mean fraction of the makespan a machine was occupied |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use serde::{Deserialize, Serialize};

use crate::models::{Priority, SimTime, TaskResult};

/// Schedule performance indicators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleKpi {
    /// Tasks that finished.
    pub completed_tasks: usize,
    /// Tasks that finished by their deadline.
    pub total_met_deadline: usize,
    /// Overall deadline success rate (%).
    pub success_rate: f64,
    /// HIGH-priority deadline success rate (%).
    pub high_success_rate: f64,
    /// LOW-priority deadline success rate (%).
    pub low_success_rate: f64,
    /// Mean completion - arrival over completed tasks.
    pub avg_response_time: f64,
    /// Mean start - arrival over dispatched tasks.
    pub avg_waiting_time: f64,
    /// Sum of tardiness over completed tasks.
    pub total_tardiness: f64,
    /// Largest tardiness of any completed task.
    pub max_tardiness: f64,
    /// Mean machine utilization (0.0..1.0).
    pub avg_utilization: f64,
    /// Utilization per machine, indexed by machine id.
    pub utilization_by_machine: Vec<f64>,
}

impl ScheduleKpi {
    /// Computes KPIs from task records.
    ///
    /// # Arguments
    /// * `tasks` - One record per input task.
    /// * `makespan` - Latest completion time of the run.
    /// * `num_machines` - Size of the machine pool.
    pub fn calculate(tasks: &[TaskResult], makespan: SimTime, num_machines: usize) -> Self {
        let mut completed = 0usize;
        let mut met = 0usize;
        let mut total_response = 0.0;
        let mut dispatched = 0usize;
        let mut total_waiting = 0.0;
        let mut total_tardiness = 0.0;
        let mut max_tardiness: f64 = 0.0;

        for task in tasks {
            if let Some(start) = task.start_time {
                dispatched += 1;
                total_waiting += start - task.arrival_time;
            }
            if let Some(completion) = task.completion_time {
                completed += 1;
                total_response += completion - task.arrival_time;

                let tardiness = (completion - task.deadline).max(0.0);
                total_tardiness += tardiness;
                max_tardiness = max_tardiness.max(tardiness);
            }
            if task.meets_deadline {
                met += 1;
            }
        }

        let utilization_by_machine = machine_utilization(tasks, makespan, num_machines);
        let avg_utilization = if utilization_by_machine.is_empty() {
            0.0
        } else {
            utilization_by_machine.iter().sum::<f64>() / utilization_by_machine.len() as f64
        };

        Self {
            completed_tasks: completed,
            total_met_deadline: met,
            success_rate: percentage(met, tasks.len()),
            high_success_rate: class_success_rate(tasks, Priority::High),
            low_success_rate: class_success_rate(tasks, Priority::Low),
            avg_response_time: mean(total_response, completed),
            avg_waiting_time: mean(total_waiting, dispatched),
            total_tardiness,
            max_tardiness,
            avg_utilization,
            utilization_by_machine,
        }
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_tardiness: f64, min_utilization: f64) -> bool {
        self.max_tardiness <= max_tardiness && self.avg_utilization >= min_utilization
    }
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn class_success_rate(tasks: &[TaskResult], priority: Priority) -> f64 {
    let (total, met) = tasks
        .iter()
        .filter(|t| t.priority == priority)
        .fold((0, 0), |(total, met), t| (total + 1, met + usize::from(t.meets_deadline)));
    percentage(met, total)
}

/// Occupied time per machine over the makespan.
///
/// Overlapping intervals (shared machines) are merged, so a value never
/// exceeds 1.0.
fn machine_utilization(tasks: &[TaskResult], makespan: SimTime, num_machines: usize) -> Vec<f64> {
    let mut intervals: Vec<Vec<(SimTime, SimTime)>> = vec![Vec::new(); num_machines];
    for task in tasks {
        if let (Some(machine), Some(start), Some(end)) =
            (task.machine_id, task.start_time, task.completion_time)
        {
            if let Some(slot) = intervals.get_mut(machine) {
                slot.push((start, end));
            }
        }
    }

    intervals
        .into_iter()
        .map(|mut spans| {
            if makespan <= 0.0 {
                return 0.0;
            }
            spans.sort_by(|a, b| a.0.total_cmp(&b.0));
            let mut busy = 0.0;
            let mut current: Option<(SimTime, SimTime)> = None;
            for (start, end) in spans {
                current = match current {
                    Some((s, e)) if start <= e => Some((s, e.max(end))),
                    Some((s, e)) => {
                        busy += e - s;
                        Some((start, end))
                    }
                    None => Some((start, end)),
                };
            }
            if let Some((s, e)) = current {
                busy += e - s;
            }
            busy / makespan
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        id: u32,
        priority: Priority,
        arrival: f64,
        run: Option<(usize, f64, f64)>,
        deadline: f64,
    ) -> TaskResult {
        let completion = run.map(|(_, _, end)| end);
        TaskResult {
            id,
            priority,
            arrival_time: arrival,
            start_time: run.map(|(_, start, _)| start),
            completion_time: completion,
            deadline,
            meets_deadline: completion.is_some_and(|c| c <= deadline),
            machine_id: run.map(|(m, _, _)| m),
            cpu_required: 1,
            ram_required: 1,
        }
    }

    #[test]
    fn test_kpi_basic() {
        let tasks = vec![
            record(1, Priority::High, 0.0, Some((0, 0.0, 2.0)), 5.0),
            record(2, Priority::Low, 0.0, Some((0, 2.0, 6.0)), 5.0),
        ];
        let kpi = ScheduleKpi::calculate(&tasks, 6.0, 1);

        assert_eq!(kpi.completed_tasks, 2);
        assert_eq!(kpi.total_met_deadline, 1);
        assert!((kpi.success_rate - 50.0).abs() < 1e-9);
        assert!((kpi.high_success_rate - 100.0).abs() < 1e-9);
        assert!((kpi.low_success_rate - 0.0).abs() < 1e-9);
        assert!((kpi.avg_response_time - 4.0).abs() < 1e-9);
        assert!((kpi.avg_waiting_time - 1.0).abs() < 1e-9);
        assert!((kpi.total_tardiness - 1.0).abs() < 1e-9);
        assert!((kpi.max_tardiness - 1.0).abs() < 1e-9);
        assert!((kpi.avg_utilization - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_kpi_idle_machine_and_gaps() {
        let tasks = vec![
            record(1, Priority::High, 0.0, Some((0, 0.0, 2.0)), 10.0),
            record(2, Priority::High, 6.0, Some((0, 6.0, 8.0)), 10.0),
        ];
        let kpi = ScheduleKpi::calculate(&tasks, 8.0, 2);
        assert!((kpi.utilization_by_machine[0] - 0.5).abs() < 1e-9);
        assert!((kpi.utilization_by_machine[1] - 0.0).abs() < 1e-9);
        assert!((kpi.avg_utilization - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_overlapping_intervals_merge() {
        let tasks = vec![
            record(1, Priority::Low, 0.0, Some((0, 0.0, 4.0)), 10.0),
            record(2, Priority::Low, 0.0, Some((0, 1.0, 3.0)), 10.0),
        ];
        let kpi = ScheduleKpi::calculate(&tasks, 4.0, 1);
        assert!((kpi.utilization_by_machine[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_never_run_task_counts_as_missed() {
        let tasks = vec![
            record(1, Priority::High, 0.0, Some((0, 0.0, 1.0)), 5.0),
            record(2, Priority::High, 0.0, None, 5.0),
        ];
        let kpi = ScheduleKpi::calculate(&tasks, 1.0, 1);
        assert_eq!(kpi.completed_tasks, 1);
        assert!((kpi.high_success_rate - 50.0).abs() < 1e-9);
        assert!((kpi.total_tardiness - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_run() {
        let kpi = ScheduleKpi::calculate(&[], 0.0, 3);
        assert_eq!(kpi.completed_tasks, 0);
        assert!((kpi.success_rate - 0.0).abs() < 1e-9);
        assert_eq!(kpi.utilization_by_machine, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_thresholds() {
        let tasks = vec![record(1, Priority::High, 0.0, Some((0, 0.0, 6.0)), 5.0)];
        let kpi = ScheduleKpi::calculate(&tasks, 6.0, 1);
        assert!(kpi.meets_thresholds(1.0, 0.9));
        assert!(!kpi.meets_thresholds(0.5, 0.9));
    }
}
