//! Turns finished engine state into a [`SimulationResult`].

use tracing::error;

use super::ScheduleKpi;
use crate::models::{
    LogEntry, Priority, PriorityStats, SimulationResult, Task, TaskId, TaskResult, TaskRuntime,
};

/// Builds the result of a finished run.
///
/// `tasks` and `runtimes` are parallel slices. The aggregator is pure: it
/// reads engine state and never mutates it.
pub fn aggregate(
    tasks: &[Task],
    runtimes: &[TaskRuntime],
    num_machines: usize,
    logs: Vec<LogEntry>,
    mut unschedulable: Vec<TaskId>,
) -> SimulationResult {
    debug_assert_eq!(tasks.len(), runtimes.len());

    let mut records: Vec<TaskResult> = tasks
        .iter()
        .zip(runtimes)
        .map(|(task, runtime)| task_result(task, runtime))
        .collect();
    records.sort_by_key(|r| r.id);

    let makespan = records
        .iter()
        .filter_map(|r| r.completion_time)
        .fold(0.0, f64::max);

    let high_priority_stats = bucket(&records, Priority::High);
    let low_priority_stats = bucket(&records, Priority::Low);

    if let Some(pos) = logs.windows(2).position(|w| w[1].time < w[0].time) {
        error!(
            index = pos + 1,
            time = logs[pos + 1].time,
            previous = logs[pos].time,
            "event log is not in chronological order"
        );
        debug_assert!(false, "event log out of order at index {}", pos + 1);
    }

    unschedulable.sort_unstable();
    let kpi = ScheduleKpi::calculate(&records, makespan, num_machines);

    SimulationResult {
        makespan,
        total_tasks: records.len(),
        high_priority_stats,
        low_priority_stats,
        tasks: records,
        logs,
        unschedulable_tasks: unschedulable,
        kpi,
    }
}

fn task_result(task: &Task, runtime: &TaskRuntime) -> TaskResult {
    let completion_time = runtime.completion_time();
    TaskResult {
        id: task.id,
        priority: task.priority,
        arrival_time: task.arrival_time,
        start_time: runtime.start_time(),
        completion_time,
        deadline: task.deadline,
        meets_deadline: completion_time.is_some_and(|c| task.meets_deadline_at(c)),
        machine_id: runtime.assigned_machine(),
        cpu_required: task.cpu_required,
        ram_required: task.ram_required,
    }
}

fn bucket(records: &[TaskResult], priority: Priority) -> PriorityStats {
    records
        .iter()
        .filter(|r| r.priority == priority)
        .fold(PriorityStats::default(), |mut stats, r| {
            stats.total += 1;
            if r.meets_deadline {
                stats.met_deadline += 1;
            }
            stats
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(now_start: f64, now_end: f64, machine: usize) -> TaskRuntime {
        let mut rt = TaskRuntime::new();
        rt.mark_ready().unwrap();
        rt.mark_running(now_start, machine).unwrap();
        rt.mark_completed(now_end).unwrap();
        rt
    }

    #[test]
    fn test_aggregate_sorts_and_counts() {
        let tasks = vec![
            Task::low(2, 0.0, 3.0, 2.0),
            Task::high(1, 0.0, 1.0, 5.0),
        ];
        let runtimes = vec![finished(1.0, 4.0, 0), finished(0.0, 1.0, 0)];
        let logs = vec![
            LogEntry::arrival(0.0, 1, 1, 1),
            LogEntry::arrival(0.0, 2, 1, 1),
            LogEntry::start(0.0, 1, 0, 1.0),
            LogEntry::completion(1.0, 1, 0),
            LogEntry::start(1.0, 2, 0, 4.0),
            LogEntry::completion(4.0, 2, 0),
        ];

        let result = aggregate(&tasks, &runtimes, 1, logs, Vec::new());

        assert_eq!(result.tasks.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2]);
        assert!((result.makespan - 4.0).abs() < 1e-9);
        assert_eq!(result.total_tasks, 2);
        assert_eq!(result.high_priority_stats, PriorityStats { total: 1, met_deadline: 1 });
        assert_eq!(result.low_priority_stats, PriorityStats { total: 1, met_deadline: 0 });
        assert_eq!(result.kpi.completed_tasks, 2);
        assert_eq!(result.dispatch_order(), vec![1, 2]);
    }

    #[test]
    fn test_aggregate_unscheduled_task() {
        let tasks = vec![Task::high(1, 0.0, 1.0, 5.0).with_resources(4, 4)];
        let result = aggregate(
            &tasks,
            &[TaskRuntime::new()],
            1,
            vec![LogEntry::arrival(0.0, 1, 4, 4)],
            vec![1],
        );

        let record = result.task(1).unwrap();
        assert!(record.start_time.is_none());
        assert!(record.completion_time.is_none());
        assert!(!record.meets_deadline);
        assert!((result.makespan - 0.0).abs() < 1e-9);
        assert_eq!(result.unschedulable_tasks, vec![1]);
    }

    #[test]
    fn test_deadline_boundary_is_met() {
        let tasks = vec![Task::low(1, 0.0, 5.0, 5.0)];
        let result = aggregate(&tasks, &[finished(0.0, 5.0, 0)], 1, Vec::new(), Vec::new());
        assert!(result.tasks[0].meets_deadline);
    }
}
