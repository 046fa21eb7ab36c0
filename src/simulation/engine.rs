//! Discrete-event simulation engine.
//!
//! # Algorithm
//!
//! 1. Seed one ARRIVAL per task.
//! 2. Pop every event at the earliest timestamp (completions first).
//!    Completions free capacity; arrivals make tasks READY.
//! 3. Dispatch until the policy finds no READY task that fits. Tasks that
//!    arrived in this batch compete with those already waiting, and each
//!    pick goes to the lowest-id machine that can host it.
//! 4. Repeat until the queue is empty, then aggregate.
//!
//! Simulated time only jumps between event timestamps; a run is
//! single-threaded and deterministic.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use super::{Event, EventQueue, SimulationConfig};
use crate::dispatching::{Dispatch, RuleEngine, SchedulingContext};
use crate::error::SimulationError;
use crate::metrics;
use crate::models::{
    LogEntry, MachineId, MachinePool, SimTime, SimulationRequest, SimulationResult, Task, TaskId,
    TaskRuntime,
};
use crate::policy::Policy;
use crate::validation::validate_request;

/// Lifecycle of a [`Simulator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    /// Built, no event processed.
    NotStarted,
    /// Processing events.
    Running,
    /// Queue drained; result produced.
    Finished,
}

/// One simulation run over a validated request.
///
/// A simulator is consumed by [`Simulator::run`] and cannot be re-run.
///
/// # Example
///
/// ```
/// use u_schedule_sim::models::{SimulationRequest, Task};
/// use u_schedule_sim::simulation::{SimulationConfig, Simulator};
///
/// let request = SimulationRequest::new("SPT", 1)
///     .with_task(Task::low(1, 0.0, 5.0, 10.0))
///     .with_task(Task::high(2, 0.0, 2.0, 3.0));
/// let result = Simulator::new(&request, SimulationConfig::default())
///     .unwrap()
///     .run()
///     .unwrap();
/// assert_eq!(result.dispatch_order(), vec![2, 1]);
/// assert!((result.makespan - 7.0).abs() < 1e-9);
/// ```
pub struct Simulator {
    policy: Policy,
    rules: RuleEngine,
    config: SimulationConfig,
    tasks: Vec<Task>,
    runtimes: Vec<TaskRuntime>,
    index: HashMap<TaskId, usize>,
    pool: MachinePool,
    queue: EventQueue,
    ready: Vec<usize>,
    logs: Vec<LogEntry>,
    unschedulable: Vec<TaskId>,
    now: SimTime,
    state: SimulationState,
}

impl Simulator {
    /// Validates the request and prepares a run.
    ///
    /// # Errors
    /// [`SimulationError::Validation`] for malformed input,
    /// [`SimulationError::InvalidAlgorithm`] for an unknown policy id.
    pub fn new(
        request: &SimulationRequest,
        config: SimulationConfig,
    ) -> Result<Self, SimulationError> {
        validate_request(request).map_err(SimulationError::Validation)?;
        let policy = Policy::from_id(&request.algorithm, request.alpha)?;

        let tasks = request.tasks.clone();
        let index = tasks.iter().enumerate().map(|(i, t)| (t.id, i)).collect();

        Ok(Self {
            policy,
            rules: policy.rule_engine(),
            config,
            runtimes: vec![TaskRuntime::new(); tasks.len()],
            index,
            pool: config.build_pool(request.num_machines),
            queue: EventQueue::new(),
            ready: Vec::new(),
            logs: Vec::with_capacity(tasks.len() * 3),
            unschedulable: Vec::new(),
            now: 0.0,
            state: SimulationState::NotStarted,
            tasks,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SimulationState {
        self.state
    }

    /// Policy driving this run.
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Runs the simulation to completion.
    ///
    /// # Errors
    /// [`SimulationError::Transition`] if the engine breaks a task lifecycle
    /// invariant; this indicates a bug, not bad input.
    pub fn run(mut self) -> Result<SimulationResult, SimulationError> {
        self.state = SimulationState::Running;
        info!(
            policy = %self.policy,
            tasks = self.tasks.len(),
            machines = self.pool.len(),
            "simulation started"
        );

        for task in &self.tasks {
            self.queue.push(task.arrival_time, Event::Arrival { task_id: task.id });
        }

        loop {
            let batch = self.queue.pop_batch();
            let Some(first) = batch.first() else {
                break;
            };
            self.now = first.time;

            for scheduled in &batch {
                match scheduled.event {
                    Event::Completion {
                        task_id,
                        machine_id,
                    } => self.complete(task_id, machine_id)?,
                    Event::Arrival { task_id } => self.arrive(task_id)?,
                }
            }

            self.dispatch()?;
        }

        debug_assert!(self.ready.is_empty());
        debug_assert!(self.pool.all_idle());
        self.state = SimulationState::Finished;

        let result = metrics::aggregate(
            &self.tasks,
            &self.runtimes,
            self.pool.len(),
            self.logs,
            self.unschedulable,
        );
        info!(
            policy = %self.policy,
            makespan = result.makespan,
            met = result.kpi.total_met_deadline,
            total = result.total_tasks,
            "simulation finished"
        );
        Ok(result)
    }

    fn arrive(&mut self, task_id: TaskId) -> Result<(), SimulationError> {
        let Some(&idx) = self.index.get(&task_id) else {
            return Ok(());
        };
        let task = &self.tasks[idx];
        self.logs.push(LogEntry::arrival(
            self.now,
            task.id,
            task.cpu_required,
            task.ram_required,
        ));

        if !self.pool.can_ever_host(task) {
            warn!(
                task = task.id,
                cpu = task.cpu_required,
                ram = task.ram_required,
                "task demand exceeds every machine; it will never run"
            );
            self.unschedulable.push(task.id);
            return Ok(());
        }

        debug!(time = self.now, task = task.id, "arrival");
        self.runtimes[idx].mark_ready()?;
        self.ready.push(idx);
        Ok(())
    }

    fn complete(&mut self, task_id: TaskId, machine_id: MachineId) -> Result<(), SimulationError> {
        let Some(&idx) = self.index.get(&task_id) else {
            return Ok(());
        };
        let released = self.pool.release(machine_id, &self.tasks[idx]);
        debug_assert!(released, "task {task_id} was not running on machine {machine_id}");

        self.runtimes[idx].mark_completed(self.now)?;
        self.logs
            .push(LogEntry::completion(self.now, task_id, machine_id));
        debug!(time = self.now, task = task_id, machine = machine_id, "completion");
        Ok(())
    }

    /// Starts tasks until the policy finds nothing that fits.
    fn dispatch(&mut self) -> Result<(), SimulationError> {
        while !self.ready.is_empty() && self.pool.any_available() {
            let Some(choice) = self.select() else {
                break;
            };
            self.start(choice)?;
        }
        Ok(())
    }

    fn select(&self) -> Option<Dispatch> {
        let ready: Vec<&Task> = self.ready.iter().map(|&i| &self.tasks[i]).collect();
        let context = SchedulingContext::at_time(self.now)
            .with_urgency_epsilon(self.config.urgency_epsilon)
            .with_ready_set(ready.iter().copied());
        self.rules.select(&ready, &self.pool, &context)
    }

    fn start(&mut self, choice: Dispatch) -> Result<(), SimulationError> {
        let Some(&idx) = self.index.get(&choice.task_id) else {
            return Ok(());
        };
        let task = &self.tasks[idx];
        let reserved = self.pool.reserve(choice.machine_id, task);
        debug_assert!(reserved, "selected machine cannot host task {}", task.id);

        self.runtimes[idx].mark_running(self.now, choice.machine_id)?;
        self.ready.retain(|&i| i != idx);

        let completes_at = self.now + task.processing_time;
        self.queue.push(
            completes_at,
            Event::Completion {
                task_id: task.id,
                machine_id: choice.machine_id,
            },
        );
        self.logs.push(LogEntry::start(
            self.now,
            task.id,
            choice.machine_id,
            completes_at,
        ));
        debug!(
            time = self.now,
            task = task.id,
            machine = choice.machine_id,
            completes_at,
            "dispatch"
        );
        Ok(())
    }
}
