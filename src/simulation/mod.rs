//! Discrete-event simulation.
//!
//! Drives a [`MachinePool`] through a stream of task arrivals under one
//! [`Policy`], producing a chronological event log and per-task timings.
//!
//! # Event ordering
//!
//! Events fire in `(time, kind, task_id)` order with completions before
//! arrivals at the same instant. All events sharing a timestamp are applied
//! before any dispatch decision is made.
//!
//! # Example
//!
//! ```
//! use u_schedule_sim::models::{SimulationRequest, Task};
//! use u_schedule_sim::simulate;
//!
//! let request = SimulationRequest::new("PRIORITY_FIRST", 1)
//!     .with_task(Task::low(1, 0.0, 1.0, 10.0))
//!     .with_task(Task::high(2, 0.0, 5.0, 10.0));
//! let result = simulate(&request).unwrap();
//! assert_eq!(result.dispatch_order(), vec![2, 1]);
//! ```
//!
//! [`MachinePool`]: crate::models::MachinePool
//! [`Policy`]: crate::policy::Policy

mod config;
mod engine;
mod event;

pub use config::SimulationConfig;
pub use engine::{SimulationState, Simulator};
pub use event::{Event, EventQueue, ScheduledEvent};

use crate::error::SimulationError;
use crate::models::{SimulationRequest, SimulationResult};

/// Runs one request with the default configuration.
///
/// # Errors
/// Fails without producing a partial result if the request is invalid or
/// names an unknown algorithm.
pub fn simulate(request: &SimulationRequest) -> Result<SimulationResult, SimulationError> {
    simulate_with(request, &SimulationConfig::default())
}

/// Runs one request with an explicit configuration.
pub fn simulate_with(
    request: &SimulationRequest,
    config: &SimulationConfig,
) -> Result<SimulationResult, SimulationError> {
    Simulator::new(request, *config)?.run()
}
