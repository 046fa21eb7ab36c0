//! Discrete-event simulator for machine-pool scheduling.
//!
//! Simulates how a pool of machines processes a stream of tasks under a
//! chosen dispatching policy, producing a time-ordered event trace and
//! aggregate deadline metrics. Runs are deterministic: the same request
//! always yields the same logs and metrics.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Task`, `TaskRuntime`, `MachinePool`,
//!   `SimulationRequest`, `SimulationResult`
//! - **`dispatching`**: Dispatching rules and the rule engine that pairs a
//!   READY task with a machine
//! - **`policy`**: Policy registry (`SPT`, `EDF`, `PRIORITY_FIRST`, `DPE`, ...)
//! - **`simulation`**: Event queue and simulation engine
//! - **`metrics`**: Result aggregation and KPIs
//! - **`validation`**: Input integrity checks
//! - **`scenarios`**: Built-in and synthetic workloads
//! - **`experiment`**: Policy × scenario comparison
//!
//! # Example
//!
//! ```
//! use u_schedule_sim::models::{SimulationRequest, Task};
//! use u_schedule_sim::simulate;
//!
//! let request = SimulationRequest::new("EDF", 2)
//!     .with_task(Task::high(1, 0.0, 3.0, 10.0))
//!     .with_task(Task::low(2, 0.0, 4.0, 5.0));
//! let result = simulate(&request).unwrap();
//! assert_eq!(result.high_priority_stats.met_deadline, 1);
//! assert!((result.makespan - 4.0).abs() < 1e-9);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Liu & Layland (1973), "Scheduling Algorithms for Multiprogramming in a
//!   Hard-Real-Time Environment"

pub mod dispatching;
pub mod error;
pub mod experiment;
pub mod metrics;
pub mod models;
pub mod policy;
pub mod scenarios;
pub mod simulation;
pub mod validation;

pub use error::SimulationError;
pub use policy::{algorithms, AlgorithmInfo, Policy};
pub use simulation::{simulate, simulate_with, SimulationConfig};
