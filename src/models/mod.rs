//! Simulation domain models.
//!
//! Provides the data types exchanged with callers (request, result) and the
//! entities the engine owns during a run (task runtime state, machines).
//!
//! # Entity Lifetimes
//!
//! | Type | Created | Mutated | Discarded |
//! |------|---------|---------|-----------|
//! | `Task` | request parse | never | after run |
//! | `TaskRuntime` | run start | dispatch / completion | after run |
//! | `MachinePool` | run start | dispatch / completion | after run |
//! | `SimulationResult` | run end | never | by caller |

mod machine;
mod request;
mod result;
mod task;

pub use machine::{Capacity, CapacityModel, Machine, MachineId, MachinePool, Occupancy};
pub use request::{SimulationRequest, DEFAULT_ALPHA};
pub use result::{LogEntry, LogEvent, PriorityStats, SimulationResult, TaskResult};
pub use task::{Priority, SimTime, Task, TaskId, TaskRuntime, TaskState, TransitionError};
