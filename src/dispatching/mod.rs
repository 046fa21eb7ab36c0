//! Dispatching rules and rule engine.
//!
//! Provides priority-based dispatching rules (SPT, EDF, DPE, etc.) and a
//! composable rule engine that ranks READY tasks and pairs the best one that
//! fits with the lowest-id free machine.
//!
//! # Usage
//!
//! ```
//! use u_schedule_sim::dispatching::{RuleEngine, SchedulingContext, TieBreaker};
//! use u_schedule_sim::dispatching::rules;
//! use u_schedule_sim::models::{MachinePool, Task};
//!
//! let engine = RuleEngine::new()
//!     .with_rule(rules::Edf)
//!     .with_final_tie_breaker(TieBreaker::ById);
//!
//! let tasks = [Task::low(1, 0.0, 2.0, 9.0), Task::low(2, 0.0, 2.0, 4.0)];
//! let ready: Vec<&Task> = tasks.iter().collect();
//! let pool = MachinePool::uniform(1);
//! let ctx = SchedulingContext::at_time(0.0);
//!
//! let pick = engine.select(&ready, &pool, &ctx).unwrap();
//! assert_eq!((pick.task_id, pick.machine_id), (2, 0));
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Liu & Layland (1973), "Scheduling Algorithms for Multiprogramming in a
//!   Hard-Real-Time Environment"

mod context;
mod engine;
pub mod rules;

pub use context::{SchedulingContext, DEFAULT_URGENCY_EPSILON};
pub use engine::{Dispatch, EvaluationMode, RuleEngine, TieBreaker};

use crate::models::Task;
use std::fmt::Debug;

/// Score returned by a dispatching rule.
///
/// Lower scores = higher priority (dispatched first).
pub type RuleScore = f64;

/// A dispatching rule that evaluates task priority.
///
/// # Score Convention
/// **Lower score = higher priority.** Rules that favour large values
/// (response ratio, composite DPE score) return the negated value.
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "SPT", "EDF").
    fn name(&self) -> &'static str;

    /// Evaluates the priority of a task given the current scheduling context.
    fn evaluate(&self, task: &Task, context: &SchedulingContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
