//! Result aggregation and KPI evaluation.
//!
//! [`aggregate`] converts finished engine state into a [`SimulationResult`]:
//! makespan, per-priority deadline statistics, one record per task and the
//! chronological log. [`ScheduleKpi`] adds response, waiting, tardiness and
//! utilization indicators.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1.2
//! - Baker & Trietsch (2019), "Principles of Sequencing and Scheduling"
//!
//! [`SimulationResult`]: crate::models::SimulationResult

mod aggregate;
mod kpi;

pub use aggregate::aggregate;
pub use kpi::ScheduleKpi;
