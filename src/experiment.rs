//! Policy comparison across scenarios.
//!
//! Runs every (scenario, policy) pair and flattens each result into one
//! [`ComparisonRow`]. Runs are independent, so the matrix is evaluated in
//! parallel; row order is still scenario-major, policy-minor. Rows render
//! as a text table or export as CSV.

use std::fmt::Write as _;
use std::io;

use rayon::prelude::*;
use serde::Serialize;

use crate::error::SimulationError;
use crate::models::{Priority, DEFAULT_ALPHA};
use crate::policy::Policy;
use crate::scenarios::ScenarioInfo;
use crate::simulation::{simulate_with, SimulationConfig};

/// The standard comparison set: SPT, EDF, PRIORITY_FIRST and DPE at
/// alpha 0.5, 0.7 and 0.9.
pub fn default_policies() -> Vec<Policy> {
    vec![
        Policy::Spt,
        Policy::Edf,
        Policy::PriorityFirst,
        Policy::Dpe { alpha: 0.5 },
        Policy::dpe_default(),
        Policy::Dpe { alpha: 0.9 },
    ]
}

/// Summary of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    /// Scenario id.
    pub scenario: String,
    /// Policy label, e.g. `DPE (alpha=0.7)`.
    pub algorithm: String,
    /// Number of tasks.
    pub total_tasks: usize,
    /// HIGH tasks meeting their deadline.
    pub high_met: usize,
    /// LOW tasks meeting their deadline.
    pub low_met: usize,
    /// All tasks meeting their deadline.
    pub total_met: usize,
    /// HIGH success rate (%).
    pub high_success_rate: f64,
    /// LOW success rate (%).
    pub low_success_rate: f64,
    /// Overall success rate (%).
    pub success_rate: f64,
    /// Latest completion time.
    pub makespan: f64,
    /// Mean completion - arrival.
    pub avg_response_time: f64,
    /// Mean start - arrival.
    pub avg_waiting_time: f64,
}

fn run_one(
    scenario: &ScenarioInfo,
    policy: Policy,
    config: &SimulationConfig,
) -> Result<ComparisonRow, SimulationError> {
    let request = scenario.request(policy.id(), policy.alpha().unwrap_or(DEFAULT_ALPHA));
    let result = simulate_with(&request, config)?;
    Ok(ComparisonRow {
        scenario: scenario.id.clone(),
        algorithm: policy.to_string(),
        total_tasks: result.total_tasks,
        high_met: result.stats_for(Priority::High).met_deadline,
        low_met: result.stats_for(Priority::Low).met_deadline,
        total_met: result.kpi.total_met_deadline,
        high_success_rate: result.kpi.high_success_rate,
        low_success_rate: result.kpi.low_success_rate,
        success_rate: result.kpi.success_rate,
        makespan: result.makespan,
        avg_response_time: result.kpi.avg_response_time,
        avg_waiting_time: result.kpi.avg_waiting_time,
    })
}

/// Runs every scenario under every policy.
///
/// # Errors
/// The first failing run's error (e.g. an invalid scenario).
pub fn run_matrix(
    scenarios: &[ScenarioInfo],
    policies: &[Policy],
    config: &SimulationConfig,
) -> Result<Vec<ComparisonRow>, SimulationError> {
    let pairs: Vec<(&ScenarioInfo, Policy)> = scenarios
        .iter()
        .flat_map(|s| policies.iter().map(move |&p| (s, p)))
        .collect();

    pairs
        .par_iter()
        .map(|&(scenario, policy)| run_one(scenario, policy, config))
        .collect()
}

/// Renders rows as a plain-text table grouped by scenario.
pub fn format_table(rows: &[ComparisonRow]) -> String {
    let mut out = String::new();
    let mut current: Option<&str> = None;
    for row in rows {
        if current != Some(row.scenario.as_str()) {
            current = Some(row.scenario.as_str());
            let _ = writeln!(out, "\n{}:", row.scenario);
            let _ = writeln!(
                out,
                "{:<20} | {:>8} | {:>8} | {:>8} | {:>8}",
                "Algorithm", "Success%", "High%", "Low%", "Makespan"
            );
            let _ = writeln!(out, "{}", "-".repeat(64));
        }
        let _ = writeln!(
            out,
            "{:<20} | {:>8.1} | {:>8.1} | {:>8.1} | {:>8.1}",
            row.algorithm,
            row.success_rate,
            row.high_success_rate,
            row.low_success_rate,
            row.makespan
        );
    }
    out
}

/// Writes rows as CSV, one header line then one line per row.
///
/// # Errors
/// [`SimulationError::Csv`] or [`SimulationError::Io`] if writing fails.
pub fn write_csv<W: io::Write>(rows: &[ComparisonRow], writer: W) -> Result<(), SimulationError> {
    let mut out = csv::Writer::from_writer(writer);
    for row in rows {
        out.serialize(row)?;
    }
    out.flush()?;
    Ok(())
}
