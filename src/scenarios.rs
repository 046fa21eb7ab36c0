//! Built-in workload scenarios.
//!
//! A read-only catalog of hand-crafted task sets that separate the
//! policies (deadline blindness, starvation, priority inversion, alpha
//! sensitivity) and mimic multi-machine workloads (bursts, saturation,
//! mixed short/long jobs), plus a seeded generator for larger random
//! workloads.
//!
//! The catalog is built once and shared by every caller.

use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::models::{Priority, SimulationRequest, Task};

/// A named task set with its machine count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInfo {
    /// Catalog identifier (kebab-case).
    pub id: String,
    /// Display name.
    pub name: String,
    /// What the scenario exercises.
    pub description: String,
    /// Number of machines.
    pub num_machines: usize,
    /// Input tasks.
    pub tasks: Vec<Task>,
}

impl ScenarioInfo {
    /// Builds a request for this scenario under the given policy.
    pub fn request(&self, algorithm: &str, alpha: f64) -> SimulationRequest {
        SimulationRequest::new(algorithm, self.num_machines)
            .with_tasks(self.tasks.clone())
            .with_alpha(alpha)
    }
}

/// Shorthand: `(id, arrival, processing, priority, deadline)`.
type Row = (u32, f64, f64, Priority, f64);

const H: Priority = Priority::High;
const L: Priority = Priority::Low;

fn scenario(
    id: &str,
    name: &str,
    description: &str,
    num_machines: usize,
    rows: &[Row],
) -> ScenarioInfo {
    ScenarioInfo {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        num_machines,
        tasks: rows
            .iter()
            .map(|&(id, arrival, processing, priority, deadline)| {
                Task::new(id, arrival, processing, priority, deadline)
            })
            .collect(),
    }
}

fn build_catalog() -> Vec<ScenarioInfo> {
    vec![
        scenario(
            "light-load",
            "Light Load",
            "Few tasks, should all meet deadlines",
            2,
            &[
                (1, 0.0, 3.0, H, 10.0),
                (2, 0.0, 2.0, H, 12.0),
                (3, 1.0, 4.0, H, 15.0),
                (4, 0.0, 5.0, L, 25.0),
                (5, 2.0, 6.0, L, 30.0),
            ],
        ),
        scenario(
            "heavy-load",
            "Heavy Load",
            "Many tasks, tight deadlines",
            3,
            &[
                (1, 0.0, 4.0, H, 9.0),
                (2, 1.0, 3.0, H, 10.0),
                (3, 2.0, 3.0, H, 12.0),
                (4, 0.0, 5.0, H, 14.0),
                (5, 0.0, 7.0, L, 20.0),
                (6, 1.0, 6.0, L, 22.0),
                (7, 2.0, 5.0, L, 25.0),
            ],
        ),
        scenario(
            "starvation",
            "Starvation Test",
            "Continuous high priority, will low priority starve?",
            2,
            &[
                (1, 0.0, 2.0, H, 8.0),
                (2, 1.0, 2.0, H, 10.0),
                (3, 2.0, 2.0, H, 12.0),
                (4, 3.0, 2.0, H, 14.0),
                (5, 4.0, 2.0, H, 16.0),
                (6, 0.0, 4.0, L, 15.0),
                (7, 1.0, 4.0, L, 18.0),
            ],
        ),
        scenario(
            "batch-arrival",
            "Batch Arrival",
            "All tasks arrive at once",
            2,
            &[
                (1, 0.0, 3.0, H, 8.0),
                (2, 0.0, 4.0, H, 10.0),
                (3, 0.0, 2.0, H, 12.0),
                (4, 0.0, 5.0, L, 20.0),
                (5, 0.0, 6.0, L, 25.0),
                (6, 0.0, 3.0, L, 22.0),
            ],
        ),
        scenario(
            "spt-vs-edf",
            "Challenge 1: SPT vs EDF",
            "SPT schedules short tasks, missing tight deadlines",
            2,
            &[
                (1, 0.0, 2.0, H, 30.0),
                (2, 0.0, 5.0, H, 6.0),
                (3, 0.0, 1.0, H, 25.0),
                (4, 0.0, 4.0, H, 5.0),
            ],
        ),
        scenario(
            "continuous-high",
            "Challenge 2: Starvation",
            "Continuous high-priority tasks starve low-priority",
            2,
            &[
                (1, 0.0, 3.0, L, 8.0),
                (2, 0.0, 2.0, H, 15.0),
                (3, 1.0, 2.0, H, 16.0),
                (4, 2.0, 2.0, H, 17.0),
                (5, 3.0, 2.0, H, 18.0),
                (6, 1.0, 3.0, L, 10.0),
            ],
        ),
        scenario(
            "impossible",
            "Challenge 3: Impossible",
            "Mathematically impossible deadlines",
            2,
            &[
                (1, 0.0, 5.0, H, 5.0),
                (2, 0.0, 5.0, H, 5.0),
                (3, 0.0, 5.0, H, 5.0),
                (4, 0.0, 5.0, H, 5.0),
            ],
        ),
        scenario(
            "alpha-matters",
            "Challenge 4: Alpha Matters",
            "Different alpha values produce different results",
            2,
            &[
                (1, 0.0, 4.0, L, 12.0),
                (2, 0.0, 2.0, H, 20.0),
                (3, 1.0, 2.0, H, 22.0),
                (4, 2.0, 2.0, H, 24.0),
                (5, 1.0, 3.0, L, 15.0),
            ],
        ),
        scenario(
            "priority-inversion",
            "Challenge 5: Priority Inversion",
            "Low-priority blocks high-priority on single machine",
            1,
            &[
                (1, 0.0, 8.0, L, 30.0),
                (2, 2.0, 3.0, H, 6.0),
                (3, 3.0, 2.0, H, 8.0),
            ],
        ),
        scenario(
            "starvation-guaranteed",
            "Extreme 1: Starvation Guaranteed",
            "Priority-First will starve low-priority",
            1,
            &[
                (1, 0.0, 5.0, L, 16.0),
                (2, 0.0, 2.0, H, 20.0),
                (3, 2.0, 2.0, H, 22.0),
                (4, 4.0, 2.0, H, 24.0),
                (5, 6.0, 2.0, H, 26.0),
                (6, 8.0, 2.0, H, 28.0),
                (7, 10.0, 2.0, H, 30.0),
            ],
        ),
        scenario(
            "alpha-critical",
            "Extreme 2: Alpha Critical",
            "Moderate alpha succeeds where high alpha fails",
            1,
            &[
                (1, 0.0, 6.0, L, 25.0),
                (2, 0.0, 3.0, H, 30.0),
                (3, 3.0, 3.0, H, 33.0),
                (4, 6.0, 3.0, H, 36.0),
                (5, 9.0, 3.0, H, 39.0),
                (6, 12.0, 3.0, H, 42.0),
                (7, 15.0, 3.0, H, 45.0),
                (8, 18.0, 3.0, H, 48.0),
            ],
        ),
        scenario(
            "spt-fails",
            "Extreme 3: SPT Fails",
            "SPT ignores deadlines entirely",
            2,
            &[
                (1, 0.0, 1.0, H, 50.0),
                (2, 0.0, 10.0, H, 11.0),
                (3, 0.0, 2.0, H, 45.0),
                (4, 0.0, 5.0, H, 7.0),
            ],
        ),
        scenario(
            "multiple-starvation",
            "Extreme 4: Multiple Starvation",
            "Multiple low-priority tasks at risk",
            2,
            &[
                (1, 0.0, 4.0, L, 14.0),
                (2, 1.0, 4.0, L, 16.0),
                (3, 2.0, 4.0, L, 18.0),
                (4, 0.0, 2.0, H, 25.0),
                (5, 2.0, 2.0, H, 27.0),
                (6, 4.0, 2.0, H, 29.0),
                (7, 6.0, 2.0, H, 31.0),
                (8, 8.0, 2.0, H, 33.0),
                (9, 10.0, 2.0, H, 35.0),
            ],
        ),
        scenario(
            "priority-first-impossible",
            "Extreme 5: Priority-First Impossible",
            "Feasible, but not for Priority-First",
            1,
            &[
                (1, 0.0, 5.0, L, 6.0),
                (2, 0.0, 3.0, H, 15.0),
                (3, 0.0, 2.0, H, 20.0),
            ],
        ),
        scenario(
            "multi-machine-balance",
            "Advanced 1: Multi-Machine Balance",
            "4 machines with balanced workload: tests parallel efficiency",
            4,
            &[
                (1, 0.0, 3.0, H, 15.0),
                (2, 0.0, 4.0, H, 18.0),
                (3, 0.0, 3.0, L, 20.0),
                (4, 0.0, 4.0, L, 22.0),
                (5, 5.0, 3.0, H, 25.0),
                (6, 5.0, 2.0, H, 20.0),
                (7, 5.0, 5.0, L, 30.0),
                (8, 5.0, 3.0, L, 28.0),
                (9, 10.0, 2.0, H, 30.0),
                (10, 10.0, 3.0, H, 32.0),
                (11, 10.0, 4.0, L, 35.0),
                (12, 10.0, 2.0, L, 33.0),
                (13, 12.0, 3.0, H, 35.0),
                (14, 12.0, 2.0, H, 33.0),
                (15, 12.0, 3.0, L, 40.0),
                (16, 12.0, 4.0, L, 42.0),
            ],
        ),
        scenario(
            "machine-saturation",
            "Advanced 2: Machine Saturation",
            "Heavy overload: 20 tasks on 3 machines",
            3,
            &[
                (1, 0.0, 2.0, H, 15.0),
                (2, 0.0, 3.0, H, 18.0),
                (3, 1.0, 2.0, H, 16.0),
                (4, 1.0, 3.0, H, 19.0),
                (5, 2.0, 2.0, H, 17.0),
                (6, 2.0, 3.0, H, 20.0),
                (7, 3.0, 2.0, H, 18.0),
                (8, 3.0, 3.0, H, 21.0),
                (9, 4.0, 2.0, H, 19.0),
                (10, 4.0, 3.0, H, 22.0),
                (11, 5.0, 2.0, H, 20.0),
                (12, 5.0, 3.0, H, 23.0),
                (13, 6.0, 2.0, H, 21.0),
                (14, 6.0, 3.0, H, 24.0),
                (15, 7.0, 2.0, H, 22.0),
                (16, 0.0, 4.0, L, 25.0),
                (17, 2.0, 5.0, L, 30.0),
                (18, 4.0, 4.0, L, 28.0),
                (19, 6.0, 5.0, L, 35.0),
                (20, 8.0, 4.0, L, 32.0),
            ],
        ),
        scenario(
            "burst-arrival",
            "Advanced 3: Burst Arrival",
            "Quiet-burst-quiet pattern tests dynamic adaptation",
            2,
            &[
                (1, 0.0, 3.0, H, 12.0),
                (2, 0.0, 4.0, L, 18.0),
                (3, 5.0, 2.0, H, 15.0),
                (4, 5.0, 3.0, H, 18.0),
                (5, 5.0, 2.0, H, 16.0),
                (6, 5.0, 4.0, L, 22.0),
                (7, 5.0, 3.0, L, 20.0),
                (8, 5.0, 2.0, L, 19.0),
                (9, 15.0, 3.0, H, 30.0),
                (10, 15.0, 2.0, H, 28.0),
                (11, 15.0, 4.0, L, 35.0),
                (12, 15.0, 3.0, L, 32.0),
            ],
        ),
        scenario(
            "web-server",
            "Advanced 4: Web Server Workload",
            "Realistic: Quick API calls + batch reports",
            2,
            &[
                (1, 0.0, 1.0, H, 5.0),
                (2, 1.0, 1.0, H, 6.0),
                (3, 2.0, 2.0, H, 9.0),
                (4, 3.0, 1.0, H, 8.0),
                (5, 4.0, 2.0, H, 11.0),
                (6, 5.0, 1.0, H, 10.0),
                (7, 6.0, 2.0, H, 13.0),
                (8, 7.0, 1.0, H, 12.0),
                (9, 8.0, 1.0, H, 13.0),
                (10, 9.0, 2.0, H, 16.0),
                (11, 0.0, 6.0, L, 25.0),
                (12, 3.0, 7.0, L, 30.0),
                (13, 6.0, 8.0, L, 35.0),
            ],
        ),
        scenario(
            "database-mix",
            "Advanced 5: Database Workload",
            "OLTP transactions vs OLAP analytical queries",
            2,
            &[
                (1, 0.0, 1.0, H, 8.0),
                (2, 1.0, 2.0, H, 10.0),
                (3, 2.0, 1.0, H, 9.0),
                (4, 3.0, 3.0, H, 13.0),
                (5, 4.0, 2.0, H, 12.0),
                (6, 5.0, 1.0, H, 11.0),
                (7, 6.0, 2.0, H, 14.0),
                (8, 7.0, 1.0, H, 13.0),
                (9, 8.0, 3.0, H, 17.0),
                (10, 9.0, 2.0, H, 16.0),
                (11, 10.0, 1.0, H, 15.0),
                (12, 11.0, 2.0, H, 18.0),
                (13, 0.0, 10.0, L, 40.0),
                (14, 5.0, 12.0, L, 45.0),
            ],
        ),
        scenario(
            "deadline-gradient",
            "New 1: Deadline Gradient",
            "Progressive deadline tightening: tests DPE elevation timing",
            2,
            &[
                (1, 0.0, 3.0, L, 15.0),
                (2, 0.0, 3.0, L, 15.0),
                (3, 2.0, 3.0, L, 14.0),
                (4, 2.0, 3.0, L, 14.0),
                (5, 4.0, 3.0, L, 13.0),
                (6, 4.0, 3.0, L, 13.0),
                (7, 6.0, 3.0, L, 12.0),
                (8, 6.0, 3.0, L, 12.0),
                (9, 8.0, 3.0, L, 12.0),
                (10, 8.0, 3.0, L, 12.0),
            ],
        ),
        scenario(
            "equal-priority",
            "New 2: Equal Priority Mix",
            "All HIGH priority: tests tie-breaking by deadline/processing time",
            2,
            &[
                (1, 0.0, 5.0, H, 20.0),
                (2, 0.0, 2.0, H, 10.0),
                (3, 1.0, 4.0, H, 18.0),
                (4, 1.0, 3.0, H, 15.0),
                (5, 3.0, 6.0, H, 25.0),
                (6, 3.0, 1.0, H, 8.0),
                (7, 5.0, 3.0, H, 20.0),
                (8, 5.0, 2.0, H, 12.0),
            ],
        ),
        scenario(
            "periodic-arrivals",
            "New 3: Periodic Arrivals",
            "Regular arrival pattern every 3 time units: tests predictability",
            2,
            &[
                (1, 0.0, 3.0, H, 12.0),
                (2, 0.0, 2.0, L, 15.0),
                (3, 3.0, 3.0, H, 15.0),
                (4, 3.0, 2.0, L, 18.0),
                (5, 6.0, 3.0, H, 18.0),
                (6, 6.0, 2.0, L, 21.0),
                (7, 9.0, 3.0, H, 21.0),
                (8, 9.0, 2.0, L, 24.0),
                (9, 12.0, 3.0, H, 24.0),
                (10, 12.0, 2.0, L, 27.0),
            ],
        ),
        scenario(
            "bimodal-processing",
            "New 4: Bimodal Processing",
            "Extreme processing time variance: tests SPT bias",
            2,
            &[
                (1, 0.0, 1.0, H, 10.0),
                (2, 0.0, 2.0, H, 12.0),
                (3, 1.0, 1.0, L, 15.0),
                (4, 1.0, 2.0, L, 18.0),
                (5, 2.0, 10.0, H, 30.0),
                (6, 2.0, 12.0, H, 35.0),
                (7, 3.0, 10.0, L, 35.0),
                (8, 3.0, 12.0, L, 40.0),
                (9, 5.0, 1.0, H, 20.0),
                (10, 5.0, 2.0, H, 22.0),
            ],
        ),
        scenario(
            "overload-recovery",
            "New 5: Overload Recovery",
            "Heavy initial load then reduction: tests recovery from saturation",
            3,
            &[
                (1, 0.0, 3.0, H, 15.0),
                (2, 0.0, 3.0, H, 15.0),
                (3, 0.0, 2.0, L, 20.0),
                (4, 0.0, 2.0, L, 20.0),
                (5, 1.0, 3.0, H, 16.0),
                (6, 1.0, 3.0, H, 16.0),
                (7, 1.0, 2.0, L, 21.0),
                (8, 1.0, 2.0, L, 21.0),
                (9, 2.0, 3.0, H, 17.0),
                (10, 2.0, 3.0, H, 17.0),
                (11, 2.0, 2.0, L, 22.0),
                (12, 2.0, 2.0, L, 22.0),
                (13, 2.0, 2.0, L, 22.0),
                (14, 2.0, 2.0, L, 22.0),
                (15, 2.0, 2.0, L, 22.0),
                (16, 10.0, 2.0, H, 25.0),
                (17, 12.0, 2.0, L, 28.0),
                (18, 14.0, 2.0, H, 30.0),
            ],
        ),
    ]
}

/// The built-in scenario catalog.
pub fn builtin() -> &'static [ScenarioInfo] {
    static CATALOG: OnceLock<Vec<ScenarioInfo>> = OnceLock::new();
    CATALOG.get_or_init(build_catalog)
}

/// Looks up a built-in scenario by id.
///
/// # Errors
/// [`SimulationError::UnknownScenario`] if no scenario has that id.
pub fn find(id: &str) -> Result<&'static ScenarioInfo, SimulationError> {
    builtin()
        .iter()
        .find(|s| s.id == id)
        .ok_or_else(|| SimulationError::UnknownScenario(id.to_string()))
}

/// Generates a random workload, deterministic per `seed`.
///
/// Inter-arrival gaps are 0..=3, processing times 1..=6, roughly 40% of
/// tasks are HIGH, and each deadline leaves 1.5x to 4x the processing time
/// after arrival. All times are multiples of 0.5.
pub fn synthetic(seed: u64, num_tasks: usize, num_machines: usize) -> ScenarioInfo {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut arrival = 0.0;
    let mut tasks = Vec::with_capacity(num_tasks);

    for id in 1..=num_tasks as u32 {
        arrival += f64::from(rng.random_range(0..=3u32));
        let processing = f64::from(rng.random_range(1..=6u32));
        let priority = if rng.random_bool(0.4) {
            Priority::High
        } else {
            Priority::Low
        };
        let slack = f64::from(rng.random_range(3..=8u32)) * 0.5;
        let deadline = arrival + (processing * slack * 2.0).round() / 2.0;
        tasks.push(Task::new(id, arrival, processing, priority, deadline));
    }

    ScenarioInfo {
        id: format!("synthetic-{seed}"),
        name: format!("Synthetic ({num_tasks} tasks, seed {seed})"),
        description: "Randomly generated workload".to_string(),
        num_machines: num_machines.max(1),
        tasks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_request;

    #[test]
    fn test_catalog_is_valid() {
        assert_eq!(builtin().len(), 24);
        for scenario in builtin() {
            let request = scenario.request("EDF", 0.7);
            assert!(
                validate_request(&request).is_ok(),
                "scenario {} is invalid",
                scenario.id
            );
        }
    }

    #[test]
    fn test_catalog_ids_unique() {
        let mut ids: Vec<&str> = builtin().iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), builtin().len());
    }

    #[test]
    fn test_multi_machine_sets() {
        let balance = find("multi-machine-balance").unwrap();
        assert_eq!((balance.num_machines, balance.tasks.len()), (4, 16));
        let saturation = find("machine-saturation").unwrap();
        assert_eq!((saturation.num_machines, saturation.tasks.len()), (3, 20));
        let equal = find("equal-priority").unwrap();
        assert!(equal.tasks.iter().all(|t| t.priority == Priority::High));
        assert_eq!(find("overload-recovery").unwrap().tasks.len(), 18);
    }

    #[test]
    fn test_find() {
        assert_eq!(find("light-load").unwrap().num_machines, 2);
        assert!(matches!(
            find("nope"),
            Err(SimulationError::UnknownScenario(id)) if id == "nope"
        ));
    }

    #[test]
    fn test_synthetic_deterministic() {
        let a = synthetic(42, 30, 3);
        let b = synthetic(42, 30, 3);
        assert_eq!(a, b);
        assert_eq!(a.tasks.len(), 30);
        assert!(validate_request(&a.request("SPT", 0.7)).is_ok());
        assert_ne!(a.tasks, synthetic(7, 30, 3).tasks);
    }

    #[test]
    fn test_synthetic_arrivals_non_decreasing() {
        let s = synthetic(1, 50, 2);
        assert!(s
            .tasks
            .windows(2)
            .all(|w| w[0].arrival_time <= w[1].arrival_time));
        assert!(s.tasks.iter().all(|t| t.deadline > t.arrival_time));
    }
}
