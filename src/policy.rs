//! Scheduling policy registry.
//!
//! A [`Policy`] is a closed set of dispatching strategies, looked up once per
//! request by identifier. Each policy maps onto a [`RuleEngine`] rule chain;
//! the simulation engine never branches on policy names.
//!
//! # Policies
//!
//! | Id | Ranking key | Tie-break |
//! |----|-------------|-----------|
//! | `SPT` | processing time | id |
//! | `EDF` | deadline | id |
//! | `PRIORITY_FIRST` | HIGH before LOW | arrival time, id |
//! | `DPE` | `α·urgency + (1-α)·priority_weight`, higher first | arrival time, id |
//! | `FCFS` | arrival time | id |
//! | `MLF` | laxity | id |
//! | `HRRN` | response ratio, higher first | id |
//! | `LPT` | processing time, longer first | id |

use serde::Serialize;
use std::fmt;

use crate::dispatching::{rules, EvaluationMode, RuleEngine, TieBreaker};
use crate::error::SimulationError;
use crate::models::DEFAULT_ALPHA;

/// A scheduling policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Policy {
    /// Shortest Processing Time.
    Spt,
    /// Earliest Deadline First.
    Edf,
    /// Static priority, FIFO within a class.
    PriorityFirst,
    /// Dynamic Priority Exponent: blends deadline urgency with priority.
    Dpe {
        /// Weight of urgency versus priority, in [0, 1].
        alpha: f64,
    },
    /// First Come First Served.
    Fcfs,
    /// Minimum Laxity First.
    Mlf,
    /// Highest Response Ratio Next.
    Hrrn,
    /// Longest Processing Time.
    Lpt,
}

/// Catalog entry describing a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlgorithmInfo {
    /// Registry identifier (case-sensitive).
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
}

const CATALOG: &[AlgorithmInfo] = &[
    AlgorithmInfo {
        id: "SPT",
        name: "Shortest Processing Time",
        description: "Always dispatches the shortest ready task; ignores deadlines and priorities.",
    },
    AlgorithmInfo {
        id: "EDF",
        name: "Earliest Deadline First",
        description: "Always dispatches the ready task with the earliest deadline.",
    },
    AlgorithmInfo {
        id: "PRIORITY_FIRST",
        name: "Priority-First",
        description: "HIGH priority tasks before LOW; earlier arrival first within a class.",
    },
    AlgorithmInfo {
        id: "DPE",
        name: "Dynamic Priority Exponent",
        description: "Blends deadline urgency and priority with weight alpha (default 0.7).",
    },
    AlgorithmInfo {
        id: "FCFS",
        name: "First Come First Served",
        description: "Dispatches tasks in arrival order.",
    },
    AlgorithmInfo {
        id: "MLF",
        name: "Minimum Laxity First",
        description: "Dispatches the task with the least slack before its deadline.",
    },
    AlgorithmInfo {
        id: "HRRN",
        name: "Highest Response Ratio Next",
        description: "Favours short tasks while aging waiting ones to prevent starvation.",
    },
    AlgorithmInfo {
        id: "LPT",
        name: "Longest Processing Time",
        description: "Dispatches the longest ready task first.",
    },
];

/// The static algorithm catalog.
pub fn algorithms() -> &'static [AlgorithmInfo] {
    CATALOG
}

impl Policy {
    /// Looks up a policy by registry id. `alpha` is used only by `DPE`.
    ///
    /// # Errors
    /// [`SimulationError::InvalidAlgorithm`] for an unregistered id.
    pub fn from_id(id: &str, alpha: f64) -> Result<Self, SimulationError> {
        let policy = match id {
            "SPT" => Policy::Spt,
            "EDF" => Policy::Edf,
            "PRIORITY_FIRST" => Policy::PriorityFirst,
            "DPE" => Policy::Dpe { alpha },
            "FCFS" => Policy::Fcfs,
            "MLF" => Policy::Mlf,
            "HRRN" => Policy::Hrrn,
            "LPT" => Policy::Lpt,
            other => return Err(SimulationError::InvalidAlgorithm(other.to_string())),
        };
        Ok(policy)
    }

    /// DPE with the default alpha.
    pub fn dpe_default() -> Self {
        Policy::Dpe {
            alpha: DEFAULT_ALPHA,
        }
    }

    /// Registry id.
    pub fn id(&self) -> &'static str {
        match self {
            Policy::Spt => "SPT",
            Policy::Edf => "EDF",
            Policy::PriorityFirst => "PRIORITY_FIRST",
            Policy::Dpe { .. } => "DPE",
            Policy::Fcfs => "FCFS",
            Policy::Mlf => "MLF",
            Policy::Hrrn => "HRRN",
            Policy::Lpt => "LPT",
        }
    }

    /// Mixing weight, for `DPE` only.
    pub fn alpha(&self) -> Option<f64> {
        match *self {
            Policy::Dpe { alpha } => Some(alpha),
            _ => None,
        }
    }

    /// Catalog entry for this policy.
    pub fn info(&self) -> &'static AlgorithmInfo {
        let id = self.id();
        CATALOG
            .iter()
            .find(|info| info.id == id)
            .unwrap_or(&CATALOG[0])
    }

    /// Builds the rule chain that ranks READY tasks for this policy.
    pub fn rule_engine(&self) -> RuleEngine {
        let engine = match *self {
            Policy::Spt => RuleEngine::new().with_rule(rules::Spt),
            Policy::Edf => RuleEngine::new().with_rule(rules::Edf),
            Policy::PriorityFirst => RuleEngine::new()
                .with_rule(rules::Priority)
                .with_tie_breaker(rules::Fifo),
            Policy::Dpe { alpha } => RuleEngine::new()
                .with_mode(EvaluationMode::Weighted)
                .with_weighted_rule(rules::Urgency, alpha)
                .with_weighted_rule(rules::PriorityWeight, 1.0 - alpha)
                .with_tie_breaker(rules::Fifo),
            Policy::Fcfs => RuleEngine::new().with_rule(rules::Fifo),
            Policy::Mlf => RuleEngine::new().with_rule(rules::Mlf),
            Policy::Hrrn => RuleEngine::new().with_rule(rules::Hrrn),
            Policy::Lpt => RuleEngine::new().with_rule(rules::Lpt),
        };
        engine.with_final_tie_breaker(TieBreaker::ById)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Dpe { alpha } => write!(f, "DPE (alpha={alpha})"),
            other => f.write_str(other.id()),
        }
    }
}
