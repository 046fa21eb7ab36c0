//! Rule engine for multi-criteria dispatching.
//!
//! Composes dispatching rules with configurable evaluation modes and
//! tie-breaking, and turns a ranking into a resource-aware machine
//! assignment.
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use std::cmp::Ordering;
use std::sync::Arc;

use super::{DispatchingRule, RuleScore, SchedulingContext};
use crate::models::{MachineId, MachinePool, Task, TaskId};

/// How primary rules are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EvaluationMode {
    /// Apply rules in sequence; use next rule only on ties.
    #[default]
    Sequential,
    /// Compare the weighted sum of primary rule scores, then tie-breakers.
    Weighted,
}

/// How ties are broken after all rules are exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TieBreaker {
    /// Keep input order (stable sort).
    #[default]
    NextRule,
    /// Lower task id first.
    ById,
}

#[derive(Clone)]
struct WeightedRule {
    rule: Arc<dyn DispatchingRule>,
    weight: f64,
    tie_break: bool,
}

/// A (task, machine) pairing chosen by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    /// Task to start.
    pub task_id: TaskId,
    /// Machine to start it on.
    pub machine_id: MachineId,
}

/// A composable rule engine for task prioritization.
///
/// In `Sequential` mode every rule (primary and tie-breaking) is consulted
/// in insertion order. In `Weighted` mode the primary rules collapse into one
/// weighted score and the tie-breaking rules follow in order.
#[derive(Clone)]
pub struct RuleEngine {
    rules: Vec<WeightedRule>,
    mode: EvaluationMode,
    tie_breaker: TieBreaker,
}

impl RuleEngine {
    /// Creates an empty rule engine.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            mode: EvaluationMode::Sequential,
            tie_breaker: TieBreaker::NextRule,
        }
    }

    /// Adds a primary rule (weight 1.0).
    pub fn with_rule<R: DispatchingRule + 'static>(self, rule: R) -> Self {
        self.with_weighted_rule(rule, 1.0)
    }

    /// Adds a weighted primary rule.
    pub fn with_weighted_rule<R: DispatchingRule + 'static>(
        mut self,
        rule: R,
        weight: f64,
    ) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight,
            tie_break: false,
        });
        self
    }

    /// Adds a tie-breaking rule, consulted only when earlier keys tie.
    pub fn with_tie_breaker<R: DispatchingRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight: 0.0,
            tie_break: true,
        });
        self
    }

    /// Sets the evaluation mode.
    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the final tie-breaking strategy.
    pub fn with_final_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// Names of the configured rules, in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.rule.name()).collect()
    }

    /// Sorts tasks by priority (highest priority first).
    ///
    /// Returns indices into the input task slice.
    pub fn sort_indices(&self, tasks: &[&Task], context: &SchedulingContext) -> Vec<usize> {
        if tasks.is_empty() {
            return Vec::new();
        }

        let keys: Vec<Vec<RuleScore>> = tasks.iter().map(|t| self.keys(t, context)).collect();
        let mut indices: Vec<usize> = (0..tasks.len()).collect();
        indices.sort_by(|&a, &b| {
            self.compare_keys(&keys[a], &keys[b])
                .then_with(|| match self.tie_breaker {
                    TieBreaker::NextRule => Ordering::Equal,
                    TieBreaker::ById => tasks[a].id.cmp(&tasks[b].id),
                })
        });
        indices
    }

    /// Returns the index of the highest-priority task.
    pub fn select_best(&self, tasks: &[&Task], context: &SchedulingContext) -> Option<usize> {
        self.sort_indices(tasks, context).first().copied()
    }

    /// Picks the best-ranked READY task that fits a machine right now.
    ///
    /// The machine is the lowest-id one with enough free CPU and RAM.
    /// Returns `None` if no ready task fits any machine.
    pub fn select(
        &self,
        ready: &[&Task],
        pool: &MachinePool,
        context: &SchedulingContext,
    ) -> Option<Dispatch> {
        self.sort_indices(ready, context).into_iter().find_map(|i| {
            let task = ready[i];
            pool.first_fit(task).map(|machine_id| Dispatch {
                task_id: task.id,
                machine_id,
            })
        })
    }

    /// Evaluates a single task and returns the weighted score of each rule.
    pub fn evaluate(&self, task: &Task, context: &SchedulingContext) -> Vec<RuleScore> {
        self.rules
            .iter()
            .map(|wr| {
                let score = wr.rule.evaluate(task, context);
                if wr.tie_break {
                    score
                } else {
                    score * wr.weight
                }
            })
            .collect()
    }

    fn keys(&self, task: &Task, context: &SchedulingContext) -> Vec<RuleScore> {
        match self.mode {
            EvaluationMode::Sequential => self
                .rules
                .iter()
                .map(|wr| wr.rule.evaluate(task, context))
                .collect(),
            EvaluationMode::Weighted => {
                let primary: f64 = self
                    .rules
                    .iter()
                    .filter(|wr| !wr.tie_break)
                    .map(|wr| wr.rule.evaluate(task, context) * wr.weight)
                    .sum();
                std::iter::once(primary)
                    .chain(
                        self.rules
                            .iter()
                            .filter(|wr| wr.tie_break)
                            .map(|wr| wr.rule.evaluate(task, context)),
                    )
                    .collect()
            }
        }
    }

    /// Lexicographic over exact scores; only bit-equal keys tie.
    fn compare_keys(&self, a: &[RuleScore], b: &[RuleScore]) -> Ordering {
        a.iter()
            .zip(b)
            .map(|(score_a, score_b)| score_a.total_cmp(score_b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field(
                "rules",
                &self
                    .rules
                    .iter()
                    .map(|r| {
                        if r.tie_break {
                            format!("{}(tie)", r.rule.name())
                        } else {
                            format!("{}(w={})", r.rule.name(), r.weight)
                        }
                    })
                    .collect::<Vec<_>>(),
            )
            .field("mode", &self.mode)
            .field("tie_breaker", &self.tie_breaker)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::rules;
    use crate::models::{Capacity, CapacityModel, Occupancy, Task};

    fn ids(tasks: &[&Task], order: &[usize]) -> Vec<u32> {
        order.iter().map(|&i| tasks[i].id).collect()
    }

    #[test]
    fn test_spt_ordering() {
        let tasks = [
            Task::low(1, 0.0, 5.0, 50.0),
            Task::low(2, 0.0, 1.0, 50.0),
            Task::low(3, 0.0, 3.0, 50.0),
        ];
        let refs: Vec<&Task> = tasks.iter().collect();
        let ctx = SchedulingContext::at_time(0.0);
        let engine = RuleEngine::new().with_rule(rules::Spt);

        let order = engine.sort_indices(&refs, &ctx);
        assert_eq!(ids(&refs, &order), vec![2, 3, 1]);
    }

    #[test]
    fn test_sequential_with_tie_breaker() {
        let tasks = [
            Task::high(1, 2.0, 1.0, 10.0),
            Task::high(2, 0.0, 2.0, 10.0),
        ];
        let refs: Vec<&Task> = tasks.iter().collect();
        let ctx = SchedulingContext::at_time(3.0);
        let engine = RuleEngine::new()
            .with_rule(rules::Edf)
            .with_tie_breaker(rules::Fifo);

        // EDF ties → FIFO breaks it → 2 (arrived first)
        assert_eq!(engine.select_best(&refs, &ctx), Some(1));
    }

    #[test]
    fn test_by_id_tie_breaker() {
        let tasks = [Task::low(9, 0.0, 1.0, 5.0), Task::low(4, 0.0, 1.0, 5.0)];
        let refs: Vec<&Task> = tasks.iter().collect();
        let ctx = SchedulingContext::at_time(0.0);
        let engine = RuleEngine::new()
            .with_rule(rules::Spt)
            .with_final_tie_breaker(TieBreaker::ById);

        assert_eq!(engine.select_best(&refs, &ctx), Some(1));
    }

    #[test]
    fn test_weighted_mode_then_tie_breakers() {
        let tasks = [
            Task::low(1, 0.0, 1.0, 4.0),
            Task::high(2, 0.0, 1.0, 40.0),
            Task::high(3, 0.0, 1.0, 40.0),
        ];
        let refs: Vec<&Task> = tasks.iter().collect();
        let ctx = SchedulingContext::at_time(0.0).with_ready_set(refs.iter().copied());
        let engine = RuleEngine::new()
            .with_mode(EvaluationMode::Weighted)
            .with_weighted_rule(rules::Urgency, 0.5)
            .with_weighted_rule(rules::PriorityWeight, 0.5)
            .with_final_tie_breaker(TieBreaker::ById);

        // 1: 0.5*1.0 + 0 = 0.5; 2,3: 0.5*0.1 + 0.5 = 0.55 → 2 then 3 (by id) then 1
        let order = engine.sort_indices(&refs, &ctx);
        assert_eq!(ids(&refs, &order), vec![2, 3, 1]);
    }

    #[test]
    fn test_close_keys_stay_ordered() {
        // Deadlines 5e-10 apart, listed latest first.
        let tasks: Vec<Task> = (0..200u32)
            .map(|i| Task::low(i + 1, 0.0, 1.0, 1000.0 + f64::from(199 - i) * 5e-10))
            .collect();
        let refs: Vec<&Task> = tasks.iter().collect();
        let ctx = SchedulingContext::at_time(0.0);
        let engine = RuleEngine::new()
            .with_rule(rules::Edf)
            .with_final_tie_breaker(TieBreaker::ById);

        let order = ids(&refs, &engine.sort_indices(&refs, &ctx));
        let expected: Vec<u32> = (1..=200).rev().collect();
        assert_eq!(order, expected);
        assert_eq!(engine.select_best(&refs, &ctx), Some(199));
    }

    #[test]
    fn test_empty_tasks() {
        let ctx = SchedulingContext::at_time(0.0);
        let engine = RuleEngine::new().with_rule(rules::Spt);
        let pool = MachinePool::uniform(1);
        assert!(engine.sort_indices(&[], &ctx).is_empty());
        assert!(engine.select_best(&[], &ctx).is_none());
        assert!(engine.select(&[], &pool, &ctx).is_none());
    }

    #[test]
    fn test_select_skips_tasks_that_do_not_fit() {
        let pool = MachinePool::new(
            2,
            CapacityModel::Alternating {
                even: Capacity::new(2, 2),
                odd: Capacity::new(4, 4),
            },
            Occupancy::Exclusive,
        );
        let tasks = [
            Task::low(1, 0.0, 1.0, 10.0).with_resources(8, 8),
            Task::low(2, 0.0, 2.0, 10.0).with_resources(3, 1),
            Task::low(3, 0.0, 3.0, 10.0),
        ];
        let refs: Vec<&Task> = tasks.iter().collect();
        let ctx = SchedulingContext::at_time(0.0);
        let engine = RuleEngine::new()
            .with_rule(rules::Spt)
            .with_final_tie_breaker(TieBreaker::ById);

        // Task 1 fits nowhere; task 2 only fits machine 1.
        let pick = engine.select(&refs, &pool, &ctx).unwrap();
        assert_eq!(pick, Dispatch { task_id: 2, machine_id: 1 });

        // Once task 2 holds machine 1, task 3 is the best that fits.
        let mut pool = pool;
        assert!(pool.reserve(1, &tasks[1]));
        let pick = engine.select(&refs, &pool, &ctx).unwrap();
        assert_eq!(pick, Dispatch { task_id: 3, machine_id: 0 });
    }

    #[test]
    fn test_evaluate_scores() {
        let task = Task::low(1, 0.0, 3.0, 20.0);
        let ctx = SchedulingContext::at_time(0.0);
        let engine = RuleEngine::new()
            .with_rule(rules::Spt)
            .with_tie_breaker(rules::Edf);

        let scores = engine.evaluate(&task, &ctx);
        assert_eq!(scores.len(), 2);
        assert!((scores[0] - 3.0).abs() < 1e-10);
        assert!((scores[1] - 20.0).abs() < 1e-10);
        assert_eq!(engine.rule_names(), vec!["SPT", "EDF"]);
    }
}
