//! Built-in dispatching rules.
//!
//! # Categories
//!
//! - **Time-based**: SPT, LPT, HRRN
//! - **Due-date**: EDF, MLF, URGENCY
//! - **Arrival**: FIFO
//! - **Priority**: PRIORITY, PRIORITY_WEIGHT
//!
//! # Score Convention
//! All rules return lower scores for higher priority tasks.
//!
//! # References
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Brinch Hansen (1971), "Short-term scheduling in multiprogramming systems" (HRRN)

use super::{DispatchingRule, RuleScore, SchedulingContext};
use crate::models::Task;

// ======================== Time-based rules ========================

/// Shortest Processing Time.
///
/// Minimizes mean flow time on a single machine but ignores deadlines and
/// priorities entirely.
///
/// # Reference
/// Smith (1956), optimal for minimizing mean flow time on single machine.
#[derive(Debug, Clone, Copy)]
pub struct Spt;

impl DispatchingRule for Spt {
    fn name(&self) -> &'static str {
        "SPT"
    }

    fn evaluate(&self, task: &Task, _context: &SchedulingContext) -> RuleScore {
        task.processing_time
    }

    fn description(&self) -> &'static str {
        "Shortest Processing Time"
    }
}

/// Longest Processing Time.
///
/// Clears large jobs while capacity is available.
#[derive(Debug, Clone, Copy)]
pub struct Lpt;

impl DispatchingRule for Lpt {
    fn name(&self) -> &'static str {
        "LPT"
    }

    fn evaluate(&self, task: &Task, _context: &SchedulingContext) -> RuleScore {
        -task.processing_time
    }

    fn description(&self) -> &'static str {
        "Longest Processing Time"
    }
}

/// Highest Response Ratio Next.
///
/// Response ratio = (waiting + service) / service. Favours short tasks but
/// ages waiting ones so nothing starves.
#[derive(Debug, Clone, Copy)]
pub struct Hrrn;

impl DispatchingRule for Hrrn {
    fn name(&self) -> &'static str {
        "HRRN"
    }

    fn evaluate(&self, task: &Task, context: &SchedulingContext) -> RuleScore {
        let waiting = (context.current_time - task.arrival_time).max(0.0);
        let service = task.processing_time.max(1e-4);
        -((waiting + service) / service)
    }

    fn description(&self) -> &'static str {
        "Highest Response Ratio Next"
    }
}

// ======================== Due-date rules ========================

/// Earliest Deadline First.
///
/// # Reference
/// Jackson (1955), optimal for minimizing maximum lateness on single machine.
#[derive(Debug, Clone, Copy)]
pub struct Edf;

impl DispatchingRule for Edf {
    fn name(&self) -> &'static str {
        "EDF"
    }

    fn evaluate(&self, task: &Task, _context: &SchedulingContext) -> RuleScore {
        task.deadline
    }

    fn description(&self) -> &'static str {
        "Earliest Deadline First"
    }
}

/// Minimum Laxity First.
///
/// Laxity = (deadline - now) - processing_time. Tasks are not preempted, so
/// the remaining work of a READY task is its full processing time.
#[derive(Debug, Clone, Copy)]
pub struct Mlf;

impl DispatchingRule for Mlf {
    fn name(&self) -> &'static str {
        "MLF"
    }

    fn evaluate(&self, task: &Task, context: &SchedulingContext) -> RuleScore {
        task.time_to_deadline(context.current_time) - task.processing_time
    }

    fn description(&self) -> &'static str {
        "Minimum Laxity First"
    }
}

/// Deadline urgency normalized across the ready set.
///
/// Score is `-urgency / max_urgency`, so the most urgent task scores -1.
#[derive(Debug, Clone, Copy)]
pub struct Urgency;

impl DispatchingRule for Urgency {
    fn name(&self) -> &'static str {
        "URGENCY"
    }

    fn evaluate(&self, task: &Task, context: &SchedulingContext) -> RuleScore {
        -context.normalized_urgency(task)
    }

    fn description(&self) -> &'static str {
        "Normalized Deadline Urgency"
    }
}

// ======================== Arrival rule ========================

/// First In First Out (by arrival time).
#[derive(Debug, Clone, Copy)]
pub struct Fifo;

impl DispatchingRule for Fifo {
    fn name(&self) -> &'static str {
        "FIFO"
    }

    fn evaluate(&self, task: &Task, _context: &SchedulingContext) -> RuleScore {
        task.arrival_time
    }

    fn description(&self) -> &'static str {
        "First In First Out"
    }
}

// ======================== Priority rules ========================

/// Priority class: HIGH before LOW.
#[derive(Debug, Clone, Copy)]
pub struct Priority;

impl DispatchingRule for Priority {
    fn name(&self) -> &'static str {
        "PRIORITY"
    }

    fn evaluate(&self, task: &Task, _context: &SchedulingContext) -> RuleScore {
        f64::from(task.priority.rank())
    }

    fn description(&self) -> &'static str {
        "Task Priority"
    }
}

/// Priority weight (HIGH = 1.0, LOW = 0.0), negated.
///
/// Meant for weighted combinations; ordering matches [`Priority`].
#[derive(Debug, Clone, Copy)]
pub struct PriorityWeight;

impl DispatchingRule for PriorityWeight {
    fn name(&self) -> &'static str {
        "PRIORITY_WEIGHT"
    }

    fn evaluate(&self, task: &Task, _context: &SchedulingContext) -> RuleScore {
        -task.priority.weight()
    }

    fn description(&self) -> &'static str {
        "Task Priority Weight"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spt_and_lpt() {
        let ctx = SchedulingContext::at_time(0.0);
        let short = Task::low(1, 0.0, 1.0, 10.0);
        let long = Task::low(2, 0.0, 5.0, 10.0);
        assert!(Spt.evaluate(&short, &ctx) < Spt.evaluate(&long, &ctx));
        assert!(Lpt.evaluate(&long, &ctx) < Lpt.evaluate(&short, &ctx));
    }

    #[test]
    fn test_hrrn_ages_waiting_tasks() {
        let ctx = SchedulingContext::at_time(10.0);
        // waited 10, service 5 → ratio 3
        let old = Task::low(1, 0.0, 5.0, 50.0);
        // waited 0, service 1 → ratio 1
        let fresh = Task::low(2, 10.0, 1.0, 50.0);
        assert!(Hrrn.evaluate(&old, &ctx) < Hrrn.evaluate(&fresh, &ctx));
        assert!((Hrrn.evaluate(&old, &ctx) + 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_edf() {
        let ctx = SchedulingContext::at_time(0.0);
        let early = Task::low(1, 0.0, 1.0, 10.0);
        let late = Task::low(2, 0.0, 1.0, 50.0);
        assert!(Edf.evaluate(&early, &ctx) < Edf.evaluate(&late, &ctx));
    }

    #[test]
    fn test_mlf() {
        let ctx = SchedulingContext::at_time(1.0);
        // laxity = (5 - 1) - 3 = 1
        let urgent = Task::low(1, 0.0, 3.0, 5.0);
        // laxity = (6 - 1) - 1 = 4
        let relaxed = Task::low(2, 0.0, 1.0, 6.0);
        assert!((Mlf.evaluate(&urgent, &ctx) - 1.0).abs() < 1e-9);
        assert!(Mlf.evaluate(&urgent, &ctx) < Mlf.evaluate(&relaxed, &ctx));
        // EDF would pick the other way round only if deadlines said so
        assert!(Edf.evaluate(&urgent, &ctx) < Edf.evaluate(&relaxed, &ctx));
    }

    #[test]
    fn test_urgency_orders_like_edf() {
        let near = Task::low(1, 0.0, 1.0, 3.0);
        let mid = Task::low(2, 0.0, 1.0, 7.0);
        let far = Task::low(3, 0.0, 1.0, 30.0);
        let ctx = SchedulingContext::at_time(1.0).with_ready_set([&near, &mid, &far]);
        assert!((Urgency.evaluate(&near, &ctx) + 1.0).abs() < 1e-12);
        assert!(Urgency.evaluate(&near, &ctx) < Urgency.evaluate(&mid, &ctx));
        assert!(Urgency.evaluate(&mid, &ctx) < Urgency.evaluate(&far, &ctx));
    }

    #[test]
    fn test_fifo() {
        let ctx = SchedulingContext::at_time(5.0);
        let first = Task::low(2, 1.0, 2.0, 10.0);
        let second = Task::low(1, 3.0, 2.0, 10.0);
        assert!(Fifo.evaluate(&first, &ctx) < Fifo.evaluate(&second, &ctx));
    }

    #[test]
    fn test_priority_rules_agree() {
        let ctx = SchedulingContext::at_time(0.0);
        let high = Task::high(1, 0.0, 9.0, 10.0);
        let low = Task::low(2, 0.0, 1.0, 10.0);
        assert!(Priority.evaluate(&high, &ctx) < Priority.evaluate(&low, &ctx));
        assert!(PriorityWeight.evaluate(&high, &ctx) < PriorityWeight.evaluate(&low, &ctx));
    }
}
