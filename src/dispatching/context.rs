//! Scheduling context for dispatching rule evaluation.

use crate::models::{SimTime, Task};

/// Default floor on time-to-deadline used by urgency-based rules.
pub const DEFAULT_URGENCY_EPSILON: f64 = 1e-3;

/// Runtime scheduling state passed to dispatching rules.
///
/// Holds the simulation clock and ready-set aggregates needed by rules that
/// normalize across the candidates (DPE urgency).
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulingContext {
    /// Current simulation time.
    pub current_time: SimTime,
    /// Largest raw urgency among the ready tasks (1.0 when unknown).
    pub max_urgency: f64,
    /// Floor on time-to-deadline; overdue tasks get `1 / urgency_epsilon`.
    pub urgency_epsilon: f64,
}

impl Default for SchedulingContext {
    fn default() -> Self {
        Self::at_time(0.0)
    }
}

impl SchedulingContext {
    /// Creates a context at the given time.
    pub fn at_time(current_time: SimTime) -> Self {
        Self {
            current_time,
            max_urgency: 1.0,
            urgency_epsilon: DEFAULT_URGENCY_EPSILON,
        }
    }

    /// Sets the urgency floor.
    pub fn with_urgency_epsilon(mut self, epsilon: f64) -> Self {
        self.urgency_epsilon = epsilon;
        self
    }

    /// Records ready-set aggregates.
    pub fn with_ready_set<'a>(mut self, ready: impl IntoIterator<Item = &'a Task>) -> Self {
        let max = ready
            .into_iter()
            .map(|t| self.urgency(t))
            .fold(0.0_f64, f64::max);
        self.max_urgency = if max > 0.0 { max } else { 1.0 };
        self
    }

    /// Raw urgency: `1 / max(deadline - now, epsilon)`.
    ///
    /// Capped at `1 / epsilon` for tasks at or past their deadline.
    pub fn urgency(&self, task: &Task) -> f64 {
        1.0 / task
            .time_to_deadline(self.current_time)
            .max(self.urgency_epsilon)
    }

    /// Urgency normalized by the ready-set maximum, in (0, 1].
    pub fn normalized_urgency(&self, task: &Task) -> f64 {
        self.urgency(task) / self.max_urgency
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_capped_when_overdue() {
        let ctx = SchedulingContext::at_time(10.0);
        let overdue = Task::low(1, 0.0, 1.0, 8.0);
        let at_deadline = Task::low(2, 0.0, 1.0, 10.0);
        assert!((ctx.urgency(&overdue) - 1000.0).abs() < 1e-6);
        assert!((ctx.urgency(&at_deadline) - 1000.0).abs() < 1e-6);
        assert!(ctx.urgency(&overdue).is_finite());
    }

    #[test]
    fn test_normalization_over_ready_set() {
        let near = Task::high(1, 0.0, 1.0, 2.0);
        let far = Task::high(2, 0.0, 1.0, 8.0);
        let ctx = SchedulingContext::at_time(0.0).with_ready_set([&near, &far]);

        assert!((ctx.max_urgency - 0.5).abs() < 1e-12);
        assert!((ctx.normalized_urgency(&near) - 1.0).abs() < 1e-12);
        assert!((ctx.normalized_urgency(&far) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_empty_ready_set_keeps_unit_max() {
        let ctx = SchedulingContext::at_time(3.0).with_ready_set(std::iter::empty());
        assert!((ctx.max_urgency - 1.0).abs() < 1e-12);
    }
}
