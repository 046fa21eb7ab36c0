//! Input validation for simulation requests.
//!
//! Checks structural integrity of a request before any event is processed.
//! Detects:
//! - Zero machines and empty task sets
//! - Duplicate or zero task IDs
//! - Negative, non-finite or zero-length times
//! - Deadlines before arrival
//! - Zero resource demands
//! - Out-of-range DPE alpha
//!
//! All problems are reported at once.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::models::{SimulationRequest, Task};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// `num_machines` is zero.
    NoMachines,
    /// No tasks were supplied.
    EmptyTaskSet,
    /// Two tasks share the same ID.
    DuplicateId,
    /// Task ID is not positive.
    InvalidId,
    /// A time value is negative, zero where it must be positive, or not finite.
    InvalidTime,
    /// Deadline precedes arrival.
    InvalidDeadline,
    /// CPU or RAM demand is zero.
    InvalidResourceDemand,
    /// Alpha is outside [0, 1].
    InvalidAlpha,
}

impl ValidationError {
    /// Creates an error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validates a simulation request.
///
/// Checks:
/// 1. At least one machine
/// 2. At least one task
/// 3. Task IDs positive and unique
/// 4. Per-task times and demands (see [`validate_task`])
/// 5. `alpha` finite and within [0, 1]
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_request(request: &SimulationRequest) -> ValidationResult {
    let mut errors = Vec::new();

    if request.num_machines == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoMachines,
            "num_machines must be at least 1",
        ));
    }

    if request.tasks.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyTaskSet,
            "task set is empty",
        ));
    }

    let mut ids = HashSet::new();
    for task in &request.tasks {
        if !ids.insert(task.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id),
            ));
        }
        errors.extend(validate_task(task));
    }

    if !request.alpha.is_finite() || !(0.0..=1.0).contains(&request.alpha) {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidAlpha,
            format!("alpha must be within [0, 1], got {}", request.alpha),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks a single task in isolation.
pub fn validate_task(task: &Task) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let id = task.id;

    if id == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidId,
            "Task ID must be a positive integer, got 0",
        ));
    }

    if !task.arrival_time.is_finite() || task.arrival_time < 0.0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidTime,
            format!("Task {id}: arrival_time must be finite and >= 0, got {}", task.arrival_time),
        ));
    }

    if !task.processing_time.is_finite() || task.processing_time <= 0.0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidTime,
            format!(
                "Task {id}: processing_time must be finite and > 0, got {}",
                task.processing_time
            ),
        ));
    }

    if !task.deadline.is_finite() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidTime,
            format!("Task {id}: deadline must be finite, got {}", task.deadline),
        ));
    } else if task.arrival_time.is_finite() && task.deadline < task.arrival_time {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidDeadline,
            format!(
                "Task {id}: deadline {} precedes arrival_time {}",
                task.deadline, task.arrival_time
            ),
        ));
    }

    if task.cpu_required == 0 || task.ram_required == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidResourceDemand,
            format!(
                "Task {id}: cpu_required and ram_required must be >= 1, got {}/{}",
                task.cpu_required, task.ram_required
            ),
        ));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> SimulationRequest {
        SimulationRequest::new("EDF", 2)
            .with_task(Task::high(1, 0.0, 3.0, 10.0))
            .with_task(Task::low(2, 1.0, 2.0, 12.0))
    }

    fn kinds(request: &SimulationRequest) -> Vec<ValidationErrorKind> {
        validate_request(request)
            .unwrap_err()
            .into_iter()
            .map(|e| e.kind)
            .collect()
    }

    #[test]
    fn test_valid_request() {
        assert!(validate_request(&sample_request()).is_ok());
    }

    #[test]
    fn test_zero_machines() {
        let mut req = sample_request();
        req.num_machines = 0;
        assert_eq!(kinds(&req), vec![ValidationErrorKind::NoMachines]);
    }

    #[test]
    fn test_empty_task_set() {
        let req = SimulationRequest::new("SPT", 1);
        assert_eq!(kinds(&req), vec![ValidationErrorKind::EmptyTaskSet]);
    }

    #[test]
    fn test_duplicate_task_id() {
        let req = sample_request().with_task(Task::low(1, 0.0, 1.0, 5.0));
        let errors = validate_request(&req).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains('1')));
    }

    #[test]
    fn test_negative_and_zero_times() {
        let req = SimulationRequest::new("SPT", 1)
            .with_task(Task::low(1, -1.0, 1.0, 5.0))
            .with_task(Task::low(2, 0.0, 0.0, 5.0));
        let found = kinds(&req);
        assert_eq!(
            found.iter().filter(|k| **k == ValidationErrorKind::InvalidTime).count(),
            2
        );
    }

    #[test]
    fn test_non_finite_time() {
        let req = SimulationRequest::new("SPT", 1).with_task(Task::low(1, 0.0, f64::NAN, 5.0));
        assert_eq!(kinds(&req), vec![ValidationErrorKind::InvalidTime]);
    }

    #[test]
    fn test_deadline_before_arrival() {
        let req = SimulationRequest::new("EDF", 1).with_task(Task::low(1, 5.0, 1.0, 4.0));
        assert_eq!(kinds(&req), vec![ValidationErrorKind::InvalidDeadline]);
    }

    #[test]
    fn test_zero_id_and_demand() {
        let req = SimulationRequest::new("EDF", 1)
            .with_task(Task::low(0, 0.0, 1.0, 4.0).with_resources(0, 1));
        let found = kinds(&req);
        assert!(found.contains(&ValidationErrorKind::InvalidId));
        assert!(found.contains(&ValidationErrorKind::InvalidResourceDemand));
    }

    #[test]
    fn test_alpha_range() {
        let req = sample_request().with_alpha(1.5);
        assert_eq!(kinds(&req), vec![ValidationErrorKind::InvalidAlpha]);
        let req = sample_request().with_alpha(f64::INFINITY);
        assert_eq!(kinds(&req), vec![ValidationErrorKind::InvalidAlpha]);
        assert!(validate_request(&sample_request().with_alpha(0.0)).is_ok());
        assert!(validate_request(&sample_request().with_alpha(1.0)).is_ok());
    }

    #[test]
    fn test_multiple_errors() {
        let mut req = SimulationRequest::new("SPT", 0)
            .with_task(Task::low(1, 0.0, 1.0, 5.0))
            .with_task(Task::low(1, 0.0, -2.0, 5.0));
        req.alpha = -0.1;
        let errors = validate_request(&req).unwrap_err();
        assert!(errors.len() >= 4);
    }
}
