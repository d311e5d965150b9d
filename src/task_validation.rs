use crate::calendar::end_date_for;
use crate::task::Task;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TaskValidationError {
    message: String,
}

impl TaskValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn validate_task(task: &Task) -> Result<(), TaskValidationError> {
    if task.task_id.trim().is_empty() {
        return Err(TaskValidationError::new(format!(
            "task '{}' has an empty task_id",
            task.description
        )));
    }

    if task.duration_days < 1 {
        return Err(TaskValidationError::new(format!(
            "task {} has non-positive duration {}",
            task.task_id, task.duration_days
        )));
    }

    let expected_end = end_date_for(task.start_date, task.duration_days).map_err(|err| {
        TaskValidationError::new(format!(
            "task {} has an unreachable end date: {err}",
            task.task_id
        ))
    })?;
    if task.end_date != expected_end {
        return Err(TaskValidationError::new(format!(
            "task {} ends {} but start {} plus {} days ends {}",
            task.task_id, task.end_date, task.start_date, task.duration_days, expected_end
        )));
    }

    if let Some(info) = &task.additional_info {
        if !info.volume.is_finite() || !info.effective_rate.is_finite() {
            return Err(TaskValidationError::new(format!(
                "task {} carries non-finite excavation figures",
                task.task_id
            )));
        }
    }

    Ok(())
}

/// Validate every task and reject duplicate ids within the same phase.
pub fn validate_task_collection(tasks: &[Task]) -> Result<(), TaskValidationError> {
    let mut seen_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen_ids.insert((task.phase, task.task_id.as_str())) {
            return Err(TaskValidationError::new(format!(
                "duplicate task id {} in phase {}",
                task.task_id, task.phase
            )));
        }
        validate_task(task)?;
    }
    Ok(())
}

/// Check the ordering a finalized builder guarantees: sequences strictly increasing.
pub fn validate_sequence_order(tasks: &[Task]) -> Result<(), TaskValidationError> {
    for pair in tasks.windows(2) {
        if pair[1].sequence <= pair[0].sequence {
            return Err(TaskValidationError::new(format!(
                "task {} (sequence {}) does not follow task {} (sequence {})",
                pair[1].task_id, pair[1].sequence, pair[0].task_id, pair[0].sequence
            )));
        }
    }
    Ok(())
}
