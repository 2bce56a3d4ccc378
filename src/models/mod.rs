pub mod login;
pub mod project;
pub mod task;

pub use login::Login;
pub use project::Project;
pub use task::{parse_due_date, Complexity, Status, Task};

use thiserror::Error;

/// Rejection raised by an entity setter when a value breaks a field invariant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("{field} must not be negative (got {value})")]
    NegativeId { field: &'static str, value: i32 },
    #[error("invalid complexity: {0}")]
    InvalidComplexity(String),
    #[error("invalid status: {0}")]
    InvalidStatus(String),
    #[error("invalid due date: {0}")]
    InvalidDueDate(String),
}

pub(crate) fn check_id(field: &'static str, value: i32) -> Result<i32, ModelError> {
    if value < 0 {
        return Err(ModelError::NegativeId { field, value });
    }
    Ok(value)
}
