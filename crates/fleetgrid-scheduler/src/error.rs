//! Dispatcher error types.

use fleetgrid_registry::RegistryError;
use thiserror::Error;

/// Errors reported by the dispatcher. None of them abort a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("no nodes available for task allocation")]
    NoNodesAvailable,

    #[error("task could not be allocated: {0}")]
    UnallocatableTask(String),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;
