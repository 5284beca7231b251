use std::fmt;

use super::console::ConsoleError;

/// Result of the best-effort delete issued after a failed follow-up step.
#[derive(Debug)]
pub enum RollbackOutcome {
    RolledBack {
        resource: String,
        id: String,
    },
    Failed {
        resource: String,
        id: String,
        error: Box<ConsoleError>,
    },
}

impl RollbackOutcome {
    pub(crate) fn from_result(
        resource: &str,
        id: &str,
        result: Result<(), ConsoleError>,
    ) -> Self {
        match result {
            Ok(()) => RollbackOutcome::RolledBack {
                resource: resource.to_string(),
                id: id.to_string(),
            },
            Err(error) => RollbackOutcome::Failed {
                resource: resource.to_string(),
                id: id.to_string(),
                error: Box::new(error),
            },
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, RollbackOutcome::RolledBack { .. })
    }
}

impl fmt::Display for RollbackOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollbackOutcome::RolledBack { resource, id } => {
                write!(f, "Rolled back newly-created {resource} {id:?}.")
            }
            RollbackOutcome::Failed {
                resource,
                id,
                error,
            } => write!(f, "Rollback failed for {resource} {id:?}: {error}"),
        }
    }
}
