mod console;
mod rollback;

pub use console::ConsoleError;
pub use rollback::RollbackOutcome;

/// Marker in a 500 response body that means "a (soft-deleted) row already owns this key".
pub const UNIQUE_CONSTRAINT_SIGNATURE: &str = "Unique constraint failed";

/// Marker in a workspace-creation 500 that means the session has no usable user behind it.
pub const MISSING_USER_CONTEXT_SIGNATURE: &str = "WorkspaceAccess_userId_fkey";
