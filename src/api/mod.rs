//! Object access facade: CRUD and list over the console REST API.
//!
//! Every call goes through the request executor, so each one authenticates lazily
//! and survives one expired session. Absent and soft-deleted records both come back
//! as `Ok(None)`.
//!
//! Layout:
//! - `objects.rs`: configuration objects (streams, destinations, functions, ...)
//! - `links.rs`: edges between objects
//! - `workspaces.rs`: the separate workspace sub-API
//! - `streams.rs`: two-phase stream creation with key material

mod links;
mod objects;
mod streams;
mod workspaces;

use jitsu_console_schema::{Document, is_soft_deleted};
use reqwest::StatusCode;
use tracing::{info, warn};

use crate::client::ApiResponse;
use crate::error::{ConsoleError, RollbackOutcome, UNIQUE_CONSTRAINT_SIGNATURE};

/// 500 whose body names the unique-constraint failure a soft-deleted row causes.
fn is_unique_conflict(resp: &ApiResponse) -> bool {
    resp.status == StatusCode::INTERNAL_SERVER_ERROR
        && resp.text().contains(UNIQUE_CONSTRAINT_SIGNATURE)
}

/// GET result as a live record: 404 and `"deleted": true` both map to `None`.
fn live_document(resp: ApiResponse) -> Result<Option<Document>, ConsoleError> {
    if resp.status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    let doc: Document = resp.error_for_status()?.json()?;
    if is_soft_deleted(&doc) {
        return Ok(None);
    }
    Ok(Some(doc))
}

/// Runs the compensating delete for a half-finished create and folds its result into
/// the error returned to the caller.
async fn roll_back<F>(resource: &str, id: &str, source: ConsoleError, delete: F) -> ConsoleError
where
    F: Future<Output = Result<(), ConsoleError>>,
{
    let outcome = RollbackOutcome::from_result(resource, id, delete.await);
    match &outcome {
        RollbackOutcome::RolledBack { .. } => {
            info!(resource, id, error = %source, "follow-up step failed; creation rolled back");
        }
        RollbackOutcome::Failed { error, .. } => {
            warn!(
                resource,
                id,
                error = %source,
                rollback_error = %error,
                "follow-up step failed and rollback failed; remote object left behind"
            );
        }
    }
    ConsoleError::RolledBack {
        source: Box::new(source),
        outcome,
    }
}
