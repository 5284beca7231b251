//! Direct database side-channel into the console's backing store.
//!
//! Layout:
//! - `schema.rs`: table naming and the purge statements
//! - `reconciler.rs`: lazily-opened pool and the soft-delete purge
//!
//! Nothing here runs on the normal path; it only unblocks re-creating an id whose
//! previous incarnation was soft-deleted.

mod reconciler;
mod schema;

pub use reconciler::{PurgeReport, SoftDeleteReconciler};
