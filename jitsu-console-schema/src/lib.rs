pub mod auth;
pub mod config_object;
pub mod envelope;
pub mod stream;
pub mod workspace;

pub use auth::{CredentialsForm, CsrfTokenResponse};
pub use config_object::{LinkRef, ObjectRef, ResourceType, StorageTable};
pub use envelope::{Document, ListEnvelope, is_soft_deleted};
pub use stream::{StreamKey, StreamSpec};
pub use workspace::{WorkspaceDeleteBody, WorkspacePayload};
