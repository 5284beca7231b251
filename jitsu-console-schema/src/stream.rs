use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;

/// Write key of an event stream. `plaintext` is only ever sent, never read back.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct StreamKey {
    pub id: String,
    pub plaintext: String,
}

impl StreamKey {
    pub fn new(id: impl Into<String>, plaintext: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            plaintext: plaintext.into(),
        }
    }
}

impl fmt::Debug for StreamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamKey")
            .field("id", &self.id)
            .field("plaintext", &"<redacted>")
            .finish()
    }
}

/// Desired state of an event stream (source).
#[derive(Debug, Clone, Default)]
pub struct StreamSpec {
    pub id: String,
    pub name: String,
    pub public_keys: Vec<StreamKey>,
    pub private_keys: Vec<StreamKey>,
}

impl StreamSpec {
    pub fn has_keys(&self) -> bool {
        !self.public_keys.is_empty() || !self.private_keys.is_empty()
    }

    /// Creation payload without key material; the console only
    /// hashes keys supplied through an update.
    pub fn create_payload(&self, workspace_id: &str) -> Value {
        json!({
            "id": self.id,
            "workspaceId": workspace_id,
            "type": "stream",
            "name": self.name,
        })
    }

    /// Update payload carrying plaintext keys for whichever key lists are non-empty.
    pub fn keys_payload(&self, workspace_id: &str) -> Value {
        let mut payload = self.create_payload(workspace_id);
        if let Some(map) = payload.as_object_mut() {
            if !self.public_keys.is_empty() {
                map.insert("publicKeys".to_string(), json!(self.public_keys));
            }
            if !self.private_keys.is_empty() {
                map.insert("privateKeys".to_string(), json!(self.private_keys));
            }
        }
        payload
    }
}
