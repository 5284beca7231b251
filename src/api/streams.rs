use jitsu_console_schema::{Document, ObjectRef, ResourceType, StreamSpec};

use super::roll_back;
use crate::client::ConsoleClient;
use crate::error::ConsoleError;

impl ConsoleClient {
    /// Creates a stream, then attaches its plaintext keys with a follow-up update.
    ///
    /// The console hashes keys only on update, so creation never carries them. A failed
    /// update deletes the stream again; the returned [`ConsoleError::RolledBack`] says
    /// whether that delete went through.
    pub async fn create_stream_with_keys(
        &self,
        workspace_id: &str,
        stream: &StreamSpec,
    ) -> Result<Document, ConsoleError> {
        let created = self
            .create_object(
                workspace_id,
                &ResourceType::Stream,
                &stream.create_payload(workspace_id),
            )
            .await?;

        if !stream.has_keys() {
            return Ok(created);
        }

        let object = ObjectRef::new(workspace_id, ResourceType::Stream, stream.id.as_str());
        match self
            .update_object(&object, &stream.keys_payload(workspace_id))
            .await
        {
            Ok(updated) => Ok(updated),
            Err(err) => {
                Err(roll_back("stream", &stream.id, err, self.delete_object(&object)).await)
            }
        }
    }
}
