use jitsu_console_schema::{Document, ListEnvelope, ObjectRef, ResourceType};
use reqwest::Method;
use serde_json::Value;

use super::{is_unique_conflict, live_document};
use crate::client::ConsoleClient;
use crate::error::ConsoleError;

impl ConsoleClient {
    /// `POST /api/{ws}/config/{type}`.
    ///
    /// A 500 caused by a soft-deleted row with the same id is healed once: the stale
    /// row is hard-deleted and the POST repeated. The payload must then carry a string
    /// `id`. Any other non-2xx status is returned as [`ConsoleError::Api`].
    pub async fn create_object(
        &self,
        workspace_id: &str,
        resource_type: &ResourceType,
        payload: &Value,
    ) -> Result<Document, ConsoleError> {
        let url = self
            .endpoints
            .config_collection(workspace_id, resource_type.as_str());
        let mut resp = self.executor.execute(Method::POST, &url, Some(payload)).await?;

        if is_unique_conflict(&resp) {
            let id = payload
                .get("id")
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty())
                .ok_or_else(|| {
                    ConsoleError::Protocol(format!(
                        "POST {url} returned soft-delete conflict but payload has no 'id' field"
                    ))
                })?;

            self.reconciler
                .purge_soft_deleted(id, resource_type.storage_table())
                .await
                .map_err(|e| ConsoleError::Conflict {
                    method: Method::POST,
                    url: url.clone(),
                    status: resp.status,
                    body: resp.text().into_owned(),
                    id: id.to_string(),
                    source: Box::new(e),
                })?;

            resp = self.executor.execute(Method::POST, &url, Some(payload)).await?;
        }

        resp.error_for_status()?.json()
    }

    /// `GET /api/{ws}/config/{type}/{id}`; `None` when absent or soft-deleted.
    pub async fn read_object(&self, object: &ObjectRef) -> Result<Option<Document>, ConsoleError> {
        let url = self.endpoints.config_item(
            &object.workspace_id,
            object.resource_type.as_str(),
            &object.id,
        );
        let resp = self.executor.execute::<()>(Method::GET, &url, None).await?;
        live_document(resp)
    }

    pub async fn update_object(
        &self,
        object: &ObjectRef,
        payload: &Value,
    ) -> Result<Document, ConsoleError> {
        let url = self.endpoints.config_item(
            &object.workspace_id,
            object.resource_type.as_str(),
            &object.id,
        );
        self.executor
            .execute(Method::PUT, &url, Some(payload))
            .await?
            .error_for_status()?
            .json()
    }

    /// Soft-deletes the object on the console side.
    pub async fn delete_object(&self, object: &ObjectRef) -> Result<(), ConsoleError> {
        let url = self.endpoints.config_item(
            &object.workspace_id,
            object.resource_type.as_str(),
            &object.id,
        );
        self.executor
            .execute::<()>(Method::DELETE, &url, None)
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Every record of `resource_type`, soft-deleted ones included.
    pub async fn list_objects(
        &self,
        workspace_id: &str,
        resource_type: &ResourceType,
    ) -> Result<Vec<Document>, ConsoleError> {
        let url = self
            .endpoints
            .config_collection(workspace_id, resource_type.as_str());
        let envelope: ListEnvelope = self
            .executor
            .execute::<()>(Method::GET, &url, None)
            .await?
            .error_for_status()?
            .json()?;

        envelope.into_items().ok_or_else(|| {
            ConsoleError::Protocol(format!(
                "unexpected response format from GET {url}: no 'objects' or 'links' key"
            ))
        })
    }
}
