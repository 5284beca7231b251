use jitsu_console_schema::{Document, LinkRef, ResourceType, is_soft_deleted};
use reqwest::Method;
use serde_json::Value;

use crate::client::ConsoleClient;
use crate::error::ConsoleError;

fn field<'a>(doc: &'a Document, key: &str) -> Option<&'a str> {
    doc.get(key).and_then(Value::as_str)
}

fn matches_link(doc: &Document, link: &LinkRef) -> bool {
    field(doc, "fromId") == Some(link.from_id.as_str())
        && field(doc, "toId") == Some(link.to_id.as_str())
        && link
            .link_id
            .as_deref()
            .is_none_or(|id| field(doc, "id") == Some(id))
}

impl ConsoleClient {
    /// Creates (or, on the console side, upserts) a link. Soft-delete conflicts on the
    /// link id are healed against the link table.
    pub async fn create_link(
        &self,
        workspace_id: &str,
        payload: &Value,
    ) -> Result<Document, ConsoleError> {
        self.create_object(workspace_id, &ResourceType::Link, payload)
            .await
    }

    /// `DELETE /api/{ws}/config/link?id={id}`.
    pub async fn delete_link(&self, workspace_id: &str, link_id: &str) -> Result<(), ConsoleError> {
        let url = self.endpoints.link_by_query(workspace_id, link_id);
        self.executor
            .execute::<()>(Method::DELETE, &url, None)
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub async fn list_links(&self, workspace_id: &str) -> Result<Vec<Document>, ConsoleError> {
        self.list_objects(workspace_id, &ResourceType::Link).await
    }

    /// First live link between `from_id` and `to_id` (and with `link_id`, when set).
    pub async fn find_link(&self, link: &LinkRef) -> Result<Option<Document>, ConsoleError> {
        let links = self.list_links(&link.workspace_id).await?;
        Ok(links
            .into_iter()
            .find(|doc| !is_soft_deleted(doc) && matches_link(doc, link)))
    }
}
