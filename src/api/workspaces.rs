use jitsu_console_schema::{Document, WorkspaceDeleteBody, WorkspacePayload};
use reqwest::{Method, StatusCode};
use serde_json::Value;

use super::{live_document, roll_back};
use crate::client::ConsoleClient;
use crate::error::{ConsoleError, MISSING_USER_CONTEXT_SIGNATURE};
use crate::utils::logging::body_preview;

impl ConsoleClient {
    /// Creates a workspace and returns its id.
    ///
    /// The console may drop `slug` on creation, so the same name/slug is written again
    /// with a PUT. When that PUT fails the new workspace is deleted and the error comes
    /// back as [`ConsoleError::RolledBack`].
    pub async fn create_workspace(
        &self,
        workspace: &WorkspacePayload,
    ) -> Result<String, ConsoleError> {
        let url = self.endpoints.workspaces();
        let resp = self
            .executor
            .execute(Method::POST, &url, Some(workspace))
            .await?;

        if resp.status == StatusCode::INTERNAL_SERVER_ERROR
            && resp.text().contains(MISSING_USER_CONTEXT_SIGNATURE)
        {
            return Err(ConsoleError::authentication(format!(
                "workspace creation failed: the session has no valid user context: {}",
                body_preview(&resp.body)
            )));
        }

        let created: Document = resp.error_for_status()?.json()?;
        let id = created
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ConsoleError::Protocol(format!("POST {url} did not return workspace id")))?
            .to_string();

        if let Err(err) = self.update_workspace(&id, workspace).await {
            return Err(roll_back("workspace", &id, err, self.delete_workspace(&id)).await);
        }
        Ok(id)
    }

    /// `None` when the workspace is absent or soft-deleted.
    pub async fn read_workspace(
        &self,
        id_or_slug: &str,
    ) -> Result<Option<Document>, ConsoleError> {
        let url = self.endpoints.workspace_item(id_or_slug);
        let resp = self.executor.execute::<()>(Method::GET, &url, None).await?;
        live_document(resp)
    }

    pub async fn update_workspace(
        &self,
        id_or_slug: &str,
        workspace: &WorkspacePayload,
    ) -> Result<Document, ConsoleError> {
        let url = self.endpoints.workspace_item(id_or_slug);
        self.executor
            .execute(Method::PUT, &url, Some(workspace))
            .await?
            .error_for_status()?
            .json()
    }

    /// `DELETE /api/workspace` with `{workspaceId}`; an already-missing workspace is fine.
    pub async fn delete_workspace(&self, workspace_id: &str) -> Result<(), ConsoleError> {
        let url = self.endpoints.workspaces();
        let body = WorkspaceDeleteBody { workspace_id };
        let resp = self
            .executor
            .execute(Method::DELETE, &url, Some(&body))
            .await?;
        if resp.status == StatusCode::NOT_FOUND {
            return Ok(());
        }
        resp.error_for_status()?;
        Ok(())
    }

    /// Workspaces visible to the session user, as a bare JSON array.
    pub async fn list_workspaces(&self) -> Result<Vec<Document>, ConsoleError> {
        let url = self.endpoints.workspaces();
        self.executor
            .execute::<()>(Method::GET, &url, None)
            .await?
            .error_for_status()?
            .json()
    }
}
