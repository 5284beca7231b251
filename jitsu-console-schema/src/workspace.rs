use serde::Serialize;

/// Body of workspace create and update calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspacePayload {
    pub name: String,
    pub slug: String,
}

impl WorkspacePayload {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
        }
    }
}

/// Body of `DELETE /api/workspace`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceDeleteBody<'a> {
    pub workspace_id: &'a str,
}
