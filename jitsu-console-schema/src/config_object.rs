use serde::{Deserialize, Serialize};
use std::fmt;

/// Subtype of a configuration object, as it appears in `/api/{ws}/config/{type}`.
///
/// All subtypes except [`ResourceType::Link`] live in the same storage table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceType {
    Stream,
    Destination,
    Function,
    Link,
    Other(String),
}

impl ResourceType {
    pub fn as_str(&self) -> &str {
        match self {
            ResourceType::Stream => "stream",
            ResourceType::Destination => "destination",
            ResourceType::Function => "function",
            ResourceType::Link => "link",
            ResourceType::Other(name) => name.as_str(),
        }
    }

    /// Table holding rows of this type in the control plane's database.
    pub fn storage_table(&self) -> StorageTable {
        match self {
            ResourceType::Link => StorageTable::Link,
            _ => StorageTable::Object,
        }
    }
}

impl From<&str> for ResourceType {
    fn from(value: &str) -> Self {
        match value {
            "stream" => ResourceType::Stream,
            "destination" => ResourceType::Destination,
            "function" => ResourceType::Function,
            "link" => ResourceType::Link,
            other => ResourceType::Other(other.to_string()),
        }
    }
}

impl From<String> for ResourceType {
    fn from(value: String) -> Self {
        ResourceType::from(value.as_str())
    }
}

impl From<ResourceType> for String {
    fn from(value: ResourceType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two tables soft-deleted rows can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageTable {
    /// `ConfigurationObject`
    Object,
    /// `ConfigurationObjectLink`
    Link,
}

impl StorageTable {
    pub fn table_name(self) -> &'static str {
        match self {
            StorageTable::Object => "ConfigurationObject",
            StorageTable::Link => "ConfigurationObjectLink",
        }
    }
}

impl fmt::Display for StorageTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// `(workspaceId, type, id)` key of a configuration object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub workspace_id: String,
    pub resource_type: ResourceType,
    pub id: String,
}

impl ObjectRef {
    pub fn new(
        workspace_id: impl Into<String>,
        resource_type: impl Into<ResourceType>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.workspace_id, self.resource_type, self.id)
    }
}

/// Directed edge between two configuration objects.
///
/// `link_id` is optional: links are usually located by their endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkRef {
    pub workspace_id: String,
    pub from_id: String,
    pub to_id: String,
    pub link_id: Option<String>,
}

impl LinkRef {
    pub fn new(
        workspace_id: impl Into<String>,
        from_id: impl Into<String>,
        to_id: impl Into<String>,
    ) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            from_id: from_id.into(),
            to_id: to_id.into(),
            link_id: None,
        }
    }

    pub fn with_link_id(mut self, link_id: impl Into<String>) -> Self {
        self.link_id = Some(link_id.into());
        self
    }
}
