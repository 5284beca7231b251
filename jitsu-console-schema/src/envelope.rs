use serde::Deserialize;
use serde_json::{Map, Value};

/// Schema-agnostic item record as returned by the console.
pub type Document = Map<String, Value>;

/// Wrapper returned by `GET /api/{ws}/config/{type}`.
///
/// Links come back under `links`, every other type under `objects`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListEnvelope {
    #[serde(default)]
    pub objects: Option<Vec<Document>>,

    #[serde(default)]
    pub links: Option<Vec<Document>>,
}

impl ListEnvelope {
    /// Items under whichever wrapper key is present, `None` when neither is.
    pub fn into_items(self) -> Option<Vec<Document>> {
        self.links.or(self.objects)
    }
}

/// `true` when the record carries `"deleted": true`.
pub fn is_soft_deleted(doc: &Document) -> bool {
    doc.get("deleted").and_then(Value::as_bool).unwrap_or(false)
}
