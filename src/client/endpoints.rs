use url::Url;

use crate::error::ConsoleError;

/// URL builder for the console's REST surface.
///
/// Path parameters are appended as individual segments, so ids containing `/`, `?` or `%`
/// are percent-encoded instead of changing the route.
#[derive(Debug, Clone)]
pub(crate) struct Endpoints {
    base: Url,
}

impl Endpoints {
    pub(crate) fn new(console_url: &Url) -> Result<Self, ConsoleError> {
        if console_url.cannot_be_a_base() {
            return Err(ConsoleError::Configuration(format!(
                "console url {console_url} cannot carry API paths"
            )));
        }
        let mut base = console_url.clone();
        base.set_query(None);
        base.set_fragment(None);
        Ok(Self { base })
    }

    pub(crate) fn base(&self) -> &Url {
        &self.base
    }

    fn join(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(crate) fn csrf(&self) -> Url {
        self.join(&["api", "auth", "csrf"])
    }

    pub(crate) fn credentials_callback(&self) -> Url {
        self.join(&["api", "auth", "callback", "credentials"])
    }

    pub(crate) fn config_collection(&self, workspace_id: &str, resource_type: &str) -> Url {
        self.join(&["api", workspace_id, "config", resource_type])
    }

    pub(crate) fn config_item(&self, workspace_id: &str, resource_type: &str, id: &str) -> Url {
        self.join(&["api", workspace_id, "config", resource_type, id])
    }

    pub(crate) fn link_by_query(&self, workspace_id: &str, link_id: &str) -> Url {
        let mut url = self.config_collection(workspace_id, "link");
        url.query_pairs_mut().append_pair("id", link_id);
        url
    }

    pub(crate) fn workspaces(&self) -> Url {
        self.join(&["api", "workspace"])
    }

    pub(crate) fn workspace_item(&self, id_or_slug: &str) -> Url {
        self.join(&["api", "workspace", id_or_slug])
    }
}
