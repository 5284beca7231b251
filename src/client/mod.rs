//! Session-authenticated console client.
//!
//! Layout:
//! - `endpoints.rs`: URL construction for the REST surface
//! - `session.rs`: CSRF + credential exchange, advisory session flag
//! - `executor.rs`: single request with one re-authentication retry
//!
//! The object, link and workspace operations live in [`crate::api`] as further
//! `impl ConsoleClient` blocks.

mod endpoints;
mod executor;
mod session;

pub use executor::ApiResponse;
pub use session::Credentials;

pub(crate) use endpoints::Endpoints;

use jitsu_console_schema::StorageTable;
use reqwest::Method;
use reqwest::cookie::Jar;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use url::Url;

use crate::config::{Config, ConsoleConfig};
use crate::db::{PurgeReport, SoftDeleteReconciler};
use crate::error::ConsoleError;
use executor::RequestExecutor;
use session::SessionManager;

/// Client for one console instance.
///
/// Cheap to share behind an `Arc`; every method takes `&self`. Cancellation is by
/// dropping the returned future (wrap calls in `tokio::time::timeout` for a deadline);
/// every HTTP call is additionally bounded by `console.request_timeout_secs`.
pub struct ConsoleClient {
    pub(crate) endpoints: Endpoints,
    pub(crate) executor: RequestExecutor,
    pub(crate) reconciler: SoftDeleteReconciler,
}

impl ConsoleClient {
    /// Builds the HTTP transport and (lazily) the database side-channel.
    ///
    /// Missing credentials are not rejected here; the first request fails with a
    /// configuration error instead. Use [`Config::validate`] to fail earlier.
    pub fn new(cfg: &Config) -> Result<Self, ConsoleError> {
        let console_url = cfg.console.url.as_ref().ok_or_else(|| {
            ConsoleError::Configuration(
                "missing console url: set console.url or JITSU_CONSOLE_URL".to_string(),
            )
        })?;
        let endpoints = Endpoints::new(console_url)?;

        let jar = Arc::new(Jar::default());
        let http = build_http_client(&cfg.console, jar.clone(), true)?;
        let login_http = build_http_client(&cfg.console, jar, false)?;

        let session = SessionManager::new(
            http.clone(),
            login_http,
            endpoints.clone(),
            cfg.console.credentials(),
        );

        info!(
            console_url = %console_url,
            proxy = %cfg.console.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
            request_timeout_secs = cfg.console.request_timeout_secs,
            database_recovery = cfg.database.connection_url().is_some(),
            "console client configured"
        );

        Ok(Self {
            endpoints,
            executor: RequestExecutor::new(http, session),
            reconciler: SoftDeleteReconciler::new(cfg.database.clone()),
        })
    }

    /// Loads [`Config`] from defaults, `jitsu.toml` and `JITSU_*` env vars, then builds a client.
    pub fn from_env() -> Result<Self, ConsoleError> {
        Self::new(&Config::load()?)
    }

    /// Base URL every endpoint is resolved against.
    pub fn console_url(&self) -> &Url {
        self.endpoints.base()
    }

    /// Logs in unless the session is already marked valid. Idempotent.
    pub async fn ensure_authenticated(&self) -> Result<(), ConsoleError> {
        self.executor.session().ensure_authenticated().await
    }

    /// Drops the session flag so the next call performs a full credential exchange.
    pub async fn invalidate_session(&self) {
        self.executor.session().invalidate().await;
    }

    pub async fn is_authenticated(&self) -> bool {
        self.executor.session().is_authenticated().await
    }

    /// Raw authenticated request against an arbitrary console URL.
    ///
    /// Returns every status as-is except a second consecutive 401/403, which is an error.
    pub async fn execute<B>(
        &self,
        method: Method,
        url: &Url,
        body: Option<&B>,
    ) -> Result<ApiResponse, ConsoleError>
    where
        B: Serialize + ?Sized,
    {
        self.executor.execute(method, url, body).await
    }

    /// Hard-deletes the soft-deleted row `id` (and, for objects, soft-deleted links
    /// pointing at it) so the id can be created again.
    pub async fn purge_soft_deleted(
        &self,
        id: &str,
        table: StorageTable,
    ) -> Result<PurgeReport, ConsoleError> {
        self.reconciler.purge_soft_deleted(id, table).await
    }

    /// Closes the database pool if one was opened. Dropping the client has the same effect.
    pub async fn close(&self) {
        self.reconciler.close().await;
    }
}

fn build_http_client(
    cfg: &ConsoleConfig,
    jar: Arc<Jar>,
    follow_redirects: bool,
) -> Result<reqwest::Client, ConsoleError> {
    let redirect = if follow_redirects {
        reqwest::redirect::Policy::default()
    } else {
        reqwest::redirect::Policy::none()
    };

    let mut builder = reqwest::Client::builder()
        .user_agent(cfg.user_agent.as_str())
        .cookie_provider(jar)
        .redirect(redirect)
        .connect_timeout(cfg.connect_timeout())
        .timeout(cfg.request_timeout());

    if let Some(proxy_url) = cfg.proxy.as_ref() {
        let proxy = reqwest::Proxy::all(proxy_url.as_str()).map_err(|e| {
            ConsoleError::Configuration(format!("invalid proxy url {proxy_url}: {e}"))
        })?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| ConsoleError::Configuration(format!("building HTTP client: {e}")))
}
