use std::fmt;

use jitsu_console_schema::{CredentialsForm, CsrfTokenResponse};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::endpoints::Endpoints;
use crate::error::ConsoleError;
use crate::utils::logging::body_preview;

/// Console login. The password never shows up in `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Default)]
struct SessionState {
    authenticated: bool,
    exchanges: u64,
}

/// Owns the cookie-backed console session.
///
/// `authenticated` is advisory: the console may still reject the cookie, in which case
/// the executor calls [`SessionManager::invalidate`] and authenticates again.
pub(crate) struct SessionManager {
    /// Shares its cookie jar with `login_http`.
    http: reqwest::Client,
    /// Same jar, redirects disabled: the credentials callback answers with a redirect
    /// whose `Set-Cookie` must be kept without following it.
    login_http: reqwest::Client,
    endpoints: Endpoints,
    credentials: Option<Credentials>,
    state: Mutex<SessionState>,
}

impl SessionManager {
    pub(crate) fn new(
        http: reqwest::Client,
        login_http: reqwest::Client,
        endpoints: Endpoints,
        credentials: Option<Credentials>,
    ) -> Self {
        Self {
            http,
            login_http,
            endpoints,
            credentials,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Performs the CSRF + credential exchange unless the session is already marked valid.
    ///
    /// The lock is held across the exchange, so concurrent callers wait for one login
    /// instead of racing their own.
    pub(crate) async fn ensure_authenticated(&self) -> Result<(), ConsoleError> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            ConsoleError::Configuration(
                "no authentication configured: set username/password".to_string(),
            )
        })?;

        let mut state = self.state.lock().await;
        if state.authenticated {
            return Ok(());
        }

        self.exchange(credentials).await?;
        state.authenticated = true;
        state.exchanges += 1;
        info!(
            username = %credentials.username,
            exchanges = state.exchanges,
            "console session established"
        );
        Ok(())
    }

    /// Forces the next [`SessionManager::ensure_authenticated`] to log in again.
    pub(crate) async fn invalidate(&self) {
        self.state.lock().await.authenticated = false;
    }

    pub(crate) async fn is_authenticated(&self) -> bool {
        self.state.lock().await.authenticated
    }

    async fn exchange(&self, credentials: &Credentials) -> Result<(), ConsoleError> {
        let csrf_token = self.fetch_csrf_token().await?;

        let login_url = self.endpoints.credentials_callback();
        let form = CredentialsForm {
            username: &credentials.username,
            password: &credentials.password,
            csrf_token: &csrf_token,
        };
        let resp = self
            .login_http
            .post(login_url.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| ConsoleError::authentication(format!("executing login request: {e}")))?;

        let status = resp.status();
        // Success is a redirect most of the time; only 4xx/5xx count as a rejection.
        if !(status.is_success() || status.is_redirection()) {
            let body = resp.bytes().await.unwrap_or_default();
            return Err(ConsoleError::authentication(format!(
                "POST {login_url} returned {status}: {}",
                body_preview(&body)
            )));
        }

        debug!(%status, url = %login_url, "credential exchange accepted");
        Ok(())
    }

    async fn fetch_csrf_token(&self) -> Result<String, ConsoleError> {
        let csrf_url = self.endpoints.csrf();
        let resp = self
            .http
            .get(csrf_url.clone())
            .send()
            .await
            .map_err(|e| ConsoleError::authentication(format!("requesting CSRF token: {e}")))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| ConsoleError::authentication(format!("reading CSRF response: {e}")))?;
        if !status.is_success() {
            return Err(ConsoleError::authentication(format!(
                "GET {csrf_url} returned {status}: {}",
                body_preview(&body)
            )));
        }

        let csrf: CsrfTokenResponse = serde_json::from_slice(&body)
            .map_err(|e| ConsoleError::authentication(format!("parsing CSRF response: {e}")))?;
        if csrf.csrf_token.is_empty() {
            return Err(ConsoleError::authentication("empty CSRF token in response"));
        }
        Ok(csrf.csrf_token)
    }
}
