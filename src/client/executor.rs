use reqwest::{Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::borrow::Cow;
use tracing::{debug, warn};
use url::Url;

use super::session::SessionManager;
use crate::error::ConsoleError;

/// Fully-read console response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub method: Method,
    pub url: Url,
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Decodes the body, reporting shape mismatches as protocol errors.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ConsoleError> {
        serde_json::from_slice(&self.body).map_err(|e| {
            ConsoleError::Protocol(format!(
                "unmarshaling response of {} {}: {e}",
                self.method, self.url
            ))
        })
    }

    pub fn into_api_error(self) -> ConsoleError {
        let body = self.text().into_owned();
        ConsoleError::Api {
            method: self.method,
            url: self.url,
            status: self.status,
            body,
        }
    }

    /// Passes 2xx responses through and turns everything else into [`ConsoleError::Api`].
    pub fn error_for_status(self) -> Result<Self, ConsoleError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(self.into_api_error())
        }
    }
}

fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Sends console requests on top of the session, with one re-login on 401/403.
pub(crate) struct RequestExecutor {
    http: reqwest::Client,
    session: SessionManager,
}

impl RequestExecutor {
    pub(crate) fn new(http: reqwest::Client, session: SessionManager) -> Self {
        Self { http, session }
    }

    pub(crate) fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Authenticates if needed, sends the request, and on a 401/403 re-authenticates and
    /// sends it exactly once more. Other statuses, 5xx included, are returned untouched.
    pub(crate) async fn execute<B>(
        &self,
        method: Method,
        url: &Url,
        body: Option<&B>,
    ) -> Result<ApiResponse, ConsoleError>
    where
        B: Serialize + ?Sized,
    {
        self.session.ensure_authenticated().await?;

        let mut retried = false;
        loop {
            let response = self.send(&method, url, body).await?;
            if !is_auth_failure(response.status) {
                return Ok(response);
            }

            if retried {
                let body = response.text().into_owned();
                return Err(ConsoleError::SessionRejected {
                    method: response.method,
                    url: response.url,
                    status: response.status,
                    body,
                });
            }

            warn!(
                method = %method,
                url = %url,
                status = %response.status,
                "API request returned auth failure; re-authenticating and retrying once"
            );
            retried = true;
            self.session.invalidate().await;
            self.session
                .ensure_authenticated()
                .await
                .map_err(|e| ConsoleError::Reauthentication {
                    status: response.status,
                    source: Box::new(e),
                })?;
        }
    }

    async fn send<B>(
        &self,
        method: &Method,
        url: &Url,
        body: Option<&B>,
    ) -> Result<ApiResponse, ConsoleError>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(method = %method, url = %url, "API request");

        let resp = request.send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        debug!(
            method = %method,
            url = %url,
            status = status.as_u16(),
            "API response"
        );

        Ok(ApiResponse {
            method: method.clone(),
            url: url.clone(),
            status,
            body: bytes.to_vec(),
        })
    }
}
