use reqwest::{Method, StatusCode};
use thiserror::Error as ThisError;
use url::Url;

use super::rollback::RollbackOutcome;

#[derive(Debug, ThisError)]
pub enum ConsoleError {
    /// Required input is absent (credentials, console url, database url for recovery).
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Re-authenticating after {status} response failed: {source}")]
    Reauthentication {
        status: StatusCode,
        #[source]
        source: Box<ConsoleError>,
    },

    /// The session was refused twice in a row for the same request.
    #[error("{method} {url} returned {status} after re-authenticating: {body:.300}")]
    SessionRejected {
        method: Method,
        url: Url,
        status: StatusCode,
        body: String,
    },

    /// Soft-delete collision whose recovery failed. `status`/`body` are the original response.
    #[error(
        "{method} {url} returned {status} (soft-delete conflict on {id:?}): {body:.300}; \
         cleanup failed: {source}"
    )]
    Conflict {
        method: Method,
        url: Url,
        status: StatusCode,
        body: String,
        id: String,
        #[source]
        source: Box<ConsoleError>,
    },

    /// Unexpected response shape.
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("{method} {url} returned {status}: {body}")]
    Api {
        method: Method,
        url: Url,
        status: StatusCode,
        body: String,
    },

    /// Transport-level failure (DNS, connect, timeouts, etc).
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A multi-step create failed after its first step and was compensated.
    #[error("{source}. {outcome}")]
    RolledBack {
        #[source]
        source: Box<ConsoleError>,
        outcome: RollbackOutcome,
    },
}

impl ConsoleError {
    pub(crate) fn authentication(message: impl Into<String>) -> Self {
        ConsoleError::Authentication {
            message: message.into(),
        }
    }

    /// Status code of the failed console call, when the error came from one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ConsoleError::Api { status, .. }
            | ConsoleError::SessionRejected { status, .. }
            | ConsoleError::Reauthentication { status, .. }
            | ConsoleError::Conflict { status, .. } => Some(*status),
            ConsoleError::Http(err) => err.status(),
            ConsoleError::RolledBack { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Rollback result attached to the error, if a compensating delete was attempted.
    pub fn rollback_outcome(&self) -> Option<&RollbackOutcome> {
        match self {
            ConsoleError::RolledBack { outcome, .. } => Some(outcome),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: StatusCode) -> ConsoleError {
        ConsoleError::Api {
            method: Method::PUT,
            url: Url::parse("https://console.test/api/workspace/ws").expect("valid url"),
            status,
            body: "boom".to_string(),
        }
    }

    #[test]
    fn api_error_message_names_method_url_and_status() {
        let rendered = api_error(StatusCode::BAD_REQUEST).to_string();
        assert_eq!(
            rendered,
            "PUT https://console.test/api/workspace/ws returned 400 Bad Request: boom"
        );
    }

    #[test]
    fn rolled_back_error_keeps_original_status() {
        let err = ConsoleError::RolledBack {
            source: Box::new(api_error(StatusCode::UNPROCESSABLE_ENTITY)),
            outcome: RollbackOutcome::RolledBack {
                resource: "workspace".to_string(),
                id: "ws".to_string(),
            },
        };
        assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert!(err.rollback_outcome().is_some_and(RollbackOutcome::succeeded));
        assert!(
            err.to_string()
                .ends_with(r#"Rolled back newly-created workspace "ws"."#),
            "{err}"
        );
    }
}
