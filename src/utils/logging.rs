use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Maximum characters of an upstream response body copied into logs and errors.
pub const UPSTREAM_BODY_PREVIEW_CHARS: usize = 300;

/// Lossy UTF-8 prefix of `body`, capped at [`UPSTREAM_BODY_PREVIEW_CHARS`].
pub(crate) fn body_preview(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    format!("{:.len$}", text, len = UPSTREAM_BODY_PREVIEW_CHARS)
}

/// Installs a compact fmt subscriber for embedders that have none.
///
/// `RUST_LOG` wins over `loglevel`. A subscriber that is already installed is left
/// in place.
pub fn init_tracing(loglevel: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(loglevel));
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .try_init();
}
