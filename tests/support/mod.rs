//! In-process mock of the console's auth and REST surface.
#![allow(dead_code)]

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use jitsu_console::{Config, ConsoleClient};
use std::{
    collections::{HashMap, VecDeque},
    path::PathBuf,
    sync::{Arc, Mutex},
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tokio::net::TcpListener;
use url::Url;

pub const USERNAME: &str = "admin@example.com";
pub const PASSWORD: &str = "hunter2";
const CSRF_TOKEN: &str = "csrf-token-1";
const SESSION_COOKIE: &str = "next-auth.session-token";

#[derive(Debug, Clone)]
pub struct Recorded {
    /// `METHOD /path?query`
    pub route: String,
    pub body: String,
}

#[derive(Default)]
struct ConsoleState {
    csrf_fetches: usize,
    exchanges: usize,
    valid_session: Option<String>,
    reject_all_sessions: bool,
    rejection_status: Option<StatusCode>,
    failing_exchange: Option<usize>,
    scripted_csrf: VecDeque<(StatusCode, String)>,
    stalled: HashMap<String, Duration>,
    hits: HashMap<String, usize>,
    scripted: HashMap<String, VecDeque<(StatusCode, String)>>,
    requests: Vec<Recorded>,
}

#[derive(Clone, Default)]
pub struct MockConsole {
    state: Arc<Mutex<ConsoleState>>,
}

impl MockConsole {
    /// Queues a response for `route` (`"POST /api/ws/config/stream"`). Routes without a
    /// queued response answer `200 {"ok":true}`.
    pub fn script(&self, route: &str, status: u16, body: &str) {
        let status = StatusCode::from_u16(status).expect("valid status");
        self.state
            .lock()
            .unwrap()
            .scripted
            .entry(route.to_string())
            .or_default()
            .push_back((status, body.to_string()));
    }

    /// Invalidates the current session cookie server-side.
    pub fn expire_session(&self) {
        self.state.lock().unwrap().valid_session = None;
    }

    /// Delays every answer on `route` by `delay`.
    pub fn stall(&self, route: &str, delay: Duration) {
        self.state
            .lock()
            .unwrap()
            .stalled
            .insert(route.to_string(), delay);
    }

    /// Every API call answers 401, even right after a successful login.
    pub fn reject_all_sessions(&self) {
        self.state.lock().unwrap().reject_all_sessions = true;
    }

    /// Status used for rejected sessions (401 unless set).
    pub fn reject_sessions_with(&self, status: u16) {
        self.state.lock().unwrap().rejection_status =
            Some(StatusCode::from_u16(status).expect("valid status"));
    }

    /// The `n`th credential exchange (1-based) is refused with 401.
    pub fn fail_exchange(&self, n: usize) {
        self.state.lock().unwrap().failing_exchange = Some(n);
    }

    /// Queues a raw answer for the next CSRF fetch.
    pub fn script_csrf(&self, status: u16, body: &str) {
        let status = StatusCode::from_u16(status).expect("valid status");
        self.state
            .lock()
            .unwrap()
            .scripted_csrf
            .push_back((status, body.to_string()));
    }

    pub fn csrf_fetches(&self) -> usize {
        self.state.lock().unwrap().csrf_fetches
    }

    pub fn exchanges(&self) -> usize {
        self.state.lock().unwrap().exchanges
    }

    pub fn hits(&self, route: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .hits
            .get(route)
            .copied()
            .unwrap_or(0)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/auth/csrf", get(csrf_handler))
            .route("/api/auth/callback/credentials", post(credentials_handler))
            .fallback(api_handler)
            .with_state(self.clone())
    }
}

async fn csrf_handler(State(console): State<MockConsole>) -> Response {
    let mut state = console.state.lock().unwrap();
    state.csrf_fetches += 1;
    let (status, body) = state.scripted_csrf.pop_front().unwrap_or_else(|| {
        (
            StatusCode::OK,
            format!(r#"{{"csrfToken":"{CSRF_TOKEN}"}}"#),
        )
    });
    json_response(status, body)
}

async fn credentials_handler(State(console): State<MockConsole>, body: Bytes) -> Response {
    let form: HashMap<String, String> = url::form_urlencoded::parse(&body).into_owned().collect();
    let accepted = form.get("username").map(String::as_str) == Some(USERNAME)
        && form.get("password").map(String::as_str) == Some(PASSWORD)
        && form.get("csrfToken").map(String::as_str) == Some(CSRF_TOKEN);

    let mut state = console.state.lock().unwrap();
    state.exchanges += 1;
    let forced_failure = state.failing_exchange == Some(state.exchanges);
    if !accepted || forced_failure {
        return (
            StatusCode::UNAUTHORIZED,
            "CredentialsSignin: invalid credentials",
        )
            .into_response();
    }

    let token = format!("session-{}", state.exchanges);
    state.valid_session = Some(token.clone());
    (
        StatusCode::FOUND,
        [
            (header::LOCATION, "/".to_string()),
            (
                header::SET_COOKIE,
                format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly"),
            ),
        ],
    )
        .into_response()
}

async fn api_handler(
    State(console): State<MockConsole>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let route = format!(
        "{method} {}",
        uri.path_and_query().map_or(uri.path(), |pq| pq.as_str())
    );

    let (status, body, delay) = {
        let mut state = console.state.lock().unwrap();
        *state.hits.entry(route.clone()).or_default() += 1;
        state.requests.push(Recorded {
            route: route.clone(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });

        let presented = session_cookie(&headers);
        let authorized = !state.reject_all_sessions
            && presented.is_some()
            && presented == state.valid_session;
        let delay = state.stalled.get(&route).copied();

        if authorized {
            let (status, body) = state
                .scripted
                .get_mut(&route)
                .and_then(VecDeque::pop_front)
                .unwrap_or((StatusCode::OK, r#"{"ok":true}"#.to_string()));
            (status, body, delay)
        } else {
            (
                state.rejection_status.unwrap_or(StatusCode::UNAUTHORIZED),
                r#"{"error":"Unauthorized"}"#.to_string(),
                None,
            )
        }
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    json_response(status, body)
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

fn json_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

pub async fn spawn_test_server(app: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let base = Url::parse(&format!("http://{addr}")).expect("valid base url");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });

    base
}

pub fn test_config(base: &Url) -> Config {
    let mut cfg = Config::default();
    cfg.console.url = Some(base.clone());
    cfg.console.username = Some(USERNAME.to_string());
    cfg.console.password = Some(PASSWORD.to_string());
    cfg.console.request_timeout_secs = 5;
    cfg
}

/// Mock console plus a client pointed at it (no database configured).
pub async fn console_and_client() -> (MockConsole, ConsoleClient) {
    let console = MockConsole::default();
    let base = spawn_test_server(console.router()).await;
    let client = ConsoleClient::new(&test_config(&base)).expect("client builds");
    (console, client)
}

pub fn unique_sqlite_path(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "jitsu-console-{prefix}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));
    temp_path
}
