//! In-process stand-in for the `sys` endpoints of a Vault server
//!
//! An axum router served from a background thread that owns its own tokio
//! runtime. Tracks whether the server is initialized, the unseal progress,
//! and every request that reached a handler.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

use axum::extract::{Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{Value, json};

pub const ROOT_TOKEN: &str = "s.fake-root-token";

/// A request as received by the fake server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: String,
}

type Shared = Arc<Mutex<VaultState>>;

#[derive(Default)]
struct VaultState {
    initialized: bool,
    sealed: bool,
    shares: u8,
    threshold: u8,
    keys_base64: Vec<String>,
    submitted: Vec<String>,
    requests: Vec<Recorded>,
    unseal_failure: Option<u16>,
    init_body: Option<String>,
    requests_to_stall: usize,
}

pub struct FakeVault {
    url: String,
    state: Shared,
}

impl FakeVault {
    pub fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(VaultState {
            sealed: true,
            ..VaultState::default()
        }));
        let app = router(Arc::clone(&state));

        let (addr_tx, addr_rx) = mpsc::channel::<SocketAddr>();
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
                addr_tx.send(listener.local_addr().unwrap()).unwrap();
                axum::serve(listener, app).await.unwrap();
            });
        });
        let addr = addr_rx.recv().unwrap();

        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    /// Answer every unseal request with `status` until reset with `None`.
    pub fn set_unseal_failure(&self, status: Option<u16>) {
        self.state.lock().unwrap().unseal_failure = status;
    }

    /// Answer the next init requests with a fixed 200 body.
    pub fn respond_to_init_with(&self, body: &str) {
        self.state.lock().unwrap().init_body = Some(body.to_owned());
    }

    /// Never answer the next `count` requests; they are not recorded.
    /// The client sees them as timed out.
    pub fn stall_next_requests(&self, count: usize) {
        self.state.lock().unwrap().requests_to_stall = count;
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/v1/sys/init", put(init_handler).get(init_status_handler))
        .route("/v1/sys/unseal", put(unseal_handler))
        .route("/v1/sys/seal-status", get(seal_status_handler))
        .layer(middleware::from_fn_with_state(Arc::clone(&state), stall))
        .with_state(state)
}

async fn stall(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let stalled = {
        let mut state = state.lock().unwrap();
        let stalled = state.requests_to_stall > 0;
        if stalled {
            state.requests_to_stall -= 1;
        }
        stalled
    };
    if stalled {
        return std::future::pending::<Response>().await;
    }
    next.run(request).await
}

async fn init_handler(State(state): State<Shared>, headers: HeaderMap, body: String) -> Response {
    let mut state = state.lock().unwrap();
    state.record("PUT", "/v1/sys/init", &headers, &body);
    if let Some(fixed) = &state.init_body {
        return (StatusCode::OK, fixed.clone()).into_response();
    }
    reply(state.init(&body))
}

async fn init_status_handler(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    state.record("GET", "/v1/sys/init", &headers, "");
    reply((200, json!({ "initialized": state.initialized })))
}

async fn unseal_handler(
    State(state): State<Shared>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let mut state = state.lock().unwrap();
    state.record("PUT", "/v1/sys/unseal", &headers, &body);
    reply(state.unseal(&body))
}

async fn seal_status_handler(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    state.record("GET", "/v1/sys/seal-status", &headers, "");
    reply((200, state.seal_status()))
}

fn reply((status, body): (u16, Value)) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(body)).into_response()
}

fn errors(message: &str) -> Value {
    json!({ "errors": [message] })
}

impl VaultState {
    fn record(&mut self, method: &str, path: &str, headers: &HeaderMap, body: &str) {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        self.requests.push(Recorded {
            method: method.to_owned(),
            path: path.to_owned(),
            content_type,
            body: body.to_owned(),
        });
    }

    fn init(&mut self, body: &str) -> (u16, Value) {
        if self.initialized {
            return (400, errors("Vault is already initialized"));
        }

        let Ok(request) = serde_json::from_str::<Value>(body) else {
            return (400, errors("failed to parse JSON input"));
        };
        let shares = request["secret_shares"].as_u64().unwrap_or(0) as u8;
        let threshold = request["secret_threshold"].as_u64().unwrap_or(0) as u8;

        self.initialized = true;
        self.shares = shares;
        self.threshold = threshold;
        let keys: Vec<String> = (0..shares).map(|i| format!("{i:02x}c0ffee")).collect();
        self.keys_base64 = (0..shares).map(|i| format!("share{i}+b64=")).collect();

        (
            200,
            json!({
                "keys": keys,
                "keys_base64": self.keys_base64,
                "root_token": ROOT_TOKEN,
            }),
        )
    }

    fn unseal(&mut self, body: &str) -> (u16, Value) {
        if let Some(status) = self.unseal_failure {
            return (status, errors("internal error"));
        }
        if !self.initialized {
            return (400, errors("Vault is not initialized"));
        }

        let Ok(request) = serde_json::from_str::<Value>(body) else {
            return (400, errors("failed to parse JSON input"));
        };
        let Some(key) = request["key"].as_str() else {
            return (400, errors("missing required 'key' parameter"));
        };
        if !self.keys_base64.iter().any(|k| k == key) {
            return (400, errors("'key' must be a valid hex or base64 string"));
        }

        if self.sealed && !self.submitted.iter().any(|k| k == key) {
            self.submitted.push(key.to_owned());
            if self.submitted.len() >= usize::from(self.threshold) {
                self.sealed = false;
                self.submitted.clear();
            }
        }

        (200, self.seal_status())
    }

    fn seal_status(&self) -> Value {
        json!({
            "type": "shamir",
            "initialized": self.initialized,
            "sealed": self.sealed,
            "t": self.threshold,
            "n": self.shares,
            "progress": self.submitted.len(),
            "version": "1.15.0",
        })
    }
}

/// An address nothing listens on.
pub fn closed_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    url
}
