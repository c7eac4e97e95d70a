//! Shared test fixtures
//!
//! - [`FakeSecretStore`]: in-memory `SecretStore` with scripted results
//! - [`MockHost`]: Axum-based mock of the Lambda Extensions API
//! - [`HangUpHost`]: raw TCP host that registers the extension and then drops
//!   every poll connection without answering

#![allow(dead_code, reason = "Each test binary uses a different subset of fixtures")]

use async_trait::async_trait;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use lambda_secrets_prefetch::config::{Config, SecretEntry, SecretManager};
use lambda_secrets_prefetch::provider::{FetchCause, SecretFetchError, SecretStore, SecretValue};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Barrier;

/// Scripted behaviour for one secret identifier
#[derive(Debug, Clone)]
pub enum FakeSecret {
    Text(String),
    /// Base64 payload, as held by the store for binary secrets
    Base64(String),
    Unassigned,
    Fail(String),
    Panic,
}

/// In-memory secret store
#[derive(Debug, Default)]
pub struct FakeSecretStore {
    secrets: HashMap<String, FakeSecret>,
    calls: Mutex<Vec<String>>,
    barrier: Option<Arc<Barrier>>,
}

impl FakeSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, identifier: &str, secret: FakeSecret) -> Self {
        self.secrets.insert(identifier.to_string(), secret);
        self
    }

    pub fn text(self, identifier: &str, value: &str) -> Self {
        self.with(identifier, FakeSecret::Text(value.to_string()))
    }

    /// Every fetch waits until `parties` fetches are in flight at once
    pub fn with_barrier(mut self, parties: usize) -> Self {
        self.barrier = Some(Arc::new(Barrier::new(parties)));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        let mut calls = self.calls.lock().unwrap().clone();
        calls.sort();
        calls
    }
}

#[async_trait]
impl SecretStore for FakeSecretStore {
    async fn fetch(&self, identifier: &str) -> Result<Option<SecretValue>, SecretFetchError> {
        self.calls.lock().unwrap().push(identifier.to_string());
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }

        match self.secrets.get(identifier) {
            None => Err(SecretFetchError::new(
                identifier,
                FetchCause::Store(format!(
                    "ResourceNotFoundException: Secrets Manager can't find {identifier}"
                )),
            )),
            Some(FakeSecret::Text(value)) => Ok(Some(SecretValue::from(value.as_str()))),
            Some(FakeSecret::Base64(encoded)) => SecretValue::from_base64(encoded.as_bytes())
                .map(Some)
                .map_err(|e| SecretFetchError::new(identifier, e)),
            Some(FakeSecret::Unassigned) => Ok(None),
            Some(FakeSecret::Fail(reason)) => Err(SecretFetchError::new(
                identifier,
                FetchCause::Store(reason.clone()),
            )),
            Some(FakeSecret::Panic) => panic!("fake store exploded on {identifier}"),
        }
    }
}

/// Build a configuration with a single prefix group
pub fn config_with(home: &Path, prefix: &str, secrets: &[(&str, Option<&str>)]) -> Config {
    Config {
        secrets_home: home.display().to_string(),
        secret_managers: vec![SecretManager {
            prefix: prefix.to_string(),
            secrets: secrets
                .iter()
                .map(|(name, filename)| SecretEntry {
                    secretname: (*name).to_string(),
                    filename: filename.unwrap_or_default().to_string(),
                })
                .collect(),
        }],
    }
    .with_defaults()
}

/// A registration request as seen by the mock host
#[derive(Debug, Clone)]
pub struct Registration {
    pub extension_name: Option<String>,
    pub body: serde_json::Value,
    /// Files present in the watched directory when the request arrived
    pub files_present: Vec<String>,
}

#[derive(Debug, Default)]
pub struct HostState {
    identifier: Option<String>,
    watch_dir: Option<PathBuf>,
    events: Mutex<VecDeque<(u16, String)>>,
    pub registrations: Mutex<Vec<Registration>>,
    /// `Lambda-Extension-Identifier` header of each poll
    pub polls: Mutex<Vec<Option<String>>>,
}

/// Mock Extensions API
///
/// `event/next` replays the scripted responses in order, then answers 500.
#[derive(Debug)]
pub struct MockHost {
    pub base_url: String,
    pub state: Arc<HostState>,
}

impl MockHost {
    pub async fn start(
        identifier: Option<&str>,
        events: Vec<(u16, &str)>,
        watch_dir: Option<&Path>,
    ) -> Self {
        let state = Arc::new(HostState {
            identifier: identifier.map(str::to_string),
            watch_dir: watch_dir.map(Path::to_path_buf),
            events: Mutex::new(
                events
                    .into_iter()
                    .map(|(status, body)| (status, body.to_string()))
                    .collect(),
            ),
            ..HostState::default()
        });

        let app = Router::new()
            .route(paths::REGISTER, post(register))
            .route(paths::EVENT_NEXT, get(event_next))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn registrations(&self) -> Vec<Registration> {
        self.state.registrations.lock().unwrap().clone()
    }

    pub fn polls(&self) -> Vec<Option<String>> {
        self.state.polls.lock().unwrap().clone()
    }
}

async fn register(
    State(state): State<Arc<HostState>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let files_present = state
        .watch_dir
        .as_ref()
        .and_then(|dir| std::fs::read_dir(dir).ok())
        .map(|entries| {
            let mut names: Vec<String> = entries
                .filter_map(Result::ok)
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            names
        })
        .unwrap_or_default();

    state.registrations.lock().unwrap().push(Registration {
        extension_name: headers
            .get(paths::headers::EXTENSION_NAME)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_str(&body).unwrap_or(serde_json::Value::Null),
        files_present,
    });

    let body = r#"{"functionName":"fn","functionVersion":"$LATEST","handler":"main.handler"}"#;
    match &state.identifier {
        Some(identifier) => (
            StatusCode::OK,
            [(paths::headers::EXTENSION_IDENTIFIER, identifier.clone())],
            body,
        )
            .into_response(),
        None => (StatusCode::OK, body).into_response(),
    }
}

async fn event_next(State(state): State<Arc<HostState>>, headers: HeaderMap) -> Response {
    state.polls.lock().unwrap().push(
        headers
            .get(paths::headers::EXTENSION_IDENTIFIER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    );

    let next = state.events.lock().unwrap().pop_front();
    match next {
        Some((status, body)) => {
            let status = StatusCode::from_u16(status).unwrap();
            (status, body).into_response()
        }
        None => (StatusCode::INTERNAL_SERVER_ERROR, "extension exiting").into_response(),
    }
}

/// Host that answers registration and closes every other connection unanswered
#[derive(Debug)]
pub struct HangUpHost {
    pub base_url: String,
}

impl HangUpHost {
    pub async fn start(identifier: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let identifier = identifier.to_string();

        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let request = read_request(&mut stream).await;
                if request.contains(paths::REGISTER) {
                    let response = format!(
                        "HTTP/1.1 200 OK\r\n{}: {}\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{{}}",
                        paths::headers::EXTENSION_IDENTIFIER,
                        identifier
                    );
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                }
                // Any other request: drop the connection without a response
            }
        });

        Self {
            base_url: format!("http://{addr}"),
        }
    }
}

/// Read an HTTP/1.1 request head plus its `Content-Length` body
async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = text[..head_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
