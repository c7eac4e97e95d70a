//! # Lifecycle Client
//!
//! Registration and event polling against the Lambda Extensions API.
//!
//! The lifecycle states map onto types:
//!
//! - Unregistered: [`LifecycleClient`]
//! - Registered: [`RegisteredExtension`], returned by [`LifecycleClient::register`]
//! - Awaiting event: [`RegisteredExtension::run`] long-polling `event/next`
//! - Terminated: the [`Termination`] returned by `run`
//!
//! The loop is a keep-alive: events are logged and otherwise ignored.

mod error;
mod event;

pub use error::LifecycleError;
pub use event::LifecycleEvent;

use crate::constants::DEFAULT_EXTENSION_NAME;
use event::RegisterRequest;
use paths::headers::{EXTENSION_IDENTIFIER, EXTENSION_NAME};
use reqwest::StatusCode;
use std::ffi::OsString;
use std::path::Path;
use tracing::{debug, info};

/// Why the host ended the event loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// 500: the extension is no longer valid
    Exited,
    /// 403: access revoked
    Forbidden,
}

impl Termination {
    fn from_status(status: StatusCode) -> Option<Self> {
        match status {
            StatusCode::INTERNAL_SERVER_ERROR => Some(Self::Exited),
            StatusCode::FORBIDDEN => Some(Self::Forbidden),
            _ => None,
        }
    }
}

/// Result of a single `event/next` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextEvent {
    Event { status: u16, body: String },
    Terminal(Termination),
}

/// Identity token issued by the host on registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionIdentifier(String);

impl ExtensionIdentifier {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unregistered client for the Extensions API
#[derive(Debug)]
pub struct LifecycleClient {
    http: reqwest::Client,
    base_url: String,
    extension_name: String,
}

impl LifecycleClient {
    /// Create a client for the API at `base_url`
    ///
    /// The HTTP client has no request timeout so `event/next` can long-poll.
    ///
    /// # Errors
    /// Returns [`LifecycleError::Client`] if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        extension_name: impl Into<String>,
    ) -> Result<Self, LifecycleError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(LifecycleError::Client)?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            extension_name: extension_name.into(),
        })
    }

    #[must_use]
    pub fn extension_name(&self) -> &str {
        &self.extension_name
    }

    /// Register for `INVOKE` and `SHUTDOWN` events
    ///
    /// # Errors
    /// Fails when the request fails or the response carries no identifier.
    pub async fn register(self) -> Result<RegisteredExtension, LifecycleError> {
        let url = paths::url(&self.base_url, paths::REGISTER);
        info!(
            "Registering extension as {} with {}",
            self.extension_name, url
        );

        let response = self
            .http
            .post(&url)
            .header(EXTENSION_NAME, &self.extension_name)
            .json(&RegisterRequest {
                events: &[paths::events::INVOKE, paths::events::SHUTDOWN],
            })
            .send()
            .await
            .map_err(|source| LifecycleError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let identifier = response
            .headers()
            .get(EXTENSION_IDENTIFIER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|source| LifecycleError::Body { url, source })?;
        info!(status = status.as_u16(), "Registration response: {}", body);

        let Some(identifier) = identifier else {
            return Err(LifecycleError::MissingIdentifier {
                status: status.as_u16(),
                body,
            });
        };
        info!("Got extension id {}", identifier);

        Ok(RegisteredExtension {
            http: self.http,
            base_url: self.base_url,
            identifier: ExtensionIdentifier(identifier),
        })
    }
}

/// A registered extension holding its identity token
#[derive(Debug)]
pub struct RegisteredExtension {
    http: reqwest::Client,
    base_url: String,
    identifier: ExtensionIdentifier,
}

impl RegisteredExtension {
    #[must_use]
    pub fn identifier(&self) -> &ExtensionIdentifier {
        &self.identifier
    }

    /// Long-poll for the next event
    ///
    /// # Errors
    /// Any transport failure, including failure to read the body.
    pub async fn next_event(&self) -> Result<NextEvent, LifecycleError> {
        let url = paths::url(&self.base_url, paths::EVENT_NEXT);
        debug!("Waiting for next event");

        let response = self
            .http
            .get(&url)
            .header(EXTENSION_IDENTIFIER, self.identifier.as_str())
            .send()
            .await
            .map_err(|source| LifecycleError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if let Some(termination) = Termination::from_status(status) {
            return Ok(NextEvent::Terminal(termination));
        }

        let body = response
            .text()
            .await
            .map_err(|source| LifecycleError::Body { url, source })?;
        Ok(NextEvent::Event {
            status: status.as_u16(),
            body,
        })
    }

    /// Poll events until the host signals termination
    ///
    /// # Errors
    /// Returns the first transport failure; there is no retry.
    pub async fn run(&self) -> Result<Termination, LifecycleError> {
        loop {
            match self.next_event().await? {
                NextEvent::Event { status, body } => log_event(status, &body),
                NextEvent::Terminal(termination) => {
                    match termination {
                        Termination::Exited => info!("... EXITING ..."),
                        Termination::Forbidden => info!("... FORBIDDEN ..."),
                    }
                    return Ok(termination);
                }
            }
        }
    }
}

fn log_event(status: u16, body: &str) {
    match LifecycleEvent::parse(body) {
        Some(event) => info!(
            status,
            event_type = %event.event_type,
            request_id = event.request_id.as_deref().unwrap_or(""),
            deadline_ms = event.deadline_ms.unwrap_or_default(),
            "Received event: {}",
            body
        ),
        None => info!(status, "Received: {}", body),
    }
}

/// Extension name reported on registration: the executable's base name
#[must_use]
pub fn extension_name(argv0: Option<OsString>) -> String {
    argv0
        .as_deref()
        .map(Path::new)
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_EXTENSION_NAME.to_string())
}
