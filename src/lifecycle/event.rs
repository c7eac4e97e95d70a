//! # Lifecycle Events
//!
//! Payloads exchanged with the Extensions API. Events are only decoded for
//! logging; the event loop treats every event the same way.

use serde::{Deserialize, Serialize};

/// Body of the registration request
#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub events: &'a [&'a str],
}

/// Event delivered by `event/next`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleEvent {
    pub event_type: String,
    #[serde(default)]
    pub deadline_ms: Option<u64>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub shutdown_reason: Option<String>,
}

impl LifecycleEvent {
    /// Decode an event body, `None` when it is not a recognizable event
    #[must_use]
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }
}
