//! Shared API path definitions for the AWS Lambda Extensions API
//!
//! This crate centralizes the Extensions API paths and header names so the
//! extension's lifecycle client and the mock host used in tests agree on them.
//!
//! ## Route Constants
//!
//! Route constants are provided for Axum routes, which require static string literals.
//! [`url`] joins them onto a base address for the HTTP client.

/// Extensions API version segment
pub const API_VERSION: &str = "2020-01-01";

/// `POST` route used to register the extension
pub const REGISTER: &str = "/2020-01-01/extension/register";

/// `GET` long-poll route that blocks until the next lifecycle event
pub const EVENT_NEXT: &str = "/2020-01-01/extension/event/next";

/// Header names used by the Extensions API
pub mod headers {
    /// Request header carrying the extension's name on registration
    pub const EXTENSION_NAME: &str = "Lambda-Extension-Name";
    /// Response header on registration, request header on every later call
    pub const EXTENSION_IDENTIFIER: &str = "Lambda-Extension-Identifier";
}

/// Lifecycle event types an extension can subscribe to
pub mod events {
    pub const INVOKE: &str = "INVOKE";
    pub const SHUTDOWN: &str = "SHUTDOWN";
}

/// Join a route onto a base address such as `http://127.0.0.1:9001`
///
/// A trailing slash on the base is ignored.
#[must_use]
pub fn url(base: &str, route: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), route)
}
