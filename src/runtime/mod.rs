//! # Runtime Module
//!
//! Runtime components for the extension: initialization and the startup
//! sequence that ends in the lifecycle event loop.

pub mod initialization;
pub mod run;

pub use initialization::*;
pub use run::*;
