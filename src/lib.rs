//! GitHub REST operations exposed as MCP tools over stdio.
//!
//! The [`http::GitHubClient`] owns the request execution layer: pacing,
//! authentication, quota tracking and error classification. [`ops`] maps typed
//! tool inputs onto REST paths; [`server`] is the JSON-RPC surface.

pub mod config;
pub mod error;
pub mod http;
pub mod mcp;
pub mod ops;
pub mod server;
pub mod tools;
pub mod types;

pub use config::{Config, ConfigBuilder, ConfigError};
pub use error::{Error, Result};
pub use http::{GitHubClient, RequestDescriptor};
pub use types::{Decoded, QuotaSnapshot};
