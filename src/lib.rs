//! VPC documentation assistant.
//!
//! A chat form wired to a single request/response round trip: each
//! submission posts `{ "query" }` to the server and renders the
//! `{ "response" }` it gets back.
//!
//! # Architecture
//!
//! - **Client**: a submission handler driving an injected chat surface
//!   (terminal or in-memory) over an HTTP transport
//! - **Server**: Axum serving the chat page at `GET /` and answering `POST /`
//! - **Assistant**: prompt rendering plus an OpenAI-compatible chat completions call
//!
//! # Modules
//!
//! - [`chat`]: Submission handler, chat surfaces and transport
//! - [`assistant`]: LLM-backed answering
//! - [`server`]: HTTP routes and middleware
//! - [`protocol`]: Wire types shared by client and server
//! - [`config`]: CLI and layered configuration

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod assistant;
pub mod chat;
pub mod config;
pub mod protocol;
pub mod server;

use crate::assistant::Assistant;
use crate::config::AppConfig;
use crate::server::rate_limit::SimpleRateLimiter;

use std::sync::Arc;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Answers chat queries.
    pub assistant: Arc<dyn Assistant>,
    /// Global Rate Limiter
    pub rate_limiter: Arc<SimpleRateLimiter>,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Build state from configuration and an assistant.
    pub fn new(config: Arc<AppConfig>, assistant: Arc<dyn Assistant>) -> Self {
        let rate_limiter = Arc::new(SimpleRateLimiter::new(
            config.resilience.requests_per_second,
            config.resilience.burst_size,
        ));
        Self {
            assistant,
            rate_limiter,
            config,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
