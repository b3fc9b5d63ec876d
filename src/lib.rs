//! Mock chat client-server pair.
//!
//! A demo exchange: the client sends a single user message and the server
//! streams back a scripted reply as SSE frames, one fixed-size text chunk
//! per timer tick, closed by an explicit end-of-stream event.
//!
//! # Architecture
//!
//! - **Server**: Axum-based HTTP server exposing `POST /chat` with SSE streaming
//! - **Client**: reqwest-based consumer that reassembles frames incrementally
//!
//! # Modules
//!
//! - [`protocol`]: request and event wire types plus shared constants
//! - [`framing`]: incremental SSE frame codec
//! - [`reply`]: the scripted reply text and its chunking
//! - [`server`]: the streaming responder endpoint
//! - [`client`]: the stream consumer and per-turn accumulator
//! - [`config`]: layered runtime configuration

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::unused_async)]

pub mod client;
pub mod config;
pub mod framing;
pub mod protocol;
pub mod reply;
pub mod server;

use std::sync::Arc;

use crate::config::AppConfig;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Global configuration.
    pub config: Arc<AppConfig>,
}
