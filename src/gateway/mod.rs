//! Endpoint gateway for Parley
//!
//! The boundary between the transcript and the chat / image backend. Each call
//! either yields the backend's reply text or a single opaque [`GatewayError`];
//! callers only branch on success vs. failure.
//!
//! # Usage
//!
//! ```rust,no_run
//! use parley::gateway::{Gateway, HttpGateway};
//!
//! # async fn example() -> parley::gateway::GatewayResult<()> {
//! let gateway = HttpGateway::new("http://localhost:5000");
//! let reply = gateway.chat("Hello!").await?;
//! # Ok(())
//! # }
//! ```
mod http;

pub use http::{CHAT_PATH, HttpGateway, IMAGE_PATH};

use crate::router::Request;
use async_trait::async_trait;

/// Bot text shown whenever a gateway call fails, whatever the cause.
pub const FALLBACK_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

// ============================================
// Error Types
// ============================================

#[derive(Debug, Clone)]
pub struct GatewayError(String);

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for GatewayError {}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::new(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::new(format!("malformed reply: {}", err))
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

// ============================================
// Gateway Trait
// ============================================

/// Outbound calls to the chat / image backend.
///
/// reqwest futures are not `Send` in the browser, so the wasm build drops the
/// bound.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Gateway: Send + Sync {
    async fn chat(&self, text: &str) -> GatewayResult<String>;

    async fn generate_image(&self, prompt: &str) -> GatewayResult<String>;

    /// Issue the call matching a routed request.
    async fn dispatch(&self, request: &Request) -> GatewayResult<String> {
        match request {
            Request::Chat { text } => self.chat(text).await,
            Request::Image { prompt } => self.generate_image(prompt).await,
        }
    }
}
