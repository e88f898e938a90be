//! HTTP fetch layer for themekit
//!
//! Provides a mockable, configurable HTTP client used to pull remote theme
//! metadata.
//!
//! ## Features
//!
//! - **Trait-based design**: Mockable via `HttpClientTrait`
//! - **Configurable**: Timeouts, proxy, user-agent, redirects
//! - **Connection pooling**: Managed by underlying reqwest client
//! - **Testing support**: Easy mocking with wiremock

pub mod client;
pub mod config;
pub mod error;

pub use client::{shared_client, HttpClient, HttpClientTrait};
pub use config::HttpConfig;
pub use error::{HttpError, Result};

/// Re-export commonly used types
pub use reqwest::StatusCode;
