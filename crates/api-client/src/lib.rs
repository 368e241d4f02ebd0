//! Thin HTTP client for the Campus Bites backend
//!
//! The app normally runs against its built-in mock data; when a backend URL
//! is configured, the services in `app-core` fetch through this client
//! instead. It is a deliberately thin JSON-over-HTTP wrapper: base URL,
//! timeout, typed get/post, and a typed error for non-2xx responses.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;

pub use client::{ApiClient, ApiClientConfig, ApiError, Result};
