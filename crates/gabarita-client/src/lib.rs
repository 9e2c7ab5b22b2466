//! Authenticated HTTP client for the Gabarita backend.
//!
//! This crate is the one place that knows how a request becomes
//! authenticated and what happens when the backend says it isn't:
//!
//! 1. **Bearer attachment**: the stored access token rides on every call.
//! 2. **Refresh on 401**: the first 401 triggers one refresh (shared by
//!    every request that hit the same expiry) and one replay.
//! 3. **Session expiry**: when refresh is impossible, the stored session is
//!    cleared and the host is sent to the login route.
//! 4. **Typed endpoints**: one method per backend call, returning
//!    `Result<T, ClientError>`.
//!
//! # How it fits in the stack
//!
//! ```text
//! Session Layer (above)  ← login/logout/profile through typed endpoints
//!     ↕
//! Client Layer (this crate)  ← bearer, refresh, replay, error mapping
//!     ↕
//! Transport + Store (below)  ← raw HTTP, durable tokens
//! ```

#![allow(async_fn_in_trait)]

mod client;
mod config;
mod endpoints;
mod error;
mod navigator;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use navigator::Navigator;

pub use gabarita_transport::{CancelToken, HttpTransport, Method};
