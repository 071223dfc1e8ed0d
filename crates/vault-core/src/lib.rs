//! Core library for the dedup vault client.
//!
//! Two cooperating pieces make up the client:
//!
//! - [`auth::SessionManager`] owns the persisted token and username and
//!   produces the `Authorization` header.
//! - [`api::ApiClient`] turns typed calls into HTTP requests against the
//!   vault service, attaching the session's header and normalizing failures.
//!
//! Both are constructed explicitly and share a [`api::Transport`], so tests
//! can run them against a mock.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{Session, SessionManager};
pub use config::Config;
