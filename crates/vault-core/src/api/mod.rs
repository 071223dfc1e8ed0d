//! REST API client module for the vault service.
//!
//! This module provides the `ApiClient` (the Gateway Client) for listing,
//! searching, uploading, deleting, and publishing files, plus the
//! `Transport` seam it sends requests through.
//!
//! JSON calls authenticate with a bearer token header. Download and
//! preview URLs carry the token as an `auth` query parameter instead.

pub mod client;
pub mod error;
pub mod transport;

pub use client::{ApiClient, RequestOptions, DEFAULT_PAGE_SIZE};
pub use error::ApiError;
pub use transport::{
    FormPart, HttpRequest, HttpResponse, ReqwestTransport, RequestBody, Transport, TransportError,
};
