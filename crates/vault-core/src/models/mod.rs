//! Data models for the vault API.
//!
//! This module contains the wire types exchanged with the server:
//!
//! - `FileItem`, `Pagination`, `FileListResponse`: file listings
//! - `DeleteFileResponse`, `VisibilityResponse`: mutation outcomes
//! - `StatsResponse`: aggregate usage and dedup savings
//! - `UploadFile`, `UploadResult`, `UploadSummary`: uploads
//! - `SearchParams`: `/search` filters

pub mod file;
pub mod search;
pub mod stats;
pub mod upload;

pub use file::{
    DeleteFileResponse, FileCategory, FileId, FileItem, FileListResponse, Pagination,
    VisibilityResponse,
};
pub use search::SearchParams;
pub use stats::StatsResponse;
pub use upload::{UploadFile, UploadResult, UploadSummary};
