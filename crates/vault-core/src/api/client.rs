//! Gateway client for the vault REST API.
//!
//! `ApiClient::request` is the single place API calls are issued; every
//! typed method below is a thin specialization of it.

use std::sync::Arc;

use reqwest::header::HeaderMap;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::transport::{FormPart, HttpRequest, RequestBody, Transport};
use super::ApiError;
use crate::auth::SessionManager;
use crate::models::{
    DeleteFileResponse, FileId, FileListResponse, SearchParams, StatsResponse, UploadFile,
    UploadResult, VisibilityResponse,
};

// ============================================================================
// Constants
// ============================================================================

/// Page size used by the file list when the caller has no preference
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Multipart field name repeated once per uploaded file
const UPLOAD_FILE_FIELD: &str = "file";

/// Multipart field carrying comma-separated tags
const UPLOAD_TAGS_FIELD: &str = "tags";

/// Query parameter carrying the token on navigation URLs
const URL_AUTH_PARAM: &str = "auth";

pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, ApiError> {
    let url = Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: "expected an http(s) URL".to_string(),
        });
    }
    // Endpoints are appended to the base as a path suffix
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: "must not contain a query string or fragment".to_string(),
        });
    }
    Ok(url)
}

/// Merge request headers over the session's auth headers.
/// Caller-supplied headers win on key collision.
fn merge_headers(mut base: HeaderMap, overrides: HeaderMap) -> HeaderMap {
    for name in overrides.keys() {
        base.remove(name);
    }
    for (name, value) in overrides.iter() {
        base.append(name.clone(), value.clone());
    }
    base
}

/// Options for `ApiClient::request`; defaults to a bodiless GET
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }
}

impl RequestOptions {
    pub fn method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

/// API client for the vault service.
/// Clone is cheap - the transport and session are shared behind `Arc`.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    transport: Arc<dyn Transport>,
    session: Arc<SessionManager>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        transport: Arc<dyn Transport>,
        session: Arc<SessionManager>,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            transport,
            session,
        })
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    fn base(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Issue one request to `base_url + endpoint` and decode the JSON reply.
    ///
    /// The session's auth headers are captured at send time. Any non-2xx
    /// status becomes `ApiError::Status`; no retry is attempted.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base(), endpoint);
        let headers = merge_headers(self.session.get_auth_headers(), options.headers);
        let method = options.method;

        debug!(method = %method, endpoint = endpoint, "Sending API request");
        let response = self
            .transport
            .send(HttpRequest {
                method: method.clone(),
                url,
                headers,
                body: options.body,
            })
            .await?;

        if !response.is_success() {
            warn!(
                method = %method,
                endpoint = endpoint,
                status = response.status.as_u16(),
                "API request failed"
            );
            return Err(ApiError::from_status(response.status));
        }

        Ok(response.json()?)
    }

    // ===== File Listings =====

    /// List the caller's own files (1-indexed pages)
    pub async fn get_files(&self, page: u32, page_size: u32) -> Result<FileListResponse, ApiError> {
        let endpoint = format!("/files?page={}&pageSize={}", page, page_size);
        self.request(&endpoint, RequestOptions::default()).await
    }

    /// List files any user has made public
    pub async fn get_public_files(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<FileListResponse, ApiError> {
        let endpoint = format!("/files/public?page={}&pageSize={}", page, page_size);
        self.request(&endpoint, RequestOptions::default()).await
    }

    pub async fn search_files(&self, params: &SearchParams) -> Result<FileListResponse, ApiError> {
        let query = params.query_string();
        let endpoint = if query.is_empty() {
            "/search".to_string()
        } else {
            format!("/search?{}", query)
        };
        self.request(&endpoint, RequestOptions::default()).await
    }

    pub async fn get_stats(&self) -> Result<StatsResponse, ApiError> {
        self.request("/stats", RequestOptions::default()).await
    }

    // ===== Mutations =====

    /// Upload a batch as one multipart request.
    ///
    /// Results are the server's per-file outcomes; match them to inputs by
    /// `filename`/`hash` rather than position.
    pub async fn upload_files(
        &self,
        files: Vec<UploadFile>,
        tags: Option<&str>,
    ) -> Result<Vec<UploadResult>, ApiError> {
        let count = files.len();
        let mut parts: Vec<FormPart> = files
            .into_iter()
            .map(|file| FormPart::File {
                name: UPLOAD_FILE_FIELD.to_string(),
                filename: file.filename,
                content_type: file.content_type,
                data: file.data,
            })
            .collect();

        if let Some(tags) = tags.filter(|t| !t.is_empty()) {
            parts.push(FormPart::Text {
                name: UPLOAD_TAGS_FIELD.to_string(),
                value: tags.to_string(),
            });
        }

        debug!(files = count, "Uploading files");
        let options = RequestOptions::method(Method::POST).body(RequestBody::Multipart(parts));
        self.request("/upload", options).await
    }

    /// Remove a file reference. `physical_file_deleted` is passed through
    /// exactly as the server reported it.
    pub async fn delete_file(&self, id: FileId) -> Result<DeleteFileResponse, ApiError> {
        let endpoint = format!("/files/{}/delete", id);
        self.request(&endpoint, RequestOptions::method(Method::DELETE))
            .await
    }

    /// Make a private file public. There is no reverse operation.
    pub async fn make_file_public(&self, id: FileId) -> Result<VisibilityResponse, ApiError> {
        let endpoint = format!("/files/{}/make-public", id);
        self.request(&endpoint, RequestOptions::method(Method::PATCH))
            .await
    }

    // ===== Navigation URLs =====
    //
    // These are opened by a browser or downloader rather than fetched
    // here, so the token travels in the query string instead of a header.

    pub fn get_download_url(&self, id: FileId) -> Url {
        self.navigation_url(id, "download")
    }

    pub fn get_preview_url(&self, id: FileId) -> Url {
        self.navigation_url(id, "preview")
    }

    fn navigation_url(&self, id: FileId, action: &str) -> Url {
        let mut url = self.base_url.clone();
        let path = format!(
            "{}/files/{}/{}",
            self.base_url.path().trim_end_matches('/'),
            id,
            action
        );
        url.set_path(&path);
        url.set_query(None);

        if let Some(token) = self.session.get_token().filter(|t| !t.is_empty()) {
            url.query_pairs_mut().append_pair(URL_AUTH_PARAM, &token);
        }
        url
    }
}
