//! End-to-end tests of the session manager and gateway client over real
//! HTTP, using `ReqwestTransport` against a local mock server.

use std::sync::Arc;

use httpmock::prelude::*;
use serde_json::json;
use vault_core::api::{ApiClient, ApiError, ReqwestTransport, Transport};
use vault_core::auth::{Credentials, FileStore, MemoryStore, SessionManager, SessionStore};
use vault_core::models::{SearchParams, UploadFile};

fn build(server: &MockServer, store: Arc<dyn SessionStore>) -> ApiClient {
    let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new());
    let base = server.base_url();
    let session = Arc::new(SessionManager::new(&base, transport.clone(), store).unwrap());
    ApiClient::new(&base, transport, session).unwrap()
}

#[tokio::test]
async fn test_login_and_authenticated_listing() {
    let server = MockServer::start_async().await;
    let login = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/login")
                .json_body(json!({"username": "alice", "password": "x"}));
            then.status(200)
                .json_body(json!({"token": "t1", "username": "alice"}));
        })
        .await;
    let files = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/files")
                .query_param("page", "1")
                .query_param("pageSize", "20")
                .header("Authorization", "Bearer t1");
            then.status(200).json_body(json!({
                "files": [],
                "pagination": {"currentPage": 1, "totalPages": 0, "totalFiles": 0}
            }));
        })
        .await;

    let client = build(&server, Arc::new(MemoryStore::new()));
    let session = client
        .session()
        .login(&Credentials::new("alice", "x"))
        .await
        .unwrap();
    client.session().set_auth(&session).unwrap();
    assert!(client.session().is_authenticated());
    assert_eq!(client.session().get_username().as_deref(), Some("alice"));

    let listing = client.get_files(1, 20).await.unwrap();
    assert!(listing.files.is_empty());

    login.assert_async().await;
    files.assert_async().await;
}

#[tokio::test]
async fn test_rejected_login() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/login");
            then.status(401);
        })
        .await;

    let client = build(&server, Arc::new(MemoryStore::new()));
    let err = client
        .session()
        .login(&Credentials::new("alice", "wrong"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidCredentials));
}

#[tokio::test]
async fn test_status_error_carries_status_text() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/stats");
            then.status(404).body("no such thing");
        })
        .await;

    let client = build(&server, Arc::new(MemoryStore::new()));
    let err = client.get_stats().await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "API Error: Not Found");
}

#[tokio::test]
async fn test_unauthenticated_request_sends_no_header() {
    let server = MockServer::start_async().await;
    let public = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/files/public")
                .header_missing("Authorization");
            then.status(200).json_body(json!({
                "files": [],
                "pagination": {"currentPage": 1, "totalPages": 1, "totalFiles": 0}
            }));
        })
        .await;

    let client = build(&server, Arc::new(MemoryStore::new()));
    client.get_public_files(1, 20).await.unwrap();
    public.assert_async().await;
}

#[tokio::test]
async fn test_search_delete_and_publish() {
    let server = MockServer::start_async().await;
    let search = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("filename", "report")
                .query_param("page", "2");
            then.status(200).json_body(json!({
                "files": [{
                    "id": 42,
                    "filename": "report.pdf",
                    "size_bytes": 10,
                    "mime_type": "application/pdf",
                    "created_at": "2024-01-01T00:00:00Z",
                    "is_public": false
                }],
                "pagination": {"currentPage": 2, "totalPages": 2, "totalFiles": 21}
            }));
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/files/42/delete");
            then.status(200)
                .json_body(json!({"message": "ok", "physical_file_deleted": false}));
        })
        .await;
    let publish = server
        .mock_async(|when, then| {
            when.method(PATCH).path("/files/42/make-public");
            then.status(200)
                .json_body(json!({"message": "ok", "is_public": true}));
        })
        .await;

    let client = build(&server, Arc::new(MemoryStore::new()));
    let params = SearchParams {
        filename: Some("report".into()),
        page: Some(2),
        ..SearchParams::default()
    };
    let found = client.search_files(&params).await.unwrap();
    assert_eq!(found.files[0].id, 42);

    let deleted = client.delete_file(42).await.unwrap();
    assert!(!deleted.physical_file_deleted);

    let published = client.make_file_public(42).await.unwrap();
    assert!(published.is_public);

    search.assert_async().await;
    delete.assert_async().await;
    publish.assert_async().await;
}

#[tokio::test]
async fn test_multipart_upload() {
    let server = MockServer::start_async().await;
    let upload = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/upload")
                .body_includes("name=\"file\"; filename=\"a.txt\"")
                .body_includes("name=\"file\"; filename=\"b.txt\"")
                .body_includes("name=\"tags\"")
                .body_includes("work,q3");
            then.status(200).json_body(json!([
                {"message": "stored", "filename": "a.txt", "size": 1, "hash": "h1", "deduplicated": false},
                {"message": "stored", "filename": "b.txt", "size": 1, "hash": "h1", "deduplicated": true}
            ]));
        })
        .await;

    let client = build(&server, Arc::new(MemoryStore::new()));
    let files = vec![
        UploadFile::new("a.txt", b"A".to_vec()).with_content_type("text/plain"),
        UploadFile::new("b.txt", b"A".to_vec()),
    ];
    let results = client.upload_files(files, Some("work,q3")).await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[1].deduplicated);
    upload.assert_async().await;
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    // Nothing listens on this port once the listener is dropped
    let base = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };
    let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new());
    let session = Arc::new(
        SessionManager::new(&base, transport.clone(), Arc::new(MemoryStore::new())).unwrap(),
    );
    let client = ApiClient::new(&base, transport, session).unwrap();

    let err = client.get_stats().await.unwrap_err();
    assert!(err.is_transport());
}

#[test]
fn test_file_store_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new());
    let open = || {
        SessionManager::new(
            "http://localhost:8080",
            transport.clone(),
            Arc::new(FileStore::new(dir.path().to_path_buf())),
        )
        .unwrap()
    };

    let first = open();
    first
        .set_auth(&vault_core::Session::new("t1", "alice"))
        .unwrap();

    let second = open();
    assert!(second.is_authenticated());
    assert_eq!(second.get_token().as_deref(), Some("t1"));
    second.logout().unwrap();
    assert!(!open().is_authenticated());
}
