use std::sync::Arc;

use frontdesk_common::StaticToken;
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::store::{GcsObjectStore, ObjectStore, StoreError};

fn store(server: &MockServer) -> GcsObjectStore {
    GcsObjectStore::new(
        reqwest::Client::new(),
        Arc::new(StaticToken("gcs-token".to_string())),
        "blog-bucket",
    )
    .with_base_url(&server.uri())
}

#[tokio::test]
async fn test_list_follows_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/storage/v1/b/blog-bucket/o"))
        .and(query_param("pageToken", "next"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "name": "second.md" }]
        })))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/storage/v1/b/blog-bucket/o"))
        .and(query_param("delimiter", "/"))
        .and(header("authorization", "Bearer gcs-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "name": "first.md" }, { "name": "metadata.json" }],
            "nextPageToken": "next"
        })))
        .with_priority(2)
        .mount(&server)
        .await;

    let names = store(&server).list().await.unwrap();
    assert_eq!(names, vec!["first.md", "metadata.json", "second.md"]);
}

#[tokio::test]
async fn test_list_empty_bucket() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/storage/v1/b/blog-bucket/o"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "kind": "storage#objects" })))
        .mount(&server)
        .await;

    assert!(store(&server).list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_read_downloads_media() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/storage/v1/b/blog-bucket/o/hello.md"))
        .and(query_param("alt", "media"))
        .respond_with(ResponseTemplate::new(200).set_body_string("---\ntitle: Hi\n---\n"))
        .mount(&server)
        .await;

    let bytes = store(&server).read("hello.md").await.unwrap();
    assert_eq!(bytes, b"---\ntitle: Hi\n---\n");
}

#[tokio::test]
async fn test_read_missing_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/storage/v1/b/blog-bucket/o/gone.md"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = store(&server).read("gone.md").await;
    assert!(matches!(result, Err(StoreError::NotFound(name)) if name == "gone.md"));
}

#[tokio::test]
async fn test_write_uploads_media() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/storage/v1/b/blog-bucket/o"))
        .and(query_param("uploadType", "media"))
        .and(query_param("name", "metadata.json"))
        .and(header("content-type", "application/json"))
        .and(body_string("{\"articles\":[]}"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "metadata.json" })))
        .expect(1)
        .mount(&server)
        .await;

    store(&server)
        .write("metadata.json", "application/json", b"{\"articles\":[]}".to_vec())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_server_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/storage/v1/b/blog-bucket/o"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    match store(&server).list().await {
        Err(StoreError::Api { status, message }) => {
            assert_eq!(status, 403);
            assert!(message.contains("forbidden"));
        }
        other => panic!("expected API error, got {:?}", other),
    }
}
