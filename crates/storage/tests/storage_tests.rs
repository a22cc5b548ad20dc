use bytes::Bytes;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wardrobe_rust_storage::{HttpObjectStore, ObjectStore, StorageError};

fn store_for(server: &MockServer) -> HttpObjectStore {
    HttpObjectStore::new(&server.uri(), "test_api_key", reqwest::Client::new())
}

#[tokio::test]
async fn put_returns_a_reference_under_the_base_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/objects/[0-9a-f-]+$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    let reference = store
        .put(Bytes::from_static(b"image-bytes"), "image/png")
        .await
        .unwrap();

    assert!(reference.starts_with(&format!("{}/objects/", mock_server.uri())));
}

#[tokio::test]
async fn two_puts_return_distinct_references() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/objects/[0-9a-f-]+$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    let first = store.put(Bytes::from_static(b"a"), "image/png").await.unwrap();
    let second = store.put(Bytes::from_static(b"a"), "image/png").await.unwrap();
    assert_ne!(first, second);
}

#[tokio::test]
async fn get_returns_the_stored_bytes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/objects/some-object"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"image-bytes".to_vec()))
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    let bytes = store
        .get(&format!("{}/objects/some-object", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(bytes, Bytes::from_static(b"image-bytes"));
}

#[tokio::test]
async fn get_maps_404_to_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/objects/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    let reference = format!("{}/objects/missing", mock_server.uri());
    match store.get(&reference).await {
        Err(StorageError::NotFound(r)) => assert_eq!(r, reference),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn get_maps_other_failures_to_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/objects/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    match store
        .get(&format!("{}/objects/broken", mock_server.uri()))
        .await
    {
        Err(StorageError::Api { status, body }) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    // Nothing listens on the discard port.
    let store = HttpObjectStore::new("http://127.0.0.1:9", "key", reqwest::Client::new());
    match store.get("http://127.0.0.1:9/objects/x").await {
        Err(StorageError::Transport(_)) => {}
        other => panic!("expected Transport, got {:?}", other),
    }
}

#[tokio::test]
async fn put_surfaces_api_rejection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/objects/.+$"))
        .respond_with(ResponseTemplate::new(403).set_body_string("denied"))
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server);
    match store.put(Bytes::from_static(b"x"), "image/png").await {
        Err(StorageError::Api { status, .. }) => assert_eq!(status.as_u16(), 403),
        other => panic!("expected Api error, got {:?}", other),
    }
}
