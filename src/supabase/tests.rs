//! Tests for the hosted backend client against a local mock server

use super::*;
use crate::auth::AuthProvider;
use crate::db::{DataStore, Filter, Select};
use crate::storage::{ObjectStorage, UploadOptions};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap as AxumHeaders, Method, StatusCode, Uri};
use axum::Router;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    path: String,
    query: String,
    headers: AxumHeaders,
    body: Vec<u8>,
}

impl Recorded {
    fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Canned responses keyed by `"METHOD /path"`; every request is recorded
#[derive(Clone, Default)]
struct MockBackend {
    responses: Arc<Mutex<HashMap<String, (u16, Value)>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockBackend {
    fn respond(&self, route: &str, status: u16, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(route.to_string(), (status, body));
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

async fn handle(
    State(mock): State<MockBackend>,
    method: Method,
    uri: Uri,
    headers: AxumHeaders,
    body: Bytes,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let route = format!("{} {}", method, uri.path());
    mock.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().unwrap_or_default().to_string(),
        headers,
        body: body.to_vec(),
    });

    let (status, body) = mock
        .responses
        .lock()
        .unwrap()
        .get(&route)
        .cloned()
        .unwrap_or((404, json!({ "message": format!("no route for {}", route) })));

    (
        StatusCode::from_u16(status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
}

async fn start(mock: MockBackend) -> SupabaseClient {
    let app = Router::new().fallback(handle).with_state(mock);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    SupabaseClient::new(&BackendConfig {
        url: format!("http://{}/", addr),
        anon_key: "anon-key".to_string(),
        timeout_seconds: 5,
    })
    .unwrap()
}

fn token_body() -> Value {
    json!({
        "access_token": "tok-1",
        "refresh_token": "refresh-1",
        "expires_in": 3600,
        "token_type": "bearer",
        "user": { "id": "u1", "email": "admin@school.org" }
    })
}

#[tokio::test]
async fn test_sign_in_session_authorizes_rest_calls() {
    let mock = MockBackend::default();
    mock.respond("POST /auth/v1/token", 200, token_body());
    mock.respond(
        "GET /rest/v1/school_stats",
        200,
        json!({ "id": 1, "students_enrolled": 450, "qualified_teachers": 32, "grade_level_text": "K-8" }),
    );
    let client = start(mock.clone()).await;

    assert_eq!(client.get_session().await.unwrap(), None);

    let session = client.sign_in("admin@school.org", "secret").await.unwrap();
    assert_eq!(session.user.id, "u1");
    assert!(session.expires_at.is_some());
    assert_eq!(client.get_session().await.unwrap().map(|s| s.user.id), Some("u1".to_string()));

    let rows = client
        .select(&Select::from("school_stats").eq("id", 1).single())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["students_enrolled"], 450);

    let requests = mock.requests();
    assert_eq!(requests[0].query, "grant_type=password");
    assert_eq!(requests[0].header("apikey").as_deref(), Some("anon-key"));
    assert_eq!(requests[0].json()["email"], "admin@school.org");

    let stats = &requests[1];
    assert_eq!(stats.header("authorization").as_deref(), Some("Bearer tok-1"));
    assert_eq!(stats.header("accept").as_deref(), Some("application/vnd.pgrst.object+json"));
    assert!(stats.query.contains("select=*"));
    assert!(stats.query.contains("id=eq.1"));
}

#[tokio::test]
async fn test_expired_session_keeps_user_token_and_surfaces_rejection() {
    let mock = MockBackend::default();
    let mut token = token_body();
    token["expires_in"] = json!(0);
    mock.respond("POST /auth/v1/token", 200, token);
    mock.respond(
        "DELETE /rest/v1/applications",
        401,
        json!({ "code": "PGRST301", "message": "JWT expired" }),
    );
    mock.respond(
        "DELETE /storage/v1/object/gallery-images",
        400,
        json!({ "statusCode": "403", "error": "Unauthorized", "message": "\"exp\" claim timestamp check failed" }),
    );
    let client = start(mock.clone()).await;

    client.sign_in("admin@school.org", "secret").await.unwrap();
    assert_eq!(client.get_session().await.unwrap(), None);

    let err = client
        .delete("applications", &Filter::eq("id", 1))
        .await
        .unwrap_err();
    assert_eq!(err.message, "JWT expired");
    assert_eq!(err.code.as_deref(), Some("PGRST301"));

    let err = client
        .remove("gallery-images", &["gallery/u1/17-fair.jpg".to_string()])
        .await
        .unwrap_err();
    assert_eq!(err.message, "\"exp\" claim timestamp check failed");

    let requests = mock.requests();
    assert_eq!(requests.len(), 3);
    for request in &requests[1..] {
        assert_eq!(request.header("authorization").as_deref(), Some("Bearer tok-1"));
        assert_eq!(request.header("apikey").as_deref(), Some("anon-key"));
    }
}

#[tokio::test]
async fn test_sign_in_failure_surfaces_provider_message() {
    let mock = MockBackend::default();
    mock.respond(
        "POST /auth/v1/token",
        400,
        json!({ "error": "invalid_grant", "error_description": "Invalid login credentials" }),
    );
    let client = start(mock).await;

    let err = client.sign_in("admin@school.org", "wrong").await.unwrap_err();
    assert_eq!(err.message, "Invalid login credentials");
    assert_eq!(err.code.as_deref(), Some("400"));
    assert_eq!(client.get_session().await.unwrap(), None);
}

#[tokio::test]
async fn test_anon_key_used_without_session_and_order_param() {
    let mock = MockBackend::default();
    mock.respond(
        "GET /rest/v1/gallery_posts",
        200,
        json!([{ "title": "b" }, { "title": "a" }]),
    );
    let client = start(mock.clone()).await;

    let rows = client
        .select(
            &Select::from("gallery_posts")
                .columns("title, description, image_url")
                .order("created_at", false),
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    let request = &mock.requests()[0];
    assert_eq!(request.header("authorization").as_deref(), Some("Bearer anon-key"));
    assert!(request.query.contains("order=created_at.desc"));
    assert!(request.query.contains("select=title%2Cdescription%2Cimage_url"));
}

#[tokio::test]
async fn test_rest_error_keeps_message_and_code() {
    let mock = MockBackend::default();
    mock.respond(
        "PATCH /rest/v1/applications",
        403,
        json!({ "code": "42501", "message": "permission denied for table applications", "details": null, "hint": null }),
    );
    let client = start(mock.clone()).await;

    let err = client
        .update("applications", json!({ "status": "Approved" }), &Filter::eq("id", 9))
        .await
        .unwrap_err();

    assert_eq!(err.message, "permission denied for table applications");
    assert_eq!(err.code.as_deref(), Some("42501"));
    let request = &mock.requests()[0];
    assert_eq!(request.method, "PATCH");
    assert_eq!(request.query, "id=eq.9");
    assert_eq!(request.json(), json!({ "status": "Approved" }));
}

#[tokio::test]
async fn test_insert_and_delete_requests() {
    let mock = MockBackend::default();
    mock.respond("POST /rest/v1/contact_messages", 201, Value::Null);
    mock.respond("DELETE /rest/v1/contact_messages", 200, Value::Null);
    let client = start(mock.clone()).await;

    client
        .insert("contact_messages", vec![json!({ "name": "Ana" })])
        .await
        .unwrap();
    client
        .delete("contact_messages", &Filter::eq("id", 3))
        .await
        .unwrap();

    let requests = mock.requests();
    assert_eq!(requests[0].json(), json!([{ "name": "Ana" }]));
    assert_eq!(requests[0].header("prefer").as_deref(), Some("return=minimal"));
    assert_eq!(requests[1].method, "DELETE");
    assert_eq!(requests[1].query, "id=eq.3");
}

#[tokio::test]
async fn test_storage_upload_remove_and_public_url() {
    let mock = MockBackend::default();
    mock.respond(
        "POST /storage/v1/object/gallery-images/gallery/u1/17-fair.jpg",
        200,
        json!({ "Key": "gallery-images/gallery/u1/17-fair.jpg" }),
    );
    mock.respond("DELETE /storage/v1/object/gallery-images", 200, json!([]));
    let client = start(mock.clone()).await;

    client
        .upload(
            "gallery-images",
            "gallery/u1/17-fair.jpg",
            vec![0xFF, 0xD8],
            UploadOptions {
                upsert: true,
                content_type: Some("image/jpeg".to_string()),
            },
        )
        .await
        .unwrap();
    client
        .remove("gallery-images", &["gallery/u1/17-fair.jpg".to_string()])
        .await
        .unwrap();

    let requests = mock.requests();
    assert_eq!(requests[0].path, "/storage/v1/object/gallery-images/gallery/u1/17-fair.jpg");
    assert_eq!(requests[0].header("x-upsert").as_deref(), Some("true"));
    assert_eq!(requests[0].header("content-type").as_deref(), Some("image/jpeg"));
    assert_eq!(requests[0].body, vec![0xFF, 0xD8]);
    assert_eq!(requests[1].json(), json!({ "prefixes": ["gallery/u1/17-fair.jpg"] }));

    let url = client.public_url("gallery-images", "gallery/u1/17-fair.jpg");
    assert_eq!(
        url,
        format!(
            "{}/storage/v1/object/public/gallery-images/gallery/u1/17-fair.jpg",
            client.base_url()
        )
    );
}

#[tokio::test]
async fn test_upload_without_declared_type_uses_file_extension() {
    let mock = MockBackend::default();
    mock.respond(
        "POST /storage/v1/object/gallery-images/gallery/u1/17-fair.jpg",
        200,
        json!({ "Key": "gallery-images/gallery/u1/17-fair.jpg" }),
    );
    let client = start(mock.clone()).await;

    let image = crate::models::ImageFile::new("fair.jpg", vec![0xFF, 0xD8]);
    client
        .upload(
            "gallery-images",
            "gallery/u1/17-fair.jpg",
            image.bytes.clone(),
            UploadOptions {
                upsert: true,
                content_type: image.content_type.clone(),
            },
        )
        .await
        .unwrap();

    let request = &mock.requests()[0];
    assert_eq!(request.header("content-type").as_deref(), Some("image/jpeg"));
}

#[tokio::test]
async fn test_storage_error_message() {
    let mock = MockBackend::default();
    mock.respond(
        "POST /storage/v1/object/gallery-images/gallery/u1/1-x.jpg",
        400,
        json!({ "statusCode": "403", "error": "Unauthorized", "message": "new row violates row-level security policy" }),
    );
    let client = start(mock).await;

    let err = client
        .upload("gallery-images", "gallery/u1/1-x.jpg", vec![1], UploadOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.message, "new row violates row-level security policy");
    assert_eq!(err.code.as_deref(), Some("403"));
}

#[test]
fn test_error_from_plain_text_body() {
    let err = error_from_body(reqwest::StatusCode::BAD_GATEWAY, "upstream timed out\n");
    assert_eq!(err.message, "upstream timed out");
    assert_eq!(err.code.as_deref(), Some("502"));

    let err = error_from_body(reqwest::StatusCode::SERVICE_UNAVAILABLE, "");
    assert_eq!(err.message, "Service Unavailable");
}
