use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use url::Url;

use medconsole::prelude::*;

async fn serve(app: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server failed");
    });
    Url::parse(&format!("http://{addr}")).unwrap()
}

fn api() -> Router {
    Router::new()
        .route(
            "/api/doctors",
            get(|| async { Json(json!([{ "_id": "d1", "name": "Dr. Rao" }, { "_id": "d2", "name": "Dr. Sen" }])) }),
        )
        .route(
            "/api/categories",
            get(|| async { Json(json!([])) })
                .post(|| async { (StatusCode::BAD_REQUEST, Json(json!({ "message": "Name is required" }))) }),
        )
        .route("/api/conditions/:id", put(|| async { (StatusCode::BAD_GATEWAY, "<html>bad gateway</html>") }))
        .route("/api/articles/:id", delete(|| async { StatusCode::NO_CONTENT }))
        .route("/api/diseases", get(|| async { "not json" }))
}

async fn transport() -> Arc<HttpTransport> {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    Arc::new(HttpTransport::with_client(client, serve(api()).await))
}

#[tokio::test]
async fn list_decodes_json_array() {
    let t = transport().await;
    let mut doctors = Collection::new(Resource::Doctors, t.clone());
    doctors.load().await.unwrap();
    assert_eq!(doctors.len(), 2);
    assert_eq!(doctors.find("d2").unwrap()["name"], "Dr. Sen");
}

#[tokio::test]
async fn error_body_message_becomes_the_banner() {
    let t = transport().await;
    let mut cats = Collection::new(Resource::Categories, t.clone());
    let err = cats.create(&json!({ "name": "" })).await.unwrap_err();
    assert_eq!(err.banner, "Name is required");
    assert!(matches!(err.source, TransportError::Status { status: StatusCode::BAD_REQUEST, .. }));
    assert!(cats.is_empty());
}

#[tokio::test]
async fn non_json_error_body_falls_back_to_generic_message() {
    let t = transport().await;
    let mut conditions = Collection::new(Resource::Conditions, t.clone());
    let err = conditions.update("c1", &json!({ "name": "Gout" })).await.unwrap_err();
    assert_eq!(err.banner, "Error saving condition");
    assert_eq!(err.source.server_message(), None);
}

#[tokio::test]
async fn delete_accepts_empty_no_content_response() {
    let t = transport().await;
    t.delete(Resource::Articles, "a1").await.unwrap();
}

#[tokio::test]
async fn undecodable_list_is_a_fetch_failure() {
    let t = transport().await;
    let mut diseases = Collection::new(Resource::Diseases, t.clone());
    let err = diseases.load().await.unwrap_err();
    assert!(matches!(err.source, TransportError::Decode(_)));
    assert_eq!(diseases.error(), Some("Failed to fetch diseases"));
}
