// SPDX-License-Identifier: MIT OR Apache-2.0

use reqwest::redirect::Policy;
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;

use shakesearch::config::SearchConfig;
use shakesearch::corpus::Corpus;
use shakesearch::dispatch::Dispatcher;
use shakesearch::server::router;

const FIXTURE: &str = include_str!("fixtures/hamlet.txt");

/// Serve the fixture corpus on an ephemeral port and return its base URL.
async fn spawn_server() -> String {
    let corpus = Arc::new(Corpus::new(FIXTURE));
    let dispatcher = Dispatcher::build(&corpus, &SearchConfig::default()).expect("build indexes");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router(Arc::new(dispatcher)))
            .await
            .expect("serve");
    });
    format!("http://{addr}")
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("client")
}

#[tokio::test]
async fn missing_query_is_bad_request() {
    let base = spawn_server().await;
    let client = client();

    for url in [format!("{base}/search"), format!("{base}/search?q=")] {
        let response = client.get(&url).send().await.expect("request");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{url}");
        assert_eq!(
            response.text().await.expect("body"),
            "missing search query in URL params"
        );
    }
}

#[tokio::test]
async fn matching_query_returns_json_array() {
    let base = spawn_server().await;
    let response = client()
        .get(format!("{base}/search?q=slings"))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"));

    let body: Value = serde_json::from_str(&response.text().await.expect("body")).expect("json");
    let results = body.as_array().expect("top-level array");
    assert!(!results.is_empty());
    assert!(results
        .iter()
        .any(|r| r.as_str().unwrap_or_default().contains("slings")));
}

#[tokio::test]
async fn repeated_query_parameter_uses_the_first() {
    let base = spawn_server().await;
    let response = client()
        .get(format!("{base}/search?q=slings&q=zzzz"))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&response.text().await.expect("body")).expect("json");
    assert!(body
        .as_array()
        .expect("top-level array")
        .iter()
        .any(|r| r.as_str().unwrap_or_default().contains("slings")));
}

#[tokio::test]
async fn encoded_query_is_decoded() {
    let base = spawn_server().await;
    let response = client()
        .get(format!("{base}/search?q=To%20be%2C%20or%20not%20to%20be"))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&response.text().await.expect("body")).expect("json");
    assert!(body
        .as_array()
        .expect("top-level array")
        .iter()
        .any(|r| r.as_str().unwrap_or_default().contains("To be, or not to be")));
}

#[tokio::test]
async fn unmatched_query_returns_empty_array() {
    let base = spawn_server().await;
    let response = client()
        .get(format!("{base}/search?q=zzzz"))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.expect("body"), "[]");
}

#[tokio::test]
async fn root_redirects_to_static_page() {
    let base = spawn_server().await;
    let client = client();

    let response = client.get(format!("{base}/")).send().await.expect("request");
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/static/")
    );

    let page = client
        .get(format!("{base}/static/"))
        .send()
        .await
        .expect("request");
    assert_eq!(page.status(), StatusCode::OK);
    assert!(page.text().await.expect("body").contains("<title>shakesearch</title>"));
}

#[tokio::test]
async fn static_assets_are_served() {
    let base = spawn_server().await;
    let client = client();

    let script = client
        .get(format!("{base}/static/app.js"))
        .send()
        .await
        .expect("request");
    assert_eq!(script.status(), StatusCode::OK);
    assert!(script.text().await.expect("body").contains("/search?q="));

    let missing = client
        .get(format!("{base}/static/missing.css"))
        .send()
        .await
        .expect("request");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
