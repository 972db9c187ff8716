// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP boundary - query validation, dispatch, JSON encoding, static page

use axum::extract::{Extension, Path, Query};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::dispatch::Dispatcher;
use crate::errors::suggestions::{ENCODING_FAILURE, MISSING_QUERY};

const INDEX_HTML: &str = include_str!("../static/index.html");
const APP_JS: &str = include_str!("../static/app.js");

/// Routes for the search service.
pub fn router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/static/", get(handle_index))
        .route("/static/*path", get(handle_static))
        .route("/search", get(handle_search))
        .layer(Extension(dispatcher))
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, dispatcher: Arc<Dispatcher>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(dispatcher))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

async fn handle_root() -> Response {
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, "/static/")]).into_response()
}

async fn handle_index() -> Response {
    html(INDEX_HTML)
}

async fn handle_static(Path(path): Path<String>) -> Response {
    match path.as_str() {
        "" | "index.html" => html(INDEX_HTML),
        "app.js" => (
            [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
            APP_JS,
        )
            .into_response(),
        _ => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

fn html(body: &'static str) -> Response {
    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], body).into_response()
}

/// The first `q` parameter wins when the URL repeats it.
fn first_query(params: Vec<(String, String)>) -> Option<String> {
    params
        .into_iter()
        .find_map(|(key, value)| (key == "q").then_some(value))
}

pub async fn handle_search(
    Query(params): Query<Vec<(String, String)>>,
    Extension(dispatcher): Extension<Arc<Dispatcher>>,
) -> Response {
    let Some(query) = first_query(params).filter(|q| !q.is_empty()) else {
        return (StatusCode::BAD_REQUEST, MISSING_QUERY).into_response();
    };

    let outcome = dispatcher.dispatch(&query).await;
    tracing::info!(
        query = %query,
        strategy = outcome.strategy.map(|s| s.as_str()).unwrap_or("none"),
        hits = outcome.results.len(),
        timed_out = outcome.timed_out,
        "search"
    );

    // encode before choosing a status so a failure never follows a 200
    match serde_json::to_vec(&outcome.results) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode results");
            (StatusCode::BAD_REQUEST, ENCODING_FAILURE).into_response()
        }
    }
}
