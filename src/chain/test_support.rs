use axum::{routing::post, Json, Router};
use serde_json::Value;

/// Serves `router` on an ephemeral local port and returns its base url.
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{address}")
}

/// Serves a single canned JSON body for every POST to `/`.
pub async fn spawn_json_server(body: Value) -> String {
    let router = Router::new().route(
        "/",
        post(move || {
            let body = body.clone();
            async move { Json(body) }
        }),
    );
    spawn_server(router).await
}
