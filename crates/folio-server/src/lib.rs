//! HTTP server for Folio.
//!
//! Exposes the project store as a JSON API under `/v0` and serves page
//! bytes by hostname: `GET /about` on `docs.<base_domain>` returns the
//! `about` page of project `docs`, and `docs_<version>.<base_domain>` pins a
//! version.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ApiError, ServerError, ServerResult};
pub use handler::AppState;
pub use server::FolioServer;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn app() -> Router {
        FolioServer::new(ServerConfig::default()).unwrap().router()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn get(app: &Router, host: &str, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .uri(uri)
            .header(header::HOST, host)
            .body(Body::empty())
            .unwrap();
        send(app, request).await
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        let (status, body) = get(app, "api.localtest.me", uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn send_json(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::HOST, "api.localtest.me")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, body) = send(app, request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn seed(app: &Router) -> Value {
        let (status, view) = send_json(
            app,
            "POST",
            "/v0/projects",
            json!({
                "name": "seeded",
                "pages": [
                    { "name": "one", "content": "this is the first page" },
                    { "name": "two", "content": "this is the second page" },
                ]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        view
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (status, body) = get_json(&app(), "/v0/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn creating_empty_project() {
        let app = app();
        let (_, projects) = get_json(&app, "/v0/projects").await;
        assert_eq!(projects, json!([]));

        let (status, _) = send_json(&app, "POST", "/v0/projects", json!({ "name": "empty" })).await;
        assert_eq!(status, StatusCode::OK);

        let (_, projects) = get_json(&app, "/v0/projects").await;
        assert_eq!(projects.as_array().unwrap().len(), 1);
        assert_eq!(projects[0]["name"], "empty");
    }

    #[tokio::test]
    async fn seeded_pages_are_served_by_hash() {
        let app = app();
        let view = seed(&app).await;
        assert_eq!(view["project"]["name"], "seeded");

        for (name, content) in [("one", "this is the first page"), ("two", "this is the second page")] {
            let page = view["pages"]
                .as_array()
                .unwrap()
                .iter()
                .find(|p| p["name"] == name)
                .unwrap();
            assert!(page.get("content").is_none());
            let hash = page["hash"].as_str().unwrap();

            let (status, body) = get(&app, "api.localtest.me", &format!("/v0/raw/{hash}")).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, content.as_bytes());
        }
    }

    #[tokio::test]
    async fn project_hosts_serve_pages() {
        let app = app();
        seed(&app).await;

        let (status, body) = get(&app, "seeded.localtest.me:8787", "/one").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"this is the first page");

        let (status, _) = get(&app, "seeded.localtest.me", "/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = get(&app, "ghost.localtest.me", "/one").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn pinned_version_hosts_serve_old_content() {
        let app = app();
        let created = seed(&app).await;
        let first = created["version"]["id"].as_str().unwrap().to_string();

        let (status, updated) = send_json(
            &app,
            "PATCH",
            "/v0/projects/seeded",
            json!([{ "name": "one", "content": "rewritten" }]),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["version"]["parent_id"], first.as_str());

        let (_, live) = get(&app, "seeded.localtest.me", "/one").await;
        assert_eq!(live, b"rewritten");
        let (_, pinned) = get(&app, &format!("seeded_{first}.localtest.me"), "/one").await;
        assert_eq!(pinned, b"this is the first page");

        let (status, old) = get_json(&app, &format!("/v0/projects/seeded?version={first}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(old["version"]["id"], first.as_str());

        let (_, versions) = get_json(&app, "/v0/projects/seeded/versions").await;
        assert_eq!(versions.as_array().unwrap().len(), 2);
        assert_eq!(versions[1]["id"], first.as_str());
    }

    #[tokio::test]
    async fn patch_deletes_pages() {
        let app = app();
        seed(&app).await;
        let (status, view) = send_json(
            &app,
            "PATCH",
            "/v0/projects/seeded",
            json!([{ "name": "two", "delete": true }, { "name": "empty", "content": "" }]),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<_> = view["pages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["one", "empty"]);

        let (status, _) = get(&app, "seeded.localtest.me", "/two").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn patch_without_content_is_bad_request() {
        let app = app();
        seed(&app).await;
        let (status, body) =
            send_json(&app, "PATCH", "/v0/projects/seeded", json!([{ "name": "one" }])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn errors_map_to_statuses() {
        let app = app();
        seed(&app).await;

        let (status, _) = send_json(&app, "POST", "/v0/projects", json!({ "name": "seeded" })).await;
        assert_eq!(status, StatusCode::CONFLICT);
        let (status, _) = send_json(&app, "POST", "/v0/projects", json!({ "name": "Bad Name" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = get_json(&app, "/v0/projects/ghost").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = get_json(&app, "/v0/projects/seeded?version=nope0000").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = get_json(&app, "/v0/raw/not-a-hash").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = get_json(&app, &format!("/v0/raw/{}", "0".repeat(64))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        for host in ["bad!label.localtest.me", "seeded_not-a-version.localtest.me"] {
            let (status, body) = get(&app, host, "/one").await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            let body: Value = serde_json::from_slice(&body).unwrap();
            assert!(body["error"].is_string());
        }
    }

    #[tokio::test]
    async fn malformed_json_is_a_json_bad_request() {
        let app = app();
        seed(&app).await;
        for (method, uri) in [("POST", "/v0/projects"), ("PATCH", "/v0/projects/seeded")] {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .header(header::HOST, "api.localtest.me")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap();
            let (status, body) = send(&app, request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            let body: Value = serde_json::from_slice(&body).unwrap();
            assert!(body["error"].is_string());
        }
    }

    #[tokio::test]
    async fn hello_world_on_apex() {
        let app = app();
        let (status, body) = get(&app, "localtest.me", "/").await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "message": "Hello World!" }));
    }
}
