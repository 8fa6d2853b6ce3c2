#![allow(dead_code)]

use std::path::PathBuf;

use axum::{
    body::{self, Body},
    http::{header, Method, Request},
    response::Response,
    Router,
};
use ristoword::{app_router, config::AppConfig, AppState};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// Pages shipped with the crate.
pub fn public_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("public")
}

/// Helper harness: the full router over JSON files in a fresh temporary data directory.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    data_dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_data_dir(TempDir::new().expect("temp data dir"))
    }

    fn with_data_dir(data_dir: TempDir) -> Self {
        let cfg = AppConfig::new(data_dir.path(), public_dir());
        let state = AppState::open(cfg);
        let router = app_router(state.clone());
        Self {
            router,
            state,
            data_dir,
        }
    }

    /// Simulates a process restart: drops the in-memory state and reloads from disk.
    pub fn restart(self) -> Self {
        let TestApp { data_dir, .. } = self;
        Self::with_data_dir(data_dir)
    }

    pub fn data_file(&self, name: &str) -> PathBuf {
        self.data_dir.path().join(name)
    }

    pub fn read_data_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.data_file(name)).expect("data file")
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }
}

pub async fn response_text(response: Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
