#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{body::Body, http::Request, Router};
use http_body_util::BodyExt;
use map_notes_api::auth::identity::mock::FixedIdentity;
use map_notes_api::auth::SessionIdentity;
use map_notes_api::config::AppConfig;
use map_notes_api::services::asset_host::mock::RecordingAssetHost;
use map_notes_api::AppState;
use reqwest::StatusCode;
use uuid::Uuid;

pub const BOUNDARY: &str = "----mapnotesboundary";

/// Development config pointed at a throwaway pages directory
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.api.enable_request_logging = false;
    config.pages.dir = pages_dir();
    config
}

/// Temp directory holding a minimal SPA build
pub fn pages_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("map-notes-pages-{}", Uuid::new_v4().simple()));
    std::fs::create_dir_all(&dir).expect("create pages dir");
    std::fs::write(dir.join("index.html"), "<!doctype html><title>map notes</title>").expect("write index.html");
    std::fs::write(dir.join("app.js"), "console.log('map notes')").expect("write app.js");
    dir
}

pub fn app_with(host: Arc<RecordingAssetHost>, identity: FixedIdentity) -> Router {
    app_with_config(test_config(), host, identity)
}

pub fn app_with_config(config: AppConfig, host: Arc<RecordingAssetHost>, identity: FixedIdentity) -> Router {
    map_notes_api::app(AppState::new(config, host, Arc::new(identity)))
}

pub fn someone() -> SessionIdentity {
    SessionIdentity {
        user_id: Uuid::new_v4(),
        email: Some("someone@example.com".into()),
    }
}

/// Formatted log output collected by a thread-local subscriber
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    pub fn lines(&self) -> Vec<String> {
        let buf = self.0.lock().expect("log buffer");
        String::from_utf8_lossy(&buf).lines().map(str::to_string).collect()
    }

    /// Lines logged at ERROR level
    pub fn errors(&self) -> Vec<String> {
        self.lines().into_iter().filter(|line| line.starts_with("ERROR")).collect()
    }
}

/// Capture DEBUG and above on the current thread until the guard drops
pub fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .with_writer(move || writer.clone())
        .finish();
    (logs, tracing::subscriber::set_default(subscriber))
}

/// One file part in a multipart body
pub struct Part<'a> {
    pub name: &'a str,
    pub file_name: &'a str,
    pub content_type: Option<&'a str>,
    pub data: &'a [u8],
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                part.name, part.file_name
            )
            .as_bytes(),
        );
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/upload-asset")
        .header("content-type", format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from(body))
        .expect("build upload request")
}

pub fn navigation(path: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(path)
        .header("accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .body(Body::empty())
        .expect("build navigation request")
}

pub async fn body_json(response: axum::response::Response) -> Result<serde_json::Value> {
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok(serde_json::from_slice(&bytes)?)
}

pub async fn body_text(response: axum::response::Response) -> Result<String> {
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// The real server binary, spawned on a free port
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    pub fn spawn(envs: &[(&str, &str)]) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_map-notes-api"));
        cmd.args(["--host", "127.0.0.1", "--port", &port.to_string()])
            .env("APP_ENV", "development")
            .env("PAGES_DIR", pages_dir())
            .envs(envs.iter().copied())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    pub async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
