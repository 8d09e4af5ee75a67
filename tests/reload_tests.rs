//! Integration tests for change detection and reload delivery

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tempfile::TempDir;
use tower::util::ServiceExt;

use livewatch::api::http::create_router;
use livewatch::api::websocket::ChannelSubscriber;
use livewatch::{AppState, FilterSet, ReloadMessage, Registry, Scanner, WatchLoop};

fn t0() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000)
}

fn touch(path: &Path, at: SystemTime) {
    if !path.exists() {
        fs::write(path, b"").unwrap();
    }
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(at)
        .unwrap();
}

#[test]
fn test_hidden_file_change_ignored_index_change_reported() {
    let dir = TempDir::new().unwrap();
    let index = dir.path().join("index.html");
    let hidden = dir.path().join(".hidden");
    touch(&index, t0());
    touch(&hidden, t0());

    let mut scanner = Scanner::with_watermark(dir.path(), FilterSet::default(), t0());
    let t1 = t0() + Duration::from_secs(60);

    touch(&hidden, t1);
    let result = scanner.scan();
    assert!(!result.changed);
    assert_eq!(scanner.watermark(), t0());

    touch(&index, t1);
    let result = scanner.scan();
    assert!(result.changed);
    assert_eq!(result.watermark, t1);
    assert_eq!(scanner.watermark(), t1);
}

#[test]
fn test_dead_subscriber_dropped_on_next_change() {
    let dir = TempDir::new().unwrap();
    let page = dir.path().join("index.html");
    touch(&page, t0());

    let registry = Arc::new(Registry::new());
    let (first, mut first_rx) = ChannelSubscriber::new();
    let (second, mut second_rx) = ChannelSubscriber::new();
    registry.register(Arc::new(first));
    registry.register(Arc::new(second));

    let scanner = Scanner::with_watermark(dir.path(), FilterSet::default(), t0());
    let mut watch = WatchLoop::new(scanner, registry.clone(), Duration::from_millis(10));

    touch(&page, t0() + Duration::from_secs(1));
    assert!(watch.tick());
    assert_eq!(first_rx.try_recv().unwrap(), ReloadMessage::reload());
    assert_eq!(second_rx.try_recv().unwrap(), ReloadMessage::reload());

    // close one transport
    drop(second_rx);

    touch(&page, t0() + Duration::from_secs(2));
    assert!(watch.tick());
    assert_eq!(first_rx.try_recv().unwrap(), ReloadMessage::reload());
    assert!(first_rx.try_recv().is_err());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_include_only_css() {
    let dir = TempDir::new().unwrap();
    let css = dir.path().join("style.css");
    let js = dir.path().join("app.js");
    touch(&css, t0());
    touch(&js, t0());

    let filter = FilterSet::from_csv(r"\.css$", r"^\.").unwrap();
    let mut scanner = Scanner::with_watermark(dir.path(), filter, t0());

    touch(&js, t0() + Duration::from_secs(10));
    assert!(!scanner.scan().changed);

    touch(&css, t0() + Duration::from_secs(5));
    touch(&js, t0() + Duration::from_secs(20));
    let result = scanner.scan();
    assert!(result.changed);
    // app.js is not a qualifying entry, so it does not move the watermark
    assert_eq!(result.watermark, t0() + Duration::from_secs(5));
}

#[test]
fn test_excluded_file_never_reported_even_when_included() {
    let dir = TempDir::new().unwrap();
    let draft = dir.path().join("draft.html");
    touch(&draft, t0() + Duration::from_secs(30));

    let filter = FilterSet::from_csv(r"\.html$", r"^draft").unwrap();
    let mut scanner = Scanner::with_watermark(dir.path(), filter, t0());
    assert!(!scanner.scan().changed);
}

fn app_for(dir: &Path) -> axum::Router {
    let state = Arc::new(AppState::new(dir, "__live_reload", Arc::new(Registry::new())));
    create_router(state)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, String, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, body.to_vec())
}

#[tokio::test]
async fn test_index_served_with_script_injected() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("index.html"),
        "<html><body><h1>Hello</h1></body></html>",
    )
    .unwrap();

    let (status, content_type, body) = get(app_for(dir.path()), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/html"));
    let body = String::from_utf8(body).unwrap();
    assert!(body.contains("<script src=\"/__live_reload.js\"></script>\n</body>"));
}

#[tokio::test]
async fn test_non_html_served_verbatim() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("css")).unwrap();
    fs::write(dir.path().join("css").join("style.css"), "body{}</body>").unwrap();

    let (status, content_type, body) = get(app_for(dir.path()), "/css/style.css").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "text/css");
    assert_eq!(body, b"body{}</body>");
}

#[tokio::test]
async fn test_missing_file_is_404() {
    let dir = TempDir::new().unwrap();
    let (status, _, _) = get(app_for(dir.path()), "/nope.html").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_out_of_root_is_404() {
    let dir = TempDir::new().unwrap();
    let site = dir.path().join("site");
    fs::create_dir(&site).unwrap();
    fs::write(dir.path().join("secret.txt"), "s").unwrap();
    fs::write(site.join("inside.txt"), "i").unwrap();
    std::os::unix::fs::symlink(dir.path().join("secret.txt"), site.join("leak.txt")).unwrap();
    std::os::unix::fs::symlink(site.join("inside.txt"), site.join("alias.txt")).unwrap();

    let (status, _, _) = get(app_for(&site), "/leak.txt").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, body) = get(app_for(&site), "/alias.txt").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"i");
}

#[tokio::test]
async fn test_parent_traversal_is_404() {
    let dir = TempDir::new().unwrap();
    let site = dir.path().join("site");
    fs::create_dir(&site).unwrap();
    fs::write(dir.path().join("secret.txt"), "s").unwrap();

    let (status, _, _) = get(app_for(&site), "/%2E%2E/secret.txt").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
