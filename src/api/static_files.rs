//! Static file responder with reload script injection

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::websocket::state::AppState;

/// File served for `/` and directory requests
pub const INDEX_FILE: &str = "index.html";

/// Insert a `<script>` tag before the first `</body>`.
///
/// Documents without a closing body tag are returned untouched.
pub fn inject_script(html: &str, script_src: &str) -> String {
    let tag = format!("<script src=\"{}\"></script>\n</body>", script_src);
    html.replacen("</body>", &tag, 1)
}

/// Map a request path onto the served root.
///
/// Returns `None` for paths that would escape the root lexically. Symlinks
/// are checked separately by [`is_within_root`].
pub fn resolve_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let decoded = urlencoding::decode(request_path).ok()?;
    let mut resolved = root.to_path_buf();
    for component in Path::new(decoded.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(resolved)
}

/// Whether `path`, with symlinks resolved, still lies under `root`
pub async fn is_within_root(root: &Path, path: &Path) -> bool {
    match (
        tokio::fs::canonicalize(root).await,
        tokio::fs::canonicalize(path).await,
    ) {
        (Ok(root), Ok(path)) => path.starts_with(root),
        _ => false,
    }
}

fn is_html(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("html") | Some("htm")
    )
}

/// Fallback handler serving files under the root
pub async fn serve_file(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let Some(mut path) = resolve_path(&state.root, uri.path()) else {
        warn!(path = uri.path(), "rejected path outside root");
        return StatusCode::NOT_FOUND.into_response();
    };

    if tokio::fs::metadata(&path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
    {
        path.push(INDEX_FILE);
    }

    if !is_within_root(&state.root, &path).await {
        warn!(path = %path.display(), "no such file under root");
        return StatusCode::NOT_FOUND.into_response();
    }

    let content = match tokio::fs::read(&path).await {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot serve file");
            return StatusCode::NOT_FOUND.into_response();
        }
    };

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    let body = if is_html(&path) {
        let html = String::from_utf8_lossy(&content);
        inject_script(&html, &state.script_route()).into_bytes()
    } else {
        content
    };

    ([(header::CONTENT_TYPE, mime.to_string())], body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_before_first_body_close() {
        let html = "<html><body><p>hi</p></body></html><!-- </body> -->";
        let out = inject_script(html, "/__live_reload.js");
        assert_eq!(
            out,
            "<html><body><p>hi</p><script src=\"/__live_reload.js\"></script>\n</body></html><!-- </body> -->"
        );
    }

    #[test]
    fn test_inject_without_body_is_noop() {
        assert_eq!(inject_script("<p>fragment</p>", "/x.js"), "<p>fragment</p>");
    }

    #[test]
    fn test_resolve_path() {
        let root = Path::new("/srv/site");
        assert_eq!(resolve_path(root, "/"), Some(PathBuf::from("/srv/site")));
        assert_eq!(
            resolve_path(root, "/css/style.css"),
            Some(PathBuf::from("/srv/site/css/style.css"))
        );
        assert_eq!(
            resolve_path(root, "/my%20page.html"),
            Some(PathBuf::from("/srv/site/my page.html"))
        );
        assert_eq!(resolve_path(root, "/../etc/passwd"), None);
        assert_eq!(resolve_path(root, "/a/%2E%2E/%2E%2E/secret"), None);
    }
}
