//! Shared application state

use std::path::PathBuf;
use std::sync::Arc;

use super::registry::Registry;

/// Default name of the subscription path (the script lives at `<name>.js`)
pub const DEFAULT_RELOAD_PATH: &str = "__live_reload";

/// State shared by every request handler
pub struct AppState {
    /// Directory served to browsers (also the watched tree)
    pub root: PathBuf,

    /// Subscription path name, without the leading slash
    pub reload_path: String,

    /// Live reload subscribers, shared with the watch loop
    pub registry: Arc<Registry>,
}

impl AppState {
    pub fn new(root: impl Into<PathBuf>, reload_path: &str, registry: Arc<Registry>) -> Self {
        Self {
            root: root.into(),
            reload_path: reload_path.trim_matches('/').to_string(),
            registry,
        }
    }

    /// Route of the WebSocket endpoint
    pub fn socket_route(&self) -> String {
        format!("/{}", self.reload_path)
    }

    /// Route of the client script
    pub fn script_route(&self) -> String {
        format!("/{}.js", self.reload_path)
    }
}
