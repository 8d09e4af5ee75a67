//! Livewatch - live reload development server
//!
//! Serves a directory over HTTP and tells connected browsers to reload
//! whenever a watched file changes.
//!
//! # Modules
//!
//! - `watcher`: polling change detection (filters, scanner, watch loop)
//! - `api`: HTTP router, static files, reload script, WebSocket subscribers
//! - `config`: command-line configuration
//! - `error`: error types
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use livewatch::{AppState, FilterSet, Registry, Scanner, WatchLoop};
//!
//! #[tokio::main]
//! async fn main() -> livewatch::Result<()> {
//!     let registry = Arc::new(Registry::new());
//!     let scanner = Scanner::new("site", FilterSet::default());
//!     WatchLoop::new(scanner, registry.clone(), Duration::from_millis(500)).spawn()?;
//!
//!     let state = Arc::new(AppState::new("site", "__live_reload", registry));
//!     livewatch::api::http::serve("127.0.0.1:8000", state, std::future::pending()).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod watcher;

// Re-export commonly used items at crate root
pub use api::websocket::{AppState, ReloadMessage, Registry, Subscriber};
pub use config::{Args, Config};
pub use error::{Error, Result};
pub use watcher::{ChangeDetector, FilterSet, Scanner, WatchLoop};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
