//! HTTP surface of the dev server
//!
//! Static files (with the reload script injected into HTML), the script
//! itself, and the WebSocket subscription endpoint.

pub mod http;
pub mod script;
pub mod static_files;
pub mod websocket;
